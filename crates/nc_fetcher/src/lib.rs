pub mod sources;

pub use sources::newsapi::NewsApiSource;
pub use sources::HeadlineSource;

pub mod prelude {
    pub use super::sources::HeadlineSource;
    pub use nc_core::{Article, Error, Result};
}
