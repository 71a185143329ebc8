pub mod backends;

pub use backends::*;

pub mod prelude {
    pub use super::backends::*;
    pub use nc_core::{ArticleStore, UserStore};
}
