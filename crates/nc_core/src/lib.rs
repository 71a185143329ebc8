pub mod error;
pub mod storage;
pub mod types;

pub use error::Error;
pub use storage::{ArticleStore, UserStore};
pub use types::{Article, Category, UserProfile};

pub type Result<T> = std::result::Result<T, Error>;
