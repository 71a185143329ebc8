pub mod ranker;
pub mod recommender;
pub mod scoring;

pub use ranker::{rank, top_n, ScoredArticle};
pub use recommender::Recommender;
pub use scoring::score;

pub mod prelude {
    pub use super::recommender::Recommender;
    pub use nc_core::{Article, Error, Result, UserProfile};
}
