use async_trait::async_trait;
use std::collections::HashMap;

use crate::types::{Article, UserProfile};
use crate::Result;

/// Read/write access to collected articles.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Store an article, replacing any previous article with the same id.
    async fn store_article(&self, article: &Article) -> Result<()>;

    /// All articles in a category, case-insensitive match. Unknown categories
    /// yield an empty list, never an error.
    async fn get_by_category(&self, category: &str) -> Result<Vec<Article>>;

    /// Look up a single article by its id.
    async fn get_article(&self, id: &str) -> Result<Option<Article>>;
}

/// Accounts, preferences and ratings.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn username_exists(&self, username: &str) -> Result<bool>;

    /// Create an account. Fails with `Error::UsernameTaken` on a duplicate.
    async fn create_user(&self, username: &str, password: &str) -> Result<UserProfile>;

    /// Load the profile (including preferences) for matching credentials,
    /// or `None` when they don't match any account.
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserProfile>>;

    /// Replace the user's ordered preference list.
    async fn update_preferences(&self, user_id: &str, preferences: &[String]) -> Result<()>;

    /// Record a rating. Values outside 1..=5 are rejected with
    /// `Error::InvalidRating` before anything is written.
    async fn save_rating(&self, user_id: &str, article_id: &str, rating: i32) -> Result<()>;

    /// The user's ratings as article id -> rating. Empty map when the user
    /// has rated nothing. Re-rated articles report the latest value.
    async fn get_ratings(&self, user_id: &str) -> Result<HashMap<String, i32>>;
}
