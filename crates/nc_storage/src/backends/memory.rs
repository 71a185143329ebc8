use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use nc_core::{Article, ArticleStore, Error, Result, UserProfile, UserStore};

use super::ensure_valid_rating;

struct UserRecord {
    id: String,
    username: String,
    password: String,
    registered_at: DateTime<Utc>,
}

struct RatingRecord {
    article_id: String,
    rating: i32,
}

#[derive(Default)]
struct State {
    articles: Vec<Article>,
    users: Vec<UserRecord>,
    preferences: HashMap<String, Vec<String>>,
    // Ratings are appended, never removed; readers fold them into a map
    // where the latest entry for an article wins.
    ratings: HashMap<String, Vec<RatingRecord>>,
}

/// In-memory backend. The default for tests and for running without a
/// database file; everything is lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    state: RwLock<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStorage {
    async fn store_article(&self, article: &Article) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.articles.iter_mut().find(|a| a.id == article.id) {
            *existing = article.clone();
        } else {
            state.articles.push(article.clone());
        }
        Ok(())
    }

    async fn get_by_category(&self, category: &str) -> Result<Vec<Article>> {
        let state = self.state.read().await;
        Ok(state
            .articles
            .iter()
            .filter(|a| a.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect())
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let state = self.state.read().await;
        Ok(state.articles.iter().find(|a| a.id == id).cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn username_exists(&self, username: &str) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.users.iter().any(|u| u.username == username))
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<UserProfile> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == username) {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: password.to_string(),
            registered_at: Utc::now(),
        };
        let profile = UserProfile {
            id: record.id.clone(),
            username: record.username.clone(),
            preferences: Vec::new(),
            registered_at: record.registered_at,
        };
        state.users.push(record);
        Ok(profile)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserProfile>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(|u| UserProfile {
                id: u.id.clone(),
                username: u.username.clone(),
                preferences: state.preferences.get(&u.id).cloned().unwrap_or_default(),
                registered_at: u.registered_at,
            }))
    }

    async fn update_preferences(&self, user_id: &str, preferences: &[String]) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .preferences
            .insert(user_id.to_string(), preferences.to_vec());
        Ok(())
    }

    async fn save_rating(&self, user_id: &str, article_id: &str, rating: i32) -> Result<()> {
        ensure_valid_rating(rating)?;
        let mut state = self.state.write().await;
        state
            .ratings
            .entry(user_id.to_string())
            .or_default()
            .push(RatingRecord {
                article_id: article_id.to_string(),
                rating,
            });
        Ok(())
    }

    async fn get_ratings(&self, user_id: &str) -> Result<HashMap<String, i32>> {
        let state = self.state.read().await;
        let mut ratings = HashMap::new();
        for record in state.ratings.get(user_id).into_iter().flatten() {
            ratings.insert(record.article_id.clone(), record.rating);
        }
        Ok(ratings)
    }
}
