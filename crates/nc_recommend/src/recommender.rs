use std::sync::Arc;
use tracing::debug;

use nc_core::{Article, ArticleStore, Result, UserProfile, UserStore};

use crate::ranker::rank;

/// Front door of the engine: pulls candidates and ratings through the store
/// interfaces, then hands them to the pure scoring and ranking functions.
/// Holds nothing but the two store handles; every call is self-contained.
pub struct Recommender {
    articles: Arc<dyn ArticleStore>,
    users: Arc<dyn UserStore>,
}

impl Recommender {
    pub fn new(articles: Arc<dyn ArticleStore>, users: Arc<dyn UserStore>) -> Self {
        Self { articles, users }
    }

    /// All known articles in the user's primary preferred category, ordered
    /// by descending relevance. Store failures propagate to the caller.
    pub async fn recommendations(&self, user: &UserProfile) -> Result<Vec<Article>> {
        let primary = user.primary_category();
        let candidates = self.articles.get_by_category(primary).await?;
        let ratings = self.users.get_ratings(&user.id).await?;

        debug!(
            user = %user.username,
            category = primary,
            candidates = candidates.len(),
            ratings = ratings.len(),
            "ranking candidates"
        );

        Ok(rank(candidates, &user.preferences, &ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;

    struct FixedStore {
        articles: Vec<Article>,
        ratings: HashMap<String, i32>,
    }

    #[async_trait]
    impl ArticleStore for FixedStore {
        async fn store_article(&self, _article: &Article) -> Result<()> {
            Ok(())
        }

        async fn get_by_category(&self, category: &str) -> Result<Vec<Article>> {
            Ok(self
                .articles
                .iter()
                .filter(|a| a.category.eq_ignore_ascii_case(category))
                .cloned()
                .collect())
        }

        async fn get_article(&self, id: &str) -> Result<Option<Article>> {
            Ok(self.articles.iter().find(|a| a.id == id).cloned())
        }
    }

    #[async_trait]
    impl UserStore for FixedStore {
        async fn username_exists(&self, _username: &str) -> Result<bool> {
            Ok(false)
        }

        async fn create_user(&self, _username: &str, _password: &str) -> Result<UserProfile> {
            unimplemented!("not exercised")
        }

        async fn authenticate(
            &self,
            _username: &str,
            _password: &str,
        ) -> Result<Option<UserProfile>> {
            Ok(None)
        }

        async fn update_preferences(&self, _user_id: &str, _preferences: &[String]) -> Result<()> {
            Ok(())
        }

        async fn save_rating(&self, _user_id: &str, _article_id: &str, _rating: i32) -> Result<()> {
            Ok(())
        }

        async fn get_ratings(&self, _user_id: &str) -> Result<HashMap<String, i32>> {
            Ok(self.ratings.clone())
        }
    }

    fn article(id: &str, category: &str) -> Article {
        Article {
            id: id.to_string(),
            category: category.to_string(),
            title: format!("About {category}"),
            author: None,
            content: "content".to_string(),
            published_at: Utc::now(),
            source: "test".to_string(),
        }
    }

    fn user(preferences: &[&str]) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            username: "test".to_string(),
            preferences: preferences.iter().map(|p| p.to_string()).collect(),
            registered_at: Utc::now(),
        }
    }

    fn recommender(articles: Vec<Article>, ratings: HashMap<String, i32>) -> Recommender {
        let store = Arc::new(FixedStore { articles, ratings });
        Recommender::new(store.clone(), store)
    }

    #[tokio::test]
    async fn test_candidates_come_from_primary_category() {
        let rec = recommender(
            vec![
                article("s1", "Sports"),
                article("t1", "Technology"),
                article("t2", "Technology"),
            ],
            HashMap::new(),
        );

        let result = rec.recommendations(&user(&["Technology", "Sports"])).await.unwrap();
        let ids: Vec<&str> = result.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_rated_candidate_rises_to_the_top() {
        let rec = recommender(
            vec![article("t1", "Technology"), article("t2", "Technology")],
            HashMap::from([("t2".to_string(), 4)]),
        );

        let result = rec.recommendations(&user(&["Technology"])).await.unwrap();
        let ids: Vec<&str> = result.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn test_no_preferences_yields_empty_result() {
        let rec = recommender(vec![article("s1", "Sports")], HashMap::new());

        // Primary category falls back to General, which nothing is filed under.
        let result = rec.recommendations(&user(&[])).await.unwrap();
        assert!(result.is_empty());
    }
}
