use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::collections::HashMap;
use std::path::Path;

use nc_core::{Article, ArticleStore, Error, Result, UserProfile, UserStore};

use super::ensure_valid_rating;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        category TEXT NOT NULL,
        title TEXT NOT NULL,
        author TEXT,
        content TEXT NOT NULL,
        published_at TEXT NOT NULL,
        source TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        registered_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_preferences (
        user_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        category TEXT NOT NULL,
        PRIMARY KEY (user_id, position)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS article_ratings (
        user_id TEXT NOT NULL,
        article_id TEXT NOT NULL,
        rating INTEGER NOT NULL,
        rated_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

/// SQLite-backed store. One file holds articles, accounts, preferences and
/// ratings; the schema is created on first open.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to open database: {e}")))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("failed to run migration {i}: {e}")))?;
        }

        Ok(Self { pool })
    }
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        category: row.get("category"),
        title: row.get("title"),
        author: row.get("author"),
        content: row.get("content"),
        published_at: chrono::DateTime::parse_from_rfc3339(row.get("published_at"))
            .map_err(|e| Error::Storage(format!("failed to parse date: {e}")))?
            .with_timezone(&chrono::Utc),
        source: row.get("source"),
    })
}

#[async_trait]
impl ArticleStore for SqliteStorage {
    async fn store_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO articles
            (id, category, title, author, content, published_at, source)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.id)
        .bind(&article.category)
        .bind(&article.title)
        .bind(article.author.as_deref())
        .bind(&article.content)
        .bind(article.published_at.to_rfc3339())
        .bind(&article.source)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to store article: {e}")))?;

        Ok(())
    }

    async fn get_by_category(&self, category: &str) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            WHERE category = ? COLLATE NOCASE
            ORDER BY rowid
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to query category: {e}")))?;

        rows.iter().map(article_from_row).collect()
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to query article: {e}")))?;

        row.as_ref().map(article_from_row).transpose()
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn username_exists(&self, username: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to query username: {e}")))?;

        Ok(row.is_some())
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<UserProfile> {
        if self.username_exists(username).await? {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let registered_at = chrono::Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, password, registered_at) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(password)
        .bind(registered_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to create user: {e}")))?;

        Ok(UserProfile {
            id: result.last_insert_rowid().to_string(),
            username: username.to_string(),
            preferences: Vec::new(),
            registered_at,
        })
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            "SELECT id, username, registered_at FROM users WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to authenticate: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: i64 = row.get("id");
        let id = id.to_string();

        let preference_rows = sqlx::query(
            "SELECT category FROM user_preferences WHERE user_id = ? ORDER BY position",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to load preferences: {e}")))?;

        Ok(Some(UserProfile {
            id,
            username: row.get("username"),
            preferences: preference_rows.iter().map(|r| r.get("category")).collect(),
            registered_at: chrono::DateTime::parse_from_rfc3339(row.get("registered_at"))
                .map_err(|e| Error::Storage(format!("failed to parse date: {e}")))?
                .with_timezone(&chrono::Utc),
        }))
    }

    async fn update_preferences(&self, user_id: &str, preferences: &[String]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Storage(format!("failed to begin transaction: {e}")))?;

        sqlx::query("DELETE FROM user_preferences WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Storage(format!("failed to clear preferences: {e}")))?;

        for (position, category) in preferences.iter().enumerate() {
            sqlx::query(
                "INSERT INTO user_preferences (user_id, position, category) VALUES (?, ?, ?)",
            )
            .bind(user_id)
            .bind(position as i64)
            .bind(category)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Storage(format!("failed to save preference: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Storage(format!("failed to commit preferences: {e}")))
    }

    async fn save_rating(&self, user_id: &str, article_id: &str, rating: i32) -> Result<()> {
        ensure_valid_rating(rating)?;

        sqlx::query(
            "INSERT INTO article_ratings (user_id, article_id, rating, rated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(article_id)
        .bind(rating)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to save rating: {e}")))?;

        Ok(())
    }

    async fn get_ratings(&self, user_id: &str) -> Result<HashMap<String, i32>> {
        let rows = sqlx::query(
            r#"
            SELECT article_id, rating FROM article_ratings
            WHERE user_id = ?
            ORDER BY rated_at, rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to load ratings: {e}")))?;

        // Ratings are appended, never updated in place; the newest row for an
        // article wins here.
        let mut ratings = HashMap::new();
        for row in rows {
            ratings.insert(row.get::<String, _>("article_id"), row.get::<i32, _>("rating"));
        }
        Ok(ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn article(id: &str, category: &str) -> Article {
        Article {
            id: id.to_string(),
            category: category.to_string(),
            title: format!("About {category}"),
            author: None,
            content: "content".to_string(),
            published_at: chrono::Utc::now(),
            source: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_article_round_trip() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).await.unwrap();

        let mut stored = article("http://example.com/a", "Technology");
        stored.author = Some("Jane Doe".to_string());
        storage.store_article(&stored).await.unwrap();

        let found = storage.get_by_category("technology").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, stored.id);
        assert_eq!(found[0].author.as_deref(), Some("Jane Doe"));

        let single = storage.get_article(&stored.id).await.unwrap().unwrap();
        assert_eq!(single.title, stored.title);
        assert!(storage.get_article("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_article_replaces_on_same_id() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).await.unwrap();

        storage.store_article(&article("a", "Sports")).await.unwrap();
        let mut updated = article("a", "Sports");
        updated.title = "Rewritten".to_string();
        storage.store_article(&updated).await.unwrap();

        let found = storage.get_by_category("Sports").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Rewritten");
    }

    #[tokio::test]
    async fn test_unknown_category_is_empty_not_error() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).await.unwrap();

        assert!(storage.get_by_category("Gardening").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_account_flow() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).await.unwrap();

        let user = storage.create_user("alice", "secret").await.unwrap();
        assert!(storage.username_exists("alice").await.unwrap());
        assert!(matches!(
            storage.create_user("alice", "other").await.unwrap_err(),
            Error::UsernameTaken(_)
        ));

        let preferences = vec!["Technology".to_string(), "Health".to_string()];
        storage.update_preferences(&user.id, &preferences).await.unwrap();

        let profile = storage.authenticate("alice", "secret").await.unwrap().unwrap();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.preferences, preferences);
        assert!(storage.authenticate("alice", "wrong").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ratings_validate_and_latest_wins() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).await.unwrap();
        let user = storage.create_user("bob", "secret").await.unwrap();

        assert!(matches!(
            storage.save_rating(&user.id, "a", 9).await.unwrap_err(),
            Error::InvalidRating(9)
        ));

        storage.save_rating(&user.id, "a", 2).await.unwrap();
        storage.save_rating(&user.id, "a", 5).await.unwrap();
        storage.save_rating(&user.id, "b", 3).await.unwrap();

        let ratings = storage.get_ratings(&user.id).await.unwrap();
        assert_eq!(ratings.get("a"), Some(&5));
        assert_eq!(ratings.get("b"), Some(&3));
        assert!(storage.get_ratings("unknown").await.unwrap().is_empty());
    }
}
