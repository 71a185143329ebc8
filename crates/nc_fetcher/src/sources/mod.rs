use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use nc_core::{Article, Category, Result};

pub mod newsapi;

/// A feed of current articles, queried one category at a time.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Human-readable name of the feed.
    fn source_name(&self) -> &str;

    /// Up to `limit` current articles in one category.
    async fn fetch_by_category(&self, category: Category, limit: usize) -> Result<Vec<Article>>;

    /// A mixed batch spread across every category: an even share per
    /// category first, then one-at-a-time round-robin top-up until `total`
    /// articles are collected or a full pass yields nothing new. A category
    /// that fails is logged and skipped, it never sinks the whole batch.
    async fn fetch_mixed(&self, total: usize) -> Result<Vec<Article>> {
        let per_category = (total / Category::ALL.len()).max(1);

        let fetches = Category::ALL
            .iter()
            .map(|category| self.fetch_by_category(*category, per_category));

        let mut articles = Vec::new();
        for (category, result) in Category::ALL.iter().zip(join_all(fetches).await) {
            match result {
                Ok(batch) => articles.extend(batch),
                Err(e) => warn!("failed to fetch {category} headlines: {e}"),
            }
        }

        let mut index = 0;
        let mut idle = 0;
        while articles.len() < total && idle < Category::ALL.len() {
            let category = Category::ALL[index % Category::ALL.len()];
            index += 1;

            let before = articles.len();
            match self.fetch_by_category(category, 1).await {
                Ok(batch) => articles.extend(batch),
                Err(e) => warn!("failed to fetch {category} headlines: {e}"),
            }
            idle = if articles.len() == before { idle + 1 } else { 0 };
        }

        Ok(articles)
    }
}
