use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use nc_core::{Article, Category, Error, Result};

use super::HeadlineSource;

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";
const COUNTRY: &str = "us";

/// Top-headlines client for newsapi.org.
pub struct NewsApiSource {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl NewsApiSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| Error::Fetch(format!("invalid base URL: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, category: Category, limit: usize) -> Result<Url> {
        let mut url = self
            .base_url
            .join("top-headlines")
            .map_err(|e| Error::Fetch(format!("invalid endpoint URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("country", COUNTRY)
            .append_pair("category", &category.as_str().to_ascii_lowercase())
            .append_pair("pageSize", &limit.to_string())
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl HeadlineSource for NewsApiSource {
    fn source_name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch_by_category(&self, category: Category, limit: usize) -> Result<Vec<Article>> {
        let url = self.endpoint(category, limit)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "top-headlines request for {category} failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_headlines(category, &body)
    }
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    articles: Vec<RawHeadline>,
}

#[derive(Deserialize)]
struct RawHeadline {
    url: Option<String>,
    title: Option<String>,
    author: Option<String>,
    content: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    source: RawSource,
}

#[derive(Deserialize, Default)]
struct RawSource {
    name: Option<String>,
}

/// Turn a top-headlines response body into articles filed under `category`.
/// Entries without a URL, title or parseable date are dropped, not fatal.
pub fn parse_headlines(category: Category, body: &str) -> Result<Vec<Article>> {
    let response: HeadlinesResponse = serde_json::from_str(body)?;

    if response.status != "ok" {
        return Err(Error::Fetch(format!(
            "API returned error status: {}",
            response.status
        )));
    }

    let articles = response
        .articles
        .into_iter()
        .filter_map(|raw| {
            let (Some(id), Some(title)) = (raw.url, raw.title) else {
                debug!("skipping headline without url or title");
                return None;
            };
            let published_at = raw
                .published_at
                .as_deref()
                .and_then(|date| chrono::DateTime::parse_from_rfc3339(date).ok())?
                .with_timezone(&chrono::Utc);

            Some(Article {
                id,
                category: category.to_string(),
                title,
                author: raw.author,
                content: raw
                    .content
                    .unwrap_or_else(|| "No content available".to_string()),
                published_at,
                source: raw.source.name.unwrap_or_else(|| "NewsAPI".to_string()),
            })
        })
        .collect();

    Ok(articles)
}
