use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// The fixed set of article topics. `General` is only ever used as the
/// fallback primary category for users with no preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Sports,
    Technology,
    Politics,
    Health,
    Entertainment,
    Business,
    General,
}

impl Category {
    /// Every category articles are fetched and browsed under. Excludes `General`.
    pub const ALL: [Category; 6] = [
        Category::Sports,
        Category::Technology,
        Category::Politics,
        Category::Health,
        Category::Entertainment,
        Category::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sports => "Sports",
            Category::Technology => "Technology",
            Category::Politics => "Politics",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Business => "Business",
            Category::General => "General",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .chain(std::iter::once(&Category::General))
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// A collected news article. Immutable once fetched; the identifier is the
/// canonical source URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub category: String,
    pub title: String,
    pub author: Option<String>,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
}

impl Article {
    pub fn author_or_unknown(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown Author")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    /// Ordered preferred categories; index 0 is the primary one.
    pub preferences: Vec<String>,
    pub registered_at: DateTime<Utc>,
}

impl UserProfile {
    /// The category recommendation candidates are pulled from. Falls back to
    /// `General`, which no article carries, so it yields an empty candidate set.
    pub fn primary_category(&self) -> &str {
        self.preferences
            .first()
            .map(String::as_str)
            .unwrap_or(Category::General.as_str())
    }
}
