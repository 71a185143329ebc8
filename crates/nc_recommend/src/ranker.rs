use nc_core::Article;
use std::collections::HashMap;

use crate::scoring::score;

/// An article paired with its computed score for the duration of one
/// ranking call. Scores live next to the article they were computed for,
/// keyed by position, never by a hash of the article itself.
#[derive(Debug, Clone)]
pub struct ScoredArticle {
    pub article: Article,
    pub score: f64,
}

/// Order candidates by descending score. The sort is stable: candidates
/// with equal scores keep the relative order they were supplied in.
/// Duplicate ids are not collapsed; each occurrence is scored on its own.
pub fn rank(
    candidates: Vec<Article>,
    preferences: &[String],
    ratings: &HashMap<String, i32>,
) -> Vec<Article> {
    let mut scored: Vec<ScoredArticle> = candidates
        .into_iter()
        .map(|article| ScoredArticle {
            score: score(&article, preferences, ratings),
            article,
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    scored.into_iter().map(|s| s.article).collect()
}

/// The first `n` entries of an already ranked sequence, or all of them when
/// fewer are available.
pub fn top_n(ranked: Vec<Article>, n: usize) -> Vec<Article> {
    ranked.into_iter().take(n).collect()
}
