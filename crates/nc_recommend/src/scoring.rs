use nc_core::Article;
use std::collections::HashMap;

/// Relevance score for one article given a user's preference list and
/// rating history. Pure: same inputs, same score, no I/O.
///
/// Two additive signals and nothing else: one point per preference entry
/// whose name matches the article's category (case-insensitive), plus the
/// user's prior rating of this article id, if any. A rated, matching
/// article can reach 6.0; an unrated match scores 1.0; no match and no
/// rating scores 0.0.
pub fn score(article: &Article, preferences: &[String], ratings: &HashMap<String, i32>) -> f64 {
    let mut score = similarity_score(article, preferences);

    if let Some(rating) = ratings.get(&article.id) {
        score += f64::from(*rating);
    }

    score
}

/// Category-match component. With one category per article this is a count
/// of matching preference entries rather than a graded similarity; a
/// duplicated preference counts twice. Known limitation, kept as is.
pub fn similarity_score(article: &Article, preferences: &[String]) -> f64 {
    preferences
        .iter()
        .filter(|preference| preference.eq_ignore_ascii_case(&article.category))
        .count() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

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

    fn prefs(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_no_match_no_rating_scores_zero() {
        let a = article("a", "Sports");
        assert_eq!(score(&a, &prefs(&["Technology"]), &HashMap::new()), 0.0);
        assert_eq!(score(&a, &prefs(&[]), &HashMap::new()), 0.0);
    }

    #[test]
    fn test_single_match_scores_one() {
        let a = article("a", "Technology");
        assert_eq!(score(&a, &prefs(&["Technology"]), &HashMap::new()), 1.0);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let a = article("a", "technology");
        assert_eq!(score(&a, &prefs(&["TECHNOLOGY"]), &HashMap::new()), 1.0);
    }

    #[test]
    fn test_rating_boost_adds_rating_value() {
        let a = article("a", "Technology");
        for rating in 1..=5 {
            let ratings = HashMap::from([("a".to_string(), rating)]);
            assert_eq!(score(&a, &prefs(&["Technology"]), &ratings), 1.0 + f64::from(rating));
        }
    }

    #[test]
    fn test_rating_boost_applies_without_category_match() {
        let a = article("a", "Sports");
        let ratings = HashMap::from([("a".to_string(), 3)]);
        assert_eq!(score(&a, &prefs(&["Technology"]), &ratings), 3.0);
    }

    #[test]
    fn test_rating_of_other_article_is_ignored() {
        let a = article("a", "Technology");
        let ratings = HashMap::from([("b".to_string(), 5)]);
        assert_eq!(score(&a, &prefs(&["Technology"]), &ratings), 1.0);
    }

    #[test]
    fn test_duplicated_preference_counts_twice() {
        let a = article("a", "Technology");
        let preferences = prefs(&["Technology", "Sports", "Technology"]);
        assert_eq!(score(&a, &preferences, &HashMap::new()), 2.0);
    }
}
