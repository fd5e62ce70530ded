//! Token-based fuzzy matching.
//!
//! Both sides are reduced to sets of normalized tokens (see [`tokenize`]).
//! Every token of the candidate string earns points against the query tokens:
//!
//! | Match | Points |
//! |-------|--------|
//! | identical token | 3 |
//! | candidate token starts with a query token | 2 |
//! | Levenshtein similarity ≥ threshold | 1 |
//!
//! Each candidate token keeps its best match only. The raw ratio is
//! `points / candidate tokens`, which tops out at 3.0. Ranking uses the raw
//! ratio so exact hits sort above prefix hits; the reported similarity is the
//! raw ratio clamped to `[0, 1]`, and that is what thresholds compare against.

use super::levenshtein;
use rayon::prelude::*;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

const EXACT_POINTS: u32 = 3;
const PREFIX_POINTS: u32 = 2;
const APPROXIMATE_POINTS: u32 = 1;

/// An item that passed the threshold, with its scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem<'a, T> {
    pub item: &'a T,
    /// Clamped similarity in `[0, 1]`.
    pub score: f64,
    /// Unclamped `points / candidate tokens`, used for ordering.
    pub raw: f64,
}

/// Normalize `text` into its set of unique tokens.
///
/// Canonical decomposition splits accented letters into base letter plus
/// combining mark; non-ASCII code points are then dropped, so `ç` becomes `c`
/// and `ã` becomes `a`. What remains is lowercased, stripped to letters,
/// digits and whitespace, and split on whitespace runs.
pub fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .nfd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_lowercase())
        .filter_map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                Some(c)
            } else if c.is_ascii_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Similarity of `candidate` to `query`, clamped to `[0, 1]`.
pub fn fuzzy_token_similarity(query: &str, candidate: &str, min_similarity: f64) -> f64 {
    token_ratio(&tokenize(query), &tokenize(candidate), min_similarity).min(1.0)
}

/// Raw `points / candidate tokens` ratio for pre-tokenized inputs.
///
/// Two empty token sets match vacuously (1.0); an empty candidate against a
/// non-empty query scores 0.0.
pub fn token_ratio(
    query: &HashSet<String>,
    candidate: &HashSet<String>,
    min_similarity: f64,
) -> f64 {
    if candidate.is_empty() {
        return if query.is_empty() { 1.0 } else { 0.0 };
    }

    let points: u32 = candidate
        .iter()
        .map(|token| best_points(query, token, min_similarity))
        .sum();

    points as f64 / candidate.len() as f64
}

fn best_points(query: &HashSet<String>, token: &str, min_similarity: f64) -> u32 {
    let mut best = 0;
    for q in query {
        let points = if q == token {
            EXACT_POINTS
        } else if token.starts_with(q.as_str()) {
            PREFIX_POINTS
        } else if best < APPROXIMATE_POINTS && levenshtein::similarity(q, token) >= min_similarity {
            APPROXIMATE_POINTS
        } else {
            0
        };
        best = best.max(points);
        if best == EXACT_POINTS {
            break;
        }
    }
    best
}

/// Score every item in parallel and keep those at or above `min_similarity`,
/// best match first.
///
/// Items are scored independently; ties keep the input order.
pub fn rank_similar_items<'a, T, I, F>(
    items: I,
    query: &str,
    min_similarity: f64,
    extractor: F,
) -> Vec<ScoredItem<'a, T>>
where
    T: Sync + 'a,
    I: IntoParallelIterator<Item = &'a T>,
    F: Fn(&T) -> String + Sync,
{
    let query_tokens = tokenize(query);

    let mut scored: Vec<ScoredItem<'a, T>> = items
        .into_par_iter()
        .filter_map(|item| {
            let candidate = tokenize(&extractor(item));
            let raw = token_ratio(&query_tokens, &candidate, min_similarity);
            let score = raw.min(1.0);
            (score >= min_similarity).then_some(ScoredItem { item, score, raw })
        })
        .collect();

    scored.sort_by(|a, b| b.raw.total_cmp(&a.raw));
    scored
}

/// [`rank_similar_items`] without the scores.
pub fn find_similar_items<'a, T, I, F>(
    items: I,
    query: &str,
    min_similarity: f64,
    extractor: F,
) -> Vec<&'a T>
where
    T: Sync + 'a,
    I: IntoParallelIterator<Item = &'a T>,
    F: Fn(&T) -> String + Sync,
{
    rank_similar_items(items, query, min_similarity, extractor)
        .into_iter()
        .map(|scored| scored.item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_strips_accents_and_case() {
        assert_eq!(tokenize("João Conceição"), tokens(&["joao", "conceicao"]));
    }

    #[test]
    fn test_tokenize_drops_punctuation_without_splitting() {
        assert_eq!(tokenize("zzz-no-match"), tokens(&["zzznomatch"]));
        assert_eq!(tokenize("ABC-1234, Ford"), tokens(&["abc1234", "ford"]));
    }

    #[test]
    fn test_tokenize_collapses_duplicates_and_whitespace() {
        assert_eq!(tokenize("  oil\toil \n filter "), tokens(&["oil", "filter"]));
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_accent_insensitive_exact_match() {
        assert_eq!(fuzzy_token_similarity("Joao Silva", "joão silva", 0.7), 1.0);
    }

    #[test]
    fn test_word_order_is_irrelevant() {
        assert_eq!(fuzzy_token_similarity("silva joao", "Joao Silva", 0.7), 1.0);
    }

    #[test]
    fn test_both_empty_is_vacuous_match() {
        assert_eq!(fuzzy_token_similarity("", "", 0.7), 1.0);
        assert_eq!(fuzzy_token_similarity("!!", "--", 0.7), 1.0);
    }

    #[test]
    fn test_empty_candidate_against_query_scores_zero() {
        assert_eq!(fuzzy_token_similarity("eduardo", "", 0.7), 0.0);
        assert_eq!(fuzzy_token_similarity("", "eduardo", 0.7), 0.0);
    }

    #[test]
    fn test_raw_ratio_priorities() {
        let q = tokens(&["edu"]);
        assert_eq!(token_ratio(&q, &tokens(&["edu"]), 0.7), 3.0);
        assert_eq!(token_ratio(&q, &tokens(&["eduardo"]), 0.7), 2.0);
        // similarity("edu", "adu") = 2/3
        assert_eq!(token_ratio(&q, &tokens(&["adu"]), 0.6), 1.0);
        assert_eq!(token_ratio(&q, &tokens(&["adu"]), 0.7), 0.0);
    }

    #[test]
    fn test_each_candidate_token_keeps_best_match() {
        // "eduardo" is prefixed by "edu" and identical to "eduardo": exact wins.
        let q = tokens(&["edu", "eduardo"]);
        assert_eq!(token_ratio(&q, &tokens(&["eduardo"]), 0.7), 3.0);
    }

    #[test]
    fn test_ratio_is_normalized_by_candidate_tokens() {
        let q = tokens(&["eduardo"]);
        assert_eq!(token_ratio(&q, &tokens(&["eduardo", "pelli"]), 0.7), 1.5);
    }

    #[test]
    fn test_typo_tolerance() {
        // similarity("souza", "sousa") = 0.8
        assert_eq!(fuzzy_token_similarity("sousa", "Souza", 0.75), 1.0);
        assert_eq!(fuzzy_token_similarity("sousa", "Souza", 0.9), 0.0);
        assert_eq!(fuzzy_token_similarity("sousa", "Maria Souza", 0.75), 0.5);
    }

    #[test]
    fn test_find_similar_items_filters_and_ranks() {
        let names = vec![
            "Maria Souza".to_string(),
            "Eduardo Pelli".to_string(),
            "Eduardo".to_string(),
            "Edite Ramos".to_string(),
        ];

        let ranked = rank_similar_items(&names, "eduardo", 0.7, |s: &String| s.clone());
        let found: Vec<&str> = ranked.iter().map(|s| s.item.as_str()).collect();

        assert_eq!(found, vec!["Eduardo", "Eduardo Pelli"]);
        assert!(ranked.iter().all(|s| s.score >= 0.7));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.windows(2).all(|w| w[0].raw >= w[1].raw));
    }

    #[test]
    fn test_find_similar_items_prefers_exact_over_prefix() {
        let names = vec!["Eduardo".to_string(), "Edu".to_string()];
        let found = find_similar_items(&names, "edu", 0.7, |s: &String| s.clone());
        assert_eq!(found, vec![&names[1], &names[0]]);
    }

    #[test]
    fn test_find_similar_items_no_match() {
        let names = vec!["Eduardo Pelli".to_string(), "Maria Souza".to_string()];
        let found = find_similar_items(&names, "zzz-no-match", 0.8, |s: &String| s.clone());
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_similar_items_over_references() {
        let names = ["Ana Lima".to_string(), "Ana Paula".to_string()];
        let refs: Vec<&String> = names.iter().collect();
        let found = find_similar_items(refs, "ana", 0.7, |s: &String| s.clone());
        assert_eq!(found.len(), 2);
    }
}
