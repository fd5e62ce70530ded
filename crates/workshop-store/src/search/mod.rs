//! Approximate text search: Levenshtein distance and token-based fuzzy ranking.

pub mod fuzzy;
pub mod levenshtein;

pub use fuzzy::{
    find_similar_items, fuzzy_token_similarity, rank_similar_items, tokenize, ScoredItem,
};
