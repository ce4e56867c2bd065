//! Utility modules shared by the resolver and the timeline calculator
//!
//! - Similarity: normalized Levenshtein scoring and best-match search
//! - Months: fixed month labels with modular arithmetic

pub mod similarity;
pub mod months;

// Re-export commonly used types
pub use similarity::{similarity, find_best_match, BestMatch, FUZZY_THRESHOLD, AI_ASSIST_THRESHOLD};
pub use months::Month;
