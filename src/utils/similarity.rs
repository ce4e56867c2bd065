//! String Similarity
//!
//! Normalized Levenshtein similarity over case-folded, trimmed names, and a
//! best-match scan over a candidate list.
//!
//! similarity = 1 - distance / max(len(a), len(b)), lengths in chars.
//! Two empty strings are identical (1.0).

/// Acceptance threshold for plain fuzzy matching
pub const FUZZY_THRESHOLD: f64 = 0.5;

/// Stricter threshold applied when re-matching a generated suggestion
pub const AI_ASSIST_THRESHOLD: f64 = 0.6;

/// Result of a best-match scan
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch<'a> {
    /// Best candidate, absent if below threshold or no candidates
    pub candidate: Option<&'a str>,
    /// Highest score seen (0.0 for an empty candidate set)
    pub score: f64,
    /// Position of the best candidate in the input slice
    pub index: Option<usize>,
}

/// Similarity in [0, 1] between two names
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = strsim::levenshtein(&a, &b);
    1.0 - distance as f64 / max_len as f64
}

/// Find the highest-scoring candidate at or above `threshold`
///
/// Ties keep the earliest candidate so results are deterministic.
pub fn find_best_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    threshold: f64,
) -> BestMatch<'a> {
    let mut best: Option<(usize, f64)> = None;

    for (i, candidate) in candidates.iter().enumerate() {
        let score = similarity(query, candidate.as_ref());
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((i, score)),
        }
    }

    match best {
        Some((i, score)) if score >= threshold => BestMatch {
            candidate: Some(candidates[i].as_ref()),
            score,
            index: Some(i),
        },
        Some((_, score)) => BestMatch {
            candidate: None,
            score,
            index: None,
        },
        None => BestMatch {
            candidate: None,
            score: 0.0,
            index: None,
        },
    }
}
