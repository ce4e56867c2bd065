//! Local Dataset Index
//!
//! In-memory plant table loaded once at startup and read-only afterwards.
//! Name lookup runs three steps, first success wins:
//! 1. Exact case-insensitive match
//! 2. Containment (record name contains the query, or the query contains it)
//! 3. Fuzzy match over all names above a similarity threshold
//!
//! The same three-step matcher is reused by the remote cache.

use crate::data;
use crate::error::DatasetError;
use crate::record::{normalize_name, PlantRecord};
use crate::utils::similarity::{find_best_match, similarity, FUZZY_THRESHOLD};
use rustc_hash::FxHashMap;
use std::path::Path;

/// Which lookup step produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Contains,
    Fuzzy,
}

/// A record found by name
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch<'a> {
    pub record: &'a PlantRecord,
    pub kind: MatchKind,
    pub score: f64,
}

impl NameMatch<'_> {
    /// Canonical name to report back, only for fuzzy hits that differ from the query
    pub fn suggested_name(&self, query: &str) -> Option<String> {
        if self.kind == MatchKind::Fuzzy && normalize_name(&self.record.name) != normalize_name(query) {
            Some(self.record.name.clone())
        } else {
            None
        }
    }
}

/// Result of `LocalIndex::lookup`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalLookup<'a> {
    pub record: Option<&'a PlantRecord>,
    pub suggested_name: Option<String>,
}

/// Run the three-step name match over records in order
pub fn match_name<'a>(
    query: &str,
    records: &'a [PlantRecord],
    threshold: f64,
) -> Option<NameMatch<'a>> {
    let key = normalize_name(query);
    if key.is_empty() {
        return None;
    }

    if let Some(record) = records.iter().find(|r| r.normalized_name() == key) {
        return Some(NameMatch { record, kind: MatchKind::Exact, score: 1.0 });
    }

    match_partial(&key, records, threshold)
}

/// Steps 2 and 3 only; `key` must already be normalized
fn match_partial<'a>(
    key: &str,
    records: &'a [PlantRecord],
    threshold: f64,
) -> Option<NameMatch<'a>> {
    if let Some(record) = records.iter().find(|r| {
        let name = r.normalized_name();
        !name.is_empty() && (name.contains(key) || key.contains(name.as_str()))
    }) {
        let score = similarity(key, &record.name);
        return Some(NameMatch { record, kind: MatchKind::Contains, score });
    }

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let best = find_best_match(key, &names, threshold);
    best.index.map(|i| NameMatch {
        record: &records[i],
        kind: MatchKind::Fuzzy,
        score: best.score,
    })
}

/// Immutable index over the local plant table
#[derive(Debug, Default)]
pub struct LocalIndex {
    records: Vec<PlantRecord>,
    /// Normalized name -> first record position
    by_name: FxHashMap<String, usize>,
}

impl LocalIndex {
    pub fn new(records: Vec<PlantRecord>) -> Self {
        let mut by_name = FxHashMap::default();
        for (i, record) in records.iter().enumerate() {
            by_name.entry(record.normalized_name()).or_insert(i);
        }
        Self { records, by_name }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a CSV or JSON file
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let records = data::load_records(path)?;
        tracing::info!("Loaded {} local plant records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    /// Load, falling back to an empty index so downstream tiers still run
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("Local dataset unavailable ({}), continuing with empty index", e);
                Self::empty()
            }
        }
    }

    /// Default lookup at the plain fuzzy threshold
    pub fn lookup(&self, name: &str) -> LocalLookup<'_> {
        match self.find(name, FUZZY_THRESHOLD) {
            Some(hit) => LocalLookup {
                suggested_name: hit.suggested_name(name),
                record: Some(hit.record),
            },
            None => LocalLookup { record: None, suggested_name: None },
        }
    }

    /// Three-step lookup with an explicit fuzzy threshold
    pub fn find(&self, name: &str, threshold: f64) -> Option<NameMatch<'_>> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }

        if let Some(&i) = self.by_name.get(&key) {
            return Some(NameMatch {
                record: &self.records[i],
                kind: MatchKind::Exact,
                score: 1.0,
            });
        }

        match_partial(&key, &self.records, threshold)
    }

    /// Ranked candidates for typeahead: exact, then containment, then fuzzy by score
    pub fn search(&self, query: &str, limit: usize) -> Vec<&PlantRecord> {
        let key = normalize_name(query);
        if key.is_empty() || limit == 0 {
            return vec![];
        }

        let mut results: Vec<&PlantRecord> = Vec::new();
        let mut seen = vec![false; self.records.len()];

        if let Some(&i) = self.by_name.get(&key) {
            seen[i] = true;
            results.push(&self.records[i]);
        }

        for (i, record) in self.records.iter().enumerate() {
            if results.len() >= limit {
                return results;
            }
            let name = record.normalized_name();
            if !seen[i] && (name.contains(&key) || key.contains(name.as_str())) {
                seen[i] = true;
                results.push(record);
            }
        }

        let mut fuzzy: Vec<(usize, f64)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(i, _)| !seen[*i])
            .map(|(i, r)| (i, similarity(&key, &r.name)))
            .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
            .collect();
        // Stable sort keeps dataset order among equal scores
        fuzzy.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        results.extend(fuzzy.into_iter().map(|(i, _)| &self.records[i]));
        results.truncate(limit);
        results
    }

    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
