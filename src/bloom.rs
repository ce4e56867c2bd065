//! Bloom Data Normalizer
//!
//! Converts the free-text timing fields of a `PlantRecord` into numeric day
//! counts. `bloom_harvest_time` is parsed case-insensitively, first rule wins:
//! 1. Range "<min>-<max> days|months" -> mean of the bounds
//! 2. Single "<n> days|months"
//! 3. Count of comma-separated `growing_months` entries x 30
//! 4. Fixed default
//!
//! Germination and bloom duration are fixed constants for every plant.

use crate::record::PlantRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const DEFAULT_GERMINATION_DAYS: u32 = 7;
pub const DEFAULT_BLOOM_DURATION_DAYS: u32 = 60;
pub const DEFAULT_MATURITY_DAYS: u32 = 60;
pub const DAYS_PER_MONTH: u32 = 30;
/// Upper bound on parsed maturity (ten years)
pub const MAX_MATURITY_DAYS: u32 = 3650;

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:-|–|to)\s*(\d+(?:\.\d+)?)\s*(day|month)s?")
        .expect("valid range pattern")
});

static SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(day|month)s?").expect("valid single pattern")
});

/// Which rule produced `days_to_maturity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturitySource {
    Range,
    Single,
    GrowingMonths,
    Default,
}

/// Normalized timing and care guidance for one plant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BloomProfile {
    pub days_to_germination: u32,
    pub days_to_maturity: u32,
    pub bloom_duration_days: u32,
    pub care_tips: Vec<String>,
    pub maturity_source: MaturitySource,
}

pub fn normalize(record: &PlantRecord) -> BloomProfile {
    let (days_to_maturity, maturity_source) =
        parse_maturity(&record.bloom_harvest_time, &record.growing_months);

    BloomProfile {
        days_to_germination: DEFAULT_GERMINATION_DAYS,
        days_to_maturity,
        bloom_duration_days: DEFAULT_BLOOM_DURATION_DAYS,
        care_tips: care_tips(record),
        maturity_source,
    }
}

/// Days to maturity from bloom/harvest text, falling back to growing months
pub fn parse_maturity(bloom_harvest_time: &str, growing_months: &str) -> (u32, MaturitySource) {
    if let Some(caps) = RANGE_RE.captures(bloom_harvest_time) {
        let min: f64 = caps[1].parse().unwrap_or(0.0);
        let max: f64 = caps[2].parse().unwrap_or(0.0);
        let days = to_days((min + max) / 2.0, &caps[3]);
        return (days, MaturitySource::Range);
    }

    if let Some(caps) = SINGLE_RE.captures(bloom_harvest_time) {
        let n: f64 = caps[1].parse().unwrap_or(0.0);
        return (to_days(n, &caps[2]), MaturitySource::Single);
    }

    let month_count = split_list(growing_months).len() as u32;
    if month_count > 0 {
        let days = month_count.saturating_mul(DAYS_PER_MONTH).min(MAX_MATURITY_DAYS);
        return (days, MaturitySource::GrowingMonths);
    }

    (DEFAULT_MATURITY_DAYS, MaturitySource::Default)
}

fn to_days(value: f64, unit: &str) -> u32 {
    let days = if unit.eq_ignore_ascii_case("month") {
        value * DAYS_PER_MONTH as f64
    } else {
        value
    };
    days.round().clamp(0.0, MAX_MATURITY_DAYS as f64) as u32
}

/// Care tips from the record, or four generic tips when none are given
pub fn care_tips(record: &PlantRecord) -> Vec<String> {
    let tips: Vec<String> = split_list(&record.care_instructions)
        .into_iter()
        .map(str::to_string)
        .collect();

    if !tips.is_empty() {
        return tips;
    }

    vec![
        format!("Suited to growing conditions in {}.", or_general(&record.region, "most regions")),
        format!("Sow during the {} season.", or_general(&record.season, "recommended")),
        format!("Provide {} exposure.", or_general(&record.sunlight_needs, "adequate sunlight").to_lowercase()),
        format!("Plant in {}.", or_general(&record.soil_requirements, "well-drained soil").to_lowercase()),
    ]
}

fn split_list(text: &str) -> Vec<&str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn or_general<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceTier;

    fn record(bloom: &str, months: &str, care: &str) -> PlantRecord {
        PlantRecord {
            name: "Test".to_string(),
            region: "Temperate".to_string(),
            growing_months: months.to_string(),
            season: "Spring".to_string(),
            soil_requirements: "Loamy soil".to_string(),
            bloom_harvest_time: bloom.to_string(),
            sunlight_needs: "Full Sun".to_string(),
            care_instructions: care.to_string(),
            image: None,
            source_tier: SourceTier::Local,
        }
    }

    #[test]
    fn test_day_range_is_averaged() {
        assert_eq!(parse_maturity("60-90 days", ""), (75, MaturitySource::Range));
        assert_eq!(parse_maturity("Blooms 45 - 50 Days after sowing", ""), (48, MaturitySource::Range));
    }

    #[test]
    fn test_month_units_convert() {
        assert_eq!(parse_maturity("2-3 months", ""), (75, MaturitySource::Range));
        assert_eq!(parse_maturity("3 MONTHS", ""), (90, MaturitySource::Single));
        assert_eq!(parse_maturity("1 month", ""), (30, MaturitySource::Single));
    }

    #[test]
    fn test_single_days() {
        assert_eq!(parse_maturity("about 100 days", ""), (100, MaturitySource::Single));
    }

    #[test]
    fn test_huge_values_are_capped() {
        assert_eq!(parse_maturity("99999999999 days", ""), (MAX_MATURITY_DAYS, MaturitySource::Single));
        assert_eq!(parse_maturity("1-99999999999 months", ""), (MAX_MATURITY_DAYS, MaturitySource::Range));
    }

    #[test]
    fn test_growing_months_fallback() {
        assert_eq!(
            parse_maturity("Summer", "March, April, , May"),
            (90, MaturitySource::GrowingMonths)
        );
    }

    #[test]
    fn test_default_when_nothing_parses() {
        assert_eq!(parse_maturity("late summer", "  "), (60, MaturitySource::Default));
        assert_eq!(parse_maturity("", ""), (DEFAULT_MATURITY_DAYS, MaturitySource::Default));
    }

    #[test]
    fn test_normalize_constants() {
        let profile = normalize(&record("60-90 days", "", "Water weekly"));
        assert_eq!(profile.days_to_germination, 7);
        assert_eq!(profile.days_to_maturity, 75);
        assert_eq!(profile.bloom_duration_days, 60);
    }

    #[test]
    fn test_care_tips_split_and_trimmed() {
        let tips = care_tips(&record("", "", " Water weekly, , Deadhead spent blooms ,Mulch"));
        assert_eq!(tips, vec!["Water weekly", "Deadhead spent blooms", "Mulch"]);
    }

    #[test]
    fn test_care_tips_fallback_has_four_entries() {
        let tips = care_tips(&record("", "", "  ,  "));
        assert_eq!(tips.len(), 4);
        assert!(tips[0].contains("Temperate"));
        assert!(tips[1].contains("Spring"));
        assert!(tips[2].contains("full sun"));
        assert!(tips[3].contains("loamy soil"));
    }
}
