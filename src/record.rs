//! Canonical Plant Record
//!
//! One record shape shared by every tier. Tier-specific rows (local CSV/JSON
//! rows, remote store JSON) are converted here at the boundary so that field
//! naming differences never reach the resolver or the normalizer.

use serde::{Deserialize, Serialize};

/// Which data source supplied a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTier {
    /// Static dataset loaded once at startup
    Local,
    /// Persistent record store, fetched per query
    Remote,
    /// Name proposed by the generative suggestion endpoint
    Generated,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Local => "Local",
            SourceTier::Remote => "Remote",
            SourceTier::Generated => "Generated",
        }
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plant record as seen by the resolver and the bloom normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub name: String,
    pub region: String,
    /// Free text, usually a comma-separated month list ("March, April, May")
    pub growing_months: String,
    pub season: String,
    pub soil_requirements: String,
    /// Free text such as "60-90 days" or "3 months"
    pub bloom_harvest_time: String,
    pub sunlight_needs: String,
    /// Comma-delimited care tips
    pub care_instructions: String,
    pub image: Option<String>,
    pub source_tier: SourceTier,
}

impl PlantRecord {
    /// Name used for case-insensitive identity within a tier
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Trim and lower-case a plant name for keying and comparison
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Row shape of the local dataset (CSV columns / JSON keys)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalPlantRow {
    pub name: String,
    pub region: String,
    pub growing_months: String,
    pub season: String,
    pub soil_requirements: String,
    pub bloom_harvest_time: String,
    pub sunlight_needs: String,
    pub care_instructions: String,
    pub image: Option<String>,
}

impl LocalPlantRow {
    /// Convert to a canonical record; rows without a name are dropped
    pub fn into_record(self) -> Option<PlantRecord> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return None;
        }

        Some(PlantRecord {
            name,
            region: self.region.trim().to_string(),
            growing_months: self.growing_months.trim().to_string(),
            season: self.season.trim().to_string(),
            soil_requirements: self.soil_requirements.trim().to_string(),
            bloom_harvest_time: self.bloom_harvest_time.trim().to_string(),
            sunlight_needs: self.sunlight_needs.trim().to_string(),
            care_instructions: self.care_instructions.trim().to_string(),
            image: clean_optional(self.image),
            source_tier: SourceTier::Local,
        })
    }
}

/// Growing months arrive either as one string or as a list of month names
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MonthList {
    Text(String),
    List(Vec<String>),
}

impl Default for MonthList {
    fn default() -> Self {
        MonthList::Text(String::new())
    }
}

impl MonthList {
    fn into_text(self) -> String {
        match self {
            MonthList::Text(s) => s.trim().to_string(),
            MonthList::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Row shape returned by the remote record store (camelCase JSON)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemotePlantRow {
    #[serde(alias = "name")]
    pub plant_name: String,
    pub region: String,
    pub growing_months: MonthList,
    pub season: String,
    pub soil_requirements: String,
    pub bloom_harvest_time: String,
    pub sunlight_needs: String,
    pub care_instructions: String,
    #[serde(alias = "image")]
    pub image_url: Option<String>,
}

impl RemotePlantRow {
    pub fn into_record(self) -> Option<PlantRecord> {
        let name = self.plant_name.trim().to_string();
        if name.is_empty() {
            return None;
        }

        Some(PlantRecord {
            name,
            region: self.region.trim().to_string(),
            growing_months: self.growing_months.into_text(),
            season: self.season.trim().to_string(),
            soil_requirements: self.soil_requirements.trim().to_string(),
            bloom_harvest_time: self.bloom_harvest_time.trim().to_string(),
            sunlight_needs: self.sunlight_needs.trim().to_string(),
            care_instructions: self.care_instructions.trim().to_string(),
            image: clean_optional(self.image_url),
            source_tier: SourceTier::Remote,
        })
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_row_drops_blank_name() {
        let row = LocalPlantRow {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(row.into_record().is_none());
    }

    #[test]
    fn test_remote_row_camel_case_and_month_list() {
        let json = r#"{
            "plantName": " Sunflower ",
            "growingMonths": ["April", "May", " ", "June"],
            "bloomHarvestTime": "70-100 days",
            "sunlightNeeds": "Full sun",
            "imageUrl": ""
        }"#;
        let row: RemotePlantRow = serde_json::from_str(json).unwrap();
        let record = row.into_record().unwrap();

        assert_eq!(record.name, "Sunflower");
        assert_eq!(record.growing_months, "April, May, June");
        assert_eq!(record.bloom_harvest_time, "70-100 days");
        assert_eq!(record.image, None);
        assert_eq!(record.source_tier, SourceTier::Remote);
    }

    #[test]
    fn test_remote_row_accepts_plain_name_field() {
        let row: RemotePlantRow =
            serde_json::from_str(r#"{"name": "Basil", "growingMonths": "May, June"}"#).unwrap();
        let record = row.into_record().unwrap();
        assert_eq!(record.name, "Basil");
        assert_eq!(record.growing_months, "May, June");
    }
}
