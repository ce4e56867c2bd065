//! Local Dataset Loading
//!
//! Reads the static plant table from CSV (via Polars) or JSON (via serde_json)
//! and converts each row to a canonical `PlantRecord`.
//!
//! Expected columns / keys:
//!   name, region, growing_months, season, soil_requirements,
//!   bloom_harvest_time, sunlight_needs, care_instructions, image
//! Only `name` is required; missing columns read as empty.

use crate::error::DatasetError;
use crate::record::{LocalPlantRow, PlantRecord};
use polars::prelude::*;
use std::path::Path;

/// Load plant records from a CSV or JSON file, chosen by extension
pub fn load_records(path: &Path) -> Result<Vec<PlantRecord>, DatasetError> {
    std::fs::metadata(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(DatasetError::UnsupportedFormat(other.to_string())),
    }
}

/// Load from CSV, reading every column as text
pub fn load_csv(path: &Path) -> Result<Vec<PlantRecord>, DatasetError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    records_from_dataframe(&df)
}

/// Load from a JSON array of row objects
pub fn load_json(path: &Path) -> Result<Vec<PlantRecord>, DatasetError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_json(&contents)
}

/// Parse a JSON array of row objects
pub fn parse_json(contents: &str) -> Result<Vec<PlantRecord>, DatasetError> {
    let rows: Vec<LocalPlantRow> = serde_json::from_str(contents)?;
    Ok(rows.into_iter().filter_map(LocalPlantRow::into_record).collect())
}

fn records_from_dataframe(df: &DataFrame) -> Result<Vec<PlantRecord>, DatasetError> {
    let names = df
        .column("name")
        .map_err(|_| DatasetError::MissingColumn("name"))?
        .str()?;

    // Optional text columns
    macro_rules! get_str_col {
        ($name:expr) => {
            df.column($name).ok().and_then(|c| c.str().ok())
        };
    }

    macro_rules! get_val {
        ($col:expr, $i:expr) => {
            $col.and_then(|c| c.get($i)).unwrap_or("").to_string()
        };
    }

    let region = get_str_col!("region");
    let growing_months = get_str_col!("growing_months");
    let season = get_str_col!("season");
    let soil_requirements = get_str_col!("soil_requirements");
    let bloom_harvest_time = get_str_col!("bloom_harvest_time");
    let sunlight_needs = get_str_col!("sunlight_needs");
    let care_instructions = get_str_col!("care_instructions");
    let image = get_str_col!("image");

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = LocalPlantRow {
            name: names.get(i).unwrap_or("").to_string(),
            region: get_val!(region, i),
            growing_months: get_val!(growing_months, i),
            season: get_val!(season, i),
            soil_requirements: get_val!(soil_requirements, i),
            bloom_harvest_time: get_val!(bloom_harvest_time, i),
            sunlight_needs: get_val!(sunlight_needs, i),
            care_instructions: get_val!(care_instructions, i),
            image: image.and_then(|c| c.get(i)).map(|s| s.to_string()),
        };

        if let Some(record) = row.into_record() {
            records.push(record);
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceTier;

    #[test]
    fn test_parse_json_skips_nameless_rows() {
        let json = r#"[
            {"name": "Marigold", "bloom_harvest_time": "50-60 days", "growing_months": "March, April"},
            {"name": "", "region": "Nowhere"},
            {"region": "Also nowhere"}
        ]"#;
        let records = parse_json(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Marigold");
        assert_eq!(records[0].source_tier, SourceTier::Local);
        assert_eq!(records[0].season, "");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plants.xlsx");
        std::fs::write(&path, "irrelevant").unwrap();
        assert!(matches!(
            load_records(&path),
            Err(DatasetError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_records(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }
}
