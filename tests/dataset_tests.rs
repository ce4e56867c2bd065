//! Local Dataset Integration Tests
//!
//! Writes small CSV / JSON tables to a temp dir and runs them through the
//! loader, the index and the full calculator.

use bloom_planner::calculator::{BloomCalculation, BloomCalculator};
use bloom_planner::data;
use bloom_planner::{LocalIndex, Month, PlantResolver, SourceTier};
use std::io::Write;
use std::sync::Arc;

const PLANTS_CSV: &str = "\
name,region,growing_months,season,soil_requirements,bloom_harvest_time,sunlight_needs,care_instructions,image
Marigold,Temperate,\"March, April, May\",Spring,Well-drained,50-60 days,Full sun,\"Water regularly, Deadhead spent flowers\",https://img.example/marigold.jpg
Lavender,Mediterranean,\"April, May\",Spring,Sandy,3 months,Full sun,,
Chrysanthemum,Temperate,\"July, August, September\",Autumn,Loamy,,Partial shade,Pinch back in early summer,
,Nowhere,,,,,,,
";

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_csv_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "plants.csv", PLANTS_CSV);

    let records = data::load_records(&path).unwrap();
    assert_eq!(records.len(), 3);

    let marigold = &records[0];
    assert_eq!(marigold.name, "Marigold");
    assert_eq!(marigold.growing_months, "March, April, May");
    assert_eq!(marigold.bloom_harvest_time, "50-60 days");
    assert_eq!(marigold.image.as_deref(), Some("https://img.example/marigold.jpg"));
    assert_eq!(marigold.source_tier, SourceTier::Local);

    assert_eq!(records[1].care_instructions, "");
    assert_eq!(records[1].image, None);
}

#[test]
fn test_load_csv_without_optional_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "minimal.csv", "name,bloom_harvest_time\nBasil,60 days\n");

    let records = data::load_records(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].bloom_harvest_time, "60 days");
    assert_eq!(records[0].region, "");
}

#[test]
fn test_csv_without_name_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "bad.csv", "plant,region\nBasil,Tropical\n");

    assert!(data::load_records(&path).is_err());
    // ...but the index still comes up, empty
    assert!(LocalIndex::load_or_empty(&path).is_empty());
}

#[test]
fn test_load_json_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "plants.json",
        r#"[{"name": "Sunflower", "bloom_harvest_time": "70-100 days", "image": null}]"#,
    );

    let index = LocalIndex::load(&path).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup("sunflower").record.map(|r| r.name.as_str()), Some("Sunflower"));
}

#[tokio::test]
async fn test_calculation_from_csv_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "plants.csv", PLANTS_CSV);
    let index = Arc::new(LocalIndex::load(&path).unwrap());
    let calculator = BloomCalculator::new(Arc::new(PlantResolver::new(index)));

    // Lavender: "3 months" = 90 days, + 7 germination = 97 -> 4 months
    match calculator.calculate("lavendar", "Oct").await.unwrap() {
        BloomCalculation::Found { plant, profile, timeline, .. } => {
            assert_eq!(plant.name, "Lavender");
            assert_eq!(profile.days_to_maturity, 90);
            assert_eq!(timeline.total_days_to_first_bloom, 97);
            assert_eq!(timeline.bloom_start_month, Month::February);
            assert_eq!(timeline.bloom_end_month, Month::April);
            // No care instructions -> four generated tips
            assert_eq!(profile.care_tips.len(), 4);
        }
        other => panic!("expected Found, got {:?}", other),
    }

    // Chrysanthemum has no bloom text: three growing months -> 90 days
    match calculator.calculate("Chrysanthemum", "5").await.unwrap() {
        BloomCalculation::Found { profile, timeline, .. } => {
            assert_eq!(profile.days_to_maturity, 90);
            assert_eq!(profile.care_tips, vec!["Pinch back in early summer"]);
            assert_eq!(timeline.bloom_start_month, Month::September);
        }
        other => panic!("expected Found, got {:?}", other),
    }
}
