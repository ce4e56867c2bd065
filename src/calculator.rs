//! Bloom Calculator
//!
//! End-to-end calculation: validate input, resolve the plant through the
//! tiers, normalize its timing text, then lay out the bloom window.

use crate::bloom::{self, BloomProfile};
use crate::error::CalculationError;
use crate::record::{PlantRecord, SourceTier};
use crate::resolver::PlantResolver;
use crate::timeline::{compute_timeline, TimelineResult};
use crate::utils::months::Month;
use serde::Serialize;
use std::sync::Arc;

/// Tagged calculation result; "not found" is a normal outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BloomCalculation {
    Found {
        plant: PlantRecord,
        profile: BloomProfile,
        timeline: TimelineResult,
        source_tier: SourceTier,
        corrected_from: Option<String>,
        suggested_name: Option<String>,
    },
    NotFound {
        query: String,
    },
}

#[derive(Clone)]
pub struct BloomCalculator {
    resolver: Arc<PlantResolver>,
}

impl BloomCalculator {
    pub fn new(resolver: Arc<PlantResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PlantResolver {
        &self.resolver
    }

    pub async fn calculate(&self, query: &str, sowing_month: &str) -> Result<BloomCalculation, CalculationError> {
        if query.trim().is_empty() {
            return Err(CalculationError::InvalidQuery);
        }
        let month = Month::parse(sowing_month)
            .ok_or_else(|| CalculationError::InvalidMonth(sowing_month.trim().to_string()))?;

        let resolution = self.resolver.resolve(query).await?;

        let (Some(plant), Some(source_tier)) = (resolution.matched_record, resolution.source_tier) else {
            return Ok(BloomCalculation::NotFound { query: resolution.query });
        };

        let profile = bloom::normalize(&plant);
        let timeline = compute_timeline(month, &profile);

        tracing::debug!(
            "{} sown in {}: bloom {} to {}",
            plant.name,
            month,
            timeline.bloom_start_month,
            timeline.bloom_end_month
        );

        Ok(BloomCalculation::Found {
            plant,
            profile,
            timeline,
            source_tier,
            corrected_from: resolution.corrected_from,
            suggested_name: resolution.suggested_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_index::LocalIndex;

    fn marigold() -> PlantRecord {
        PlantRecord {
            name: "Marigold".to_string(),
            region: "Temperate".to_string(),
            growing_months: "March, April, May".to_string(),
            season: "Spring".to_string(),
            soil_requirements: "Well-drained".to_string(),
            bloom_harvest_time: "45-55 days".to_string(),
            sunlight_needs: "Full sun".to_string(),
            care_instructions: "Water regularly, Deadhead flowers".to_string(),
            image: None,
            source_tier: SourceTier::Local,
        }
    }

    fn calculator() -> BloomCalculator {
        let index = LocalIndex::new(vec![marigold()]);
        BloomCalculator::new(Arc::new(PlantResolver::new(Arc::new(index))))
    }

    #[tokio::test]
    async fn test_found_with_correction() {
        let result = calculator().calculate("Merigold", "march").await.unwrap();
        match result {
            BloomCalculation::Found { plant, profile, timeline, source_tier, corrected_from, .. } => {
                assert_eq!(plant.name, "Marigold");
                assert_eq!(source_tier, SourceTier::Local);
                assert_eq!(corrected_from.as_deref(), Some("Merigold"));
                // 7 + 50 = 57 days -> 2 months; 60 days bloom -> 2 months
                assert_eq!(profile.days_to_maturity, 50);
                assert_eq!(timeline.bloom_start_month, Month::May);
                assert_eq!(timeline.bloom_end_month, Month::July);
                assert_eq!(profile.care_tips.len(), 2);
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_not_an_error() {
        let result = calculator().calculate("Xyzzyplant", "June").await.unwrap();
        assert_eq!(result, BloomCalculation::NotFound { query: "Xyzzyplant".to_string() });
    }

    #[tokio::test]
    async fn test_invalid_inputs() {
        let calc = calculator();
        assert_eq!(calc.calculate("", "June").await, Err(CalculationError::InvalidQuery));
        assert_eq!(
            calc.calculate("Marigold", "Juneteenth").await,
            Err(CalculationError::InvalidMonth("Juneteenth".to_string()))
        );
    }
}
