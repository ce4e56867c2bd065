//! Timeline Calculator
//!
//! Month-granular bloom window from a sowing month and a bloom profile:
//!   months_to_bloom = ceil((germination + maturity) / 30)
//!   bloom_start     = sowing + months_to_bloom            (mod 12)
//!   bloom_end       = bloom_start + ceil(duration / 30)   (mod 12)

use crate::bloom::{BloomProfile, DAYS_PER_MONTH};
use crate::utils::months::Month;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineResult {
    pub sowing_month: Month,
    pub bloom_start_month: Month,
    pub bloom_end_month: Month,
    pub total_days_to_first_bloom: u32,
    pub months_to_bloom: u32,
}

/// Whole months needed to cover `days`, rounding up
pub fn days_to_months(days: u32) -> u32 {
    days.div_ceil(DAYS_PER_MONTH)
}

pub fn compute_timeline(sowing_month: Month, profile: &BloomProfile) -> TimelineResult {
    let total_days = profile.days_to_germination.saturating_add(profile.days_to_maturity);
    let months_to_bloom = days_to_months(total_days);

    let bloom_start_month = sowing_month.add_months(months_to_bloom as usize);
    let bloom_end_month = bloom_start_month.add_months(days_to_months(profile.bloom_duration_days) as usize);

    TimelineResult {
        sowing_month,
        bloom_start_month,
        bloom_end_month,
        total_days_to_first_bloom: total_days,
        months_to_bloom,
    }
}
