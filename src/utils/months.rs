//! Month Labels
//!
//! Twelve fixed calendar months used for coarse scheduling. No year, no
//! day precision; arithmetic wraps modulo 12.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based position in the calendar (January = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Month {
        Month::ALL[index % 12]
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Parse a full name, a three-letter abbreviation, or a number 1-12
    pub fn parse(input: &str) -> Option<Month> {
        let s = input.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }

        if let Ok(n) = s.parse::<usize>() {
            return (1..=12).contains(&n).then(|| Month::ALL[n - 1]);
        }

        Month::ALL.iter().copied().find(|m| {
            let full = m.name().to_lowercase();
            s == full || (s.len() == 3 && full.starts_with(&s))
        })
    }

    /// Advance by `months`, wrapping across the year boundary
    pub fn add_months(self, months: usize) -> Month {
        Month::from_index(self.index() + months % 12)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
