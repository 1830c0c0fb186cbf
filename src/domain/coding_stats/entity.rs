//! Coding time statistics entities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Number of languages kept in a summary
pub const TOP_LANGUAGES: usize = 5;

/// Fallback text when the upstream reports no readable total
pub const DEFAULT_TOTAL_TIME_TEXT: &str = "Total coding time";

/// Lookback windows supported by the coding-time upstreams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsRange {
    #[default]
    Last7Days,
    Last30Days,
    Last6Months,
    LastYear,
}

impl StatsRange {
    pub const ALL: [StatsRange; 4] = [
        StatsRange::Last7Days,
        StatsRange::Last30Days,
        StatsRange::Last6Months,
        StatsRange::LastYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsRange::Last7Days => "last_7_days",
            StatsRange::Last30Days => "last_30_days",
            StatsRange::Last6Months => "last_6_months",
            StatsRange::LastYear => "last_year",
        }
    }

    /// Parses an optional query value, falling back to the default window
    /// for anything missing or unrecognized
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for StatsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatsRange::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| DomainError::bad_request(format!("Unknown stats range '{}'", s)))
    }
}

/// Share of coding time spent in one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub percent: f64,
    #[serde(rename = "total")]
    pub total_time_text: String,
}

/// Top languages and total coding time over a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingStat {
    pub languages: Vec<LanguageShare>,
    #[serde(rename = "total_time")]
    pub total_time_text: String,
    pub range: StatsRange,
}

impl CodingStat {
    /// Builds a summary sorted by descending percent and truncated to the top languages
    pub fn summarize(
        mut languages: Vec<LanguageShare>,
        total_time_text: impl Into<String>,
        range: StatsRange,
    ) -> Self {
        languages.sort_by(|a, b| b.percent.total_cmp(&a.percent));
        languages.truncate(TOP_LANGUAGES);

        let total_time_text = total_time_text.into();
        let total_time_text = if total_time_text.trim().is_empty() {
            DEFAULT_TOTAL_TIME_TEXT.to_string()
        } else {
            total_time_text
        };

        Self {
            languages,
            total_time_text,
            range,
        }
    }
}
