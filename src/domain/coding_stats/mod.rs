//! Coding statistics domain - Language shares per lookback window

mod entity;
mod source;

pub use entity::{CodingStat, LanguageShare, StatsRange, DEFAULT_TOTAL_TIME_TEXT, TOP_LANGUAGES};
pub use source::CodingStatsSource;

#[cfg(test)]
pub use source::mock;
