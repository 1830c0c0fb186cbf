//! Coding statistics sources - Wakapi and WakaTime

mod factory;
mod types;
mod wakapi;
mod wakatime;

pub use factory::CodingStatsSourceFactory;
pub use wakapi::{WakapiClient, DEFAULT_WAKAPI_BASE_URL};
pub use wakatime::{WakatimeClient, DEFAULT_WAKATIME_BASE_URL};
