//! Trailing time windows used to scope history sub-requests

use chrono::{DateTime, Days, SecondsFormat, Utc};
use serde::Serialize;

/// Returns the instant exactly `days` calendar days before `now`
///
/// Calendar subtraction keeps the wall-clock time of day, matching how the
/// upstream APIs interpret "last N days".
pub fn window_since(days: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Derived parameters for a windowed sub-request; never cached on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowQuery {
    pub since: DateTime<Utc>,
    pub page_size: u32,
}

impl WindowQuery {
    pub fn last_days(days: u32, page_size: u32, now: DateTime<Utc>) -> Self {
        Self {
            since: window_since(days, now),
            page_size,
        }
    }

    /// ISO-8601 timestamp as expected by `since=` query parameters
    pub fn since_param(&self) -> String {
        self.since.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
