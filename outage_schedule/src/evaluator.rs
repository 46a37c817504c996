use serde::Serialize;
use shared_kernel::date_time::time_of_day::SECONDS_PER_DAY;

use crate::intervals::OutageInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerStatus {
    pub has_power: bool,
    /// The outage in progress when off, the next known one when on.
    pub active_or_next: Option<OutageInterval>,
    /// `None` when no outage is known in either day.
    pub seconds_until_change: Option<u32>,
}

/// Power state at `now_seconds` (local seconds since midnight) from today's and
/// tomorrow's outages. An outage running to the end of today is stitched with a
/// tomorrow outage starting at midnight; no further chaining is done.
pub fn evaluate(
    today: &[OutageInterval],
    tomorrow: &[OutageInterval],
    now_seconds: u32,
) -> PowerStatus {
    if let Some(active) = today.iter().find(|interval| interval.contains(now_seconds)) {
        let mut seconds_until_change = active.end_seconds() - now_seconds;
        if active.ends_at_day_boundary() {
            if let Some(continuation) = tomorrow.iter().find(|interval| interval.starts_at_midnight()) {
                seconds_until_change += continuation.duration_seconds();
            }
        }
        return PowerStatus {
            has_power: false,
            active_or_next: Some(*active),
            seconds_until_change: Some(seconds_until_change),
        };
    }

    let upcoming_today = today
        .iter()
        .filter(|interval| interval.start_seconds() > now_seconds)
        .min_by_key(|interval| interval.start_seconds() - now_seconds);
    if let Some(next) = upcoming_today {
        return PowerStatus {
            has_power: true,
            active_or_next: Some(*next),
            seconds_until_change: Some(next.start_seconds() - now_seconds),
        };
    }

    match tomorrow.first() {
        Some(next) => PowerStatus {
            has_power: true,
            active_or_next: Some(*next),
            seconds_until_change: Some(
                SECONDS_PER_DAY.saturating_sub(now_seconds) + next.start_seconds(),
            ),
        },
        None => PowerStatus {
            has_power: true,
            active_or_next: None,
            seconds_until_change: None,
        },
    }
}
