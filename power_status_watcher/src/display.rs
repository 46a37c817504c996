use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use outage_schedule::{DaySchedule, PowerReport};

/// Receives what the watcher wants shown.
#[cfg_attr(test, automock)]
pub trait StatusDisplay: Send + Sync {
    fn show_status(&self, report: &PowerReport);

    fn schedule_updated(&self, schedule: &DaySchedule);

    /// Only called when there is no earlier schedule to fall back to.
    fn show_error(&self, error: &anyhow::Error);
}

/// Renders a countdown as `HH:MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}

fn format_outages(schedule: &DaySchedule) -> String {
    schedule
        .intervals()
        .iter()
        .map(|interval| format!("{}–{}", interval.from, interval.to))
        .join(", ")
}

/// Writes every update to the trace log.
pub struct LogDisplay;

impl StatusDisplay for LogDisplay {
    fn show_status(&self, report: &PowerReport) {
        match report {
            PowerReport::Known {
                group,
                date,
                status,
                updated_at,
                ..
            } => {
                let countdown = status
                    .seconds_until_change
                    .map(format_countdown)
                    .unwrap_or_else(|| "--:--:--".to_owned());
                let interval = status
                    .active_or_next
                    .map(|interval| interval.to_string())
                    .unwrap_or_default();
                tracing::info!(
                    %group,
                    %date,
                    has_power = status.has_power,
                    %countdown,
                    %interval,
                    updated_at = updated_at.as_deref().unwrap_or_default(),
                    "Power status"
                );
            }
            PowerReport::Unknown {
                group,
                date,
                reason,
            } => {
                tracing::info!(%group, %date, ?reason, "Power status unknown");
            }
        }
    }

    fn schedule_updated(&self, schedule: &DaySchedule) {
        tracing::info!(
            group = %schedule.group,
            date = %schedule.date,
            outages = %format_outages(schedule),
            "Schedule updated"
        );
    }

    fn show_error(&self, error: &anyhow::Error) {
        tracing::error!("Could not load the outage schedule: {error:?}");
    }
}
