use chrono::NaiveDate;
use serde::Serialize;

use crate::day_schedule::ExtractionOutcome;
use crate::evaluator::{evaluate, PowerStatus};
use crate::group::GroupCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownReason {
    NoScheduleForDate,
    GroupNotListed,
}

/// What the display is told about a group: a known status, or explicitly unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PowerReport {
    Known {
        group: String,
        date: NaiveDate,
        status: PowerStatus,
        updated_at: Option<String>,
        unparsed_text: Option<String>,
    },
    Unknown {
        group: String,
        date: NaiveDate,
        reason: UnknownReason,
    },
}

impl PowerReport {
    /// A missing tomorrow only means no outages are known for it; a missing today
    /// leaves the status unknown rather than defaulting to power.
    pub fn compose(
        group: &GroupCode,
        today: &ExtractionOutcome,
        tomorrow: &ExtractionOutcome,
        now_seconds: u32,
    ) -> PowerReport {
        let group_label = group.display_label();
        match today {
            ExtractionOutcome::Found(schedule) => PowerReport::Known {
                group: group_label,
                date: schedule.date,
                status: evaluate(schedule.intervals(), tomorrow.intervals(), now_seconds),
                updated_at: schedule.updated_at.clone(),
                unparsed_text: schedule.outages.unparsed_text().map(str::to_owned),
            },
            ExtractionOutcome::NoScheduleForDate { date } => PowerReport::Unknown {
                group: group_label,
                date: *date,
                reason: UnknownReason::NoScheduleForDate,
            },
            ExtractionOutcome::GroupNotListed { date, .. } => PowerReport::Unknown {
                group: group_label,
                date: *date,
                reason: UnknownReason::GroupNotListed,
            },
        }
    }

    pub fn has_power(&self) -> Option<bool> {
        match self {
            PowerReport::Known { status, .. } => Some(status.has_power),
            PowerReport::Unknown { .. } => None,
        }
    }

    pub fn status(&self) -> Option<&PowerStatus> {
        match self {
            PowerReport::Known { status, .. } => Some(status),
            PowerReport::Unknown { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PowerReport, UnknownReason};
    use crate::day_schedule::{DaySchedule, ExtractionOutcome};
    use crate::extractor::ScheduleMetadata;
    use crate::group::{GroupCode, GroupToken};
    use crate::intervals::GroupOutages;
    use chrono::NaiveDate;
    use shared_kernel::date_time::time_frame::TimeFrame;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn found(day: u32, outages: GroupOutages) -> ExtractionOutcome {
        ExtractionOutcome::Found(DaySchedule {
            date: date(day),
            updated_at: Some("08:00 05.03.2025".to_owned()),
            header_date: Some(date(day)),
            group: GroupToken::from("3.1"),
            outages,
            image_path: None,
        })
    }

    #[test]
    fn test_missing_tomorrow_still_gives_a_known_status() {
        let today = found(
            5,
            GroupOutages::Scheduled {
                intervals: vec![TimeFrame::new(
                    "22:00".parse().unwrap(),
                    "24:00".parse().unwrap(),
                )],
            },
        );
        let tomorrow = ExtractionOutcome::NoScheduleForDate { date: date(6) };

        let report = PowerReport::compose(&GroupCode::from("31"), &today, &tomorrow, 23 * 3600);

        assert_eq!(report.has_power(), Some(false));
        assert_eq!(
            report.status().and_then(|status| status.seconds_until_change),
            Some(3600)
        );
    }

    #[test]
    fn test_missing_group_is_unknown_not_powered() {
        let today = ExtractionOutcome::GroupNotListed {
            date: date(5),
            metadata: ScheduleMetadata::default(),
        };
        let tomorrow = found(6, GroupOutages::PowerAvailable);

        let report = PowerReport::compose(&GroupCode::from("62"), &today, &tomorrow, 0);

        assert_eq!(report.has_power(), None);
        assert_eq!(
            report,
            PowerReport::Unknown {
                group: "6.2".to_owned(),
                date: date(5),
                reason: UnknownReason::GroupNotListed,
            }
        );
    }

    #[test]
    fn test_unrecognised_block_assumes_power_and_keeps_the_text() {
        let today = found(
            5,
            GroupOutages::Unrecognised {
                raw_text: "Група 3.1. ???".to_owned(),
            },
        );
        let tomorrow = ExtractionOutcome::NoScheduleForDate { date: date(6) };

        let report = PowerReport::compose(&GroupCode::from("31"), &today, &tomorrow, 0);

        assert_eq!(report.has_power(), Some(true));
        match report {
            PowerReport::Known { unparsed_text, .. } => {
                assert_eq!(unparsed_text.as_deref(), Some("Група 3.1. ???"))
            }
            PowerReport::Unknown { .. } => panic!("Expected a known report"),
        }
    }
}
