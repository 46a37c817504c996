use chrono::{Duration, NaiveDate};
use outage_schedule::{DaySchedule, ExtractionOutcome, GroupCode, PowerReport};
use shared_kernel::date_time::kyiv_date_time::KyivTZDateTime;

use crate::refresh::ScheduleSnapshot;

/// Identifies one refresh. Sequence numbers only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub sequence: u64,
    pub group: GroupCode,
    pub date: NaiveDate,
}

#[derive(Debug)]
pub enum TickOutcome {
    Publish(PowerReport),
    Refresh(RefreshTicket),
    Idle,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Applied {
        report: PowerReport,
        schedule_changed: bool,
    },
    /// A newer refresh already landed, or the group changed since this one started.
    Discarded,
    Failed {
        error: anyhow::Error,
        has_prior_schedule: bool,
    },
}

/// Everything one watcher knows: the selected group, the last schedule pair,
/// the last report and the refresh bookkeeping.
pub struct Session {
    group: GroupCode,
    today: Option<ExtractionOutcome>,
    tomorrow: Option<ExtractionOutcome>,
    last_report: Option<PowerReport>,
    next_sequence: u64,
    in_flight: Option<u64>,
    applied_sequence: Option<u64>,
    oldest_accepted_sequence: u64,
    retry_delay: Duration,
    retry_not_before: Option<KyivTZDateTime>,
    recheck_interval: Duration,
    last_applied_at: Option<KyivTZDateTime>,
}

impl Session {
    pub fn new(group: GroupCode, retry_delay: Duration, recheck_interval: Duration) -> Self {
        Session {
            group,
            today: None,
            tomorrow: None,
            last_report: None,
            next_sequence: 0,
            in_flight: None,
            applied_sequence: None,
            oldest_accepted_sequence: 0,
            retry_delay,
            retry_not_before: None,
            recheck_interval,
            last_applied_at: None,
        }
    }

    pub fn group(&self) -> &GroupCode {
        &self.group
    }

    pub fn today(&self) -> Option<&DaySchedule> {
        self.today.as_ref().and_then(ExtractionOutcome::schedule)
    }

    pub fn last_report(&self) -> Option<&PowerReport> {
        self.last_report.as_ref()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    fn is_cooling_down(&self, now: KyivTZDateTime) -> bool {
        self.retry_not_before
            .map_or(false, |not_before| now < not_before)
    }

    fn is_recheck_due(&self, now: KyivTZDateTime) -> bool {
        self.last_applied_at
            .map_or(false, |applied_at| now >= applied_at + self.recheck_interval)
    }

    /// Starts a refresh unless one is already outstanding.
    pub fn begin_refresh(&mut self, now: KyivTZDateTime) -> Option<RefreshTicket> {
        if self.in_flight.is_some() {
            return None;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.in_flight = Some(sequence);
        Some(RefreshTicket {
            sequence,
            group: self.group.clone(),
            date: now.date(),
        })
    }

    /// Switches to another group. Whatever was loaded or is still loading for the
    /// previous group is dropped.
    pub fn change_group(&mut self, group: GroupCode) {
        self.group = group;
        self.today = None;
        self.tomorrow = None;
        self.last_report = None;
        self.in_flight = None;
        self.retry_not_before = None;
        self.last_applied_at = None;
        self.oldest_accepted_sequence = self.next_sequence;
    }

    fn is_stale(&self, ticket: &RefreshTicket) -> bool {
        ticket.sequence < self.oldest_accepted_sequence
            || ticket.group != self.group
            || self
                .applied_sequence
                .map_or(false, |applied| applied > ticket.sequence)
    }

    fn compose(&self, now: KyivTZDateTime) -> Option<PowerReport> {
        let today = self.today.as_ref()?;
        let tomorrow = self
            .tomorrow
            .clone()
            .unwrap_or(ExtractionOutcome::NoScheduleForDate {
                date: today.date() + Duration::days(1),
            });
        Some(PowerReport::compose(
            &self.group,
            today,
            &tomorrow,
            now.seconds_from_midnight(),
        ))
    }

    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: anyhow::Result<ScheduleSnapshot>,
        now: KyivTZDateTime,
    ) -> RefreshOutcome {
        if self.in_flight == Some(ticket.sequence) {
            self.in_flight = None;
        }
        if self.is_stale(&ticket) {
            tracing::debug!("Discarding refresh {} for group {}", ticket.sequence, ticket.group);
            return RefreshOutcome::Discarded;
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(error) => {
                self.retry_not_before = Some(now + self.retry_delay);
                return RefreshOutcome::Failed {
                    error,
                    has_prior_schedule: self.today.is_some(),
                };
            }
        };

        let schedule_changed = match (self.today(), snapshot.today.schedule()) {
            (Some(previous), Some(current)) => {
                previous.date == current.date && previous.outages != current.outages
            }
            _ => false,
        };

        self.today = Some(snapshot.today);
        self.tomorrow = Some(snapshot.tomorrow);
        self.applied_sequence = Some(ticket.sequence);
        self.retry_not_before = None;
        self.last_applied_at = Some(now);

        let report = self.compose(now);
        self.last_report = report.clone();
        match report {
            Some(report) => RefreshOutcome::Applied {
                report,
                schedule_changed,
            },
            None => RefreshOutcome::Discarded,
        }
    }

    /// One countdown step. A flip of the power state triggers a refresh instead of
    /// being published, so the post-transition state comes from the provider. The
    /// schedule is also fetched again once it is older than the recheck interval,
    /// which is the only way out of an unknown status within the same day.
    pub fn tick(&mut self, now: KyivTZDateTime) -> TickOutcome {
        if self.is_refreshing() {
            return TickOutcome::Idle;
        }
        let cooling_down = self.is_cooling_down(now);

        let Some(today) = &self.today else {
            return self.refresh_unless(cooling_down, now);
        };
        if today.date() != now.date() {
            tracing::info!("Local date moved past {}, refreshing", today.date());
            return self.refresh_unless(cooling_down, now);
        }
        if !cooling_down && self.is_recheck_due(now) {
            tracing::info!("Schedule for group {} is due for a recheck", self.group);
            return self.refresh(now);
        }

        let Some(report) = self.compose(now) else {
            return TickOutcome::Idle;
        };
        let previous = self.last_report.as_ref().and_then(PowerReport::has_power);
        let flipped = matches!(
            (previous, report.has_power()),
            (Some(before), Some(after)) if before != after
        );
        if flipped && !cooling_down {
            tracing::info!("Power state changed, refreshing the schedule");
            return self.refresh(now);
        }

        self.last_report = Some(report.clone());
        TickOutcome::Publish(report)
    }

    fn refresh_unless(&mut self, cooling_down: bool, now: KyivTZDateTime) -> TickOutcome {
        if cooling_down {
            TickOutcome::Idle
        } else {
            self.refresh(now)
        }
    }

    fn refresh(&mut self, now: KyivTZDateTime) -> TickOutcome {
        self.begin_refresh(now)
            .map_or(TickOutcome::Idle, TickOutcome::Refresh)
    }
}
