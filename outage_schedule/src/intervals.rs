use anyhow::Context;
use regex::Regex;
use serde::Serialize;
use shared_kernel::date_time::time_frame::TimeFrame;
use shared_kernel::date_time::time_of_day::TimeOfDay;

use crate::micro_format::MicroFormat;

pub type OutageInterval = TimeFrame<TimeOfDay>;

/// What a group's block says about its outages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupOutages {
    PowerAvailable,
    Scheduled { intervals: Vec<OutageInterval> },
    /// Neither the sentinel nor an interval was found; the raw text is kept for diagnostics.
    Unrecognised { raw_text: String },
}

impl GroupOutages {
    pub fn intervals(&self) -> &[OutageInterval] {
        match self {
            GroupOutages::Scheduled { intervals } => intervals,
            GroupOutages::PowerAvailable | GroupOutages::Unrecognised { .. } => &[],
        }
    }

    pub fn unparsed_text(&self) -> Option<&str> {
        match self {
            GroupOutages::Unrecognised { raw_text } => Some(raw_text.as_str()),
            _ => None,
        }
    }
}

pub struct IntervalParser {
    power_available: String,
    interval: Regex,
}

impl IntervalParser {
    pub fn new(format: &MicroFormat) -> anyhow::Result<Self> {
        let interval = Regex::new(&format!(
            r"(?:^|[^\p{{L}}]){}\s+(\d{{1,2}}:\d{{2}})\s+{}\s+(\d{{1,2}}:\d{{2}})",
            regex::escape(&format.interval_from),
            regex::escape(&format.interval_to)
        ))
        .context("Failed to build the interval pattern")?;

        Ok(IntervalParser {
            power_available: format.power_available.clone(),
            interval,
        })
    }

    /// Intervals in document order; the sentinel wins over any time-like text.
    pub fn parse(&self, block: &str) -> Vec<OutageInterval> {
        if block.contains(&self.power_available) {
            return vec![];
        }

        self.interval
            .captures_iter(block)
            .filter_map(|captures| {
                let from = captures[1].parse::<TimeOfDay>();
                let to = captures[2].parse::<TimeOfDay>();
                match (from, to) {
                    (Ok(from), Ok(to)) => Some(TimeFrame::new(from, to)),
                    (from, to) => {
                        tracing::debug!(
                            "Skipping interval {} - {}: {:?} {:?}",
                            &captures[1],
                            &captures[2],
                            from.err(),
                            to.err()
                        );
                        None
                    }
                }
            })
            .collect()
    }

    pub fn classify(&self, block: &str) -> GroupOutages {
        if block.contains(&self.power_available) {
            return GroupOutages::PowerAvailable;
        }

        let intervals = self.parse(block);
        if intervals.is_empty() {
            GroupOutages::Unrecognised {
                raw_text: block.to_owned(),
            }
        } else {
            GroupOutages::Scheduled { intervals }
        }
    }
}

impl Default for IntervalParser {
    fn default() -> Self {
        IntervalParser::new(&MicroFormat::default())
            .expect("Expected the default interval pattern to compile")
    }
}
