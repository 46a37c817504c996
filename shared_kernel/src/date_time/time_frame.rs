use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::time_of_day::{TimeOfDay, SECONDS_PER_DAY};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeFrame<T> {
    pub from: T,
    pub to: T,
}

impl<T> TimeFrame<T> {
    pub fn new(from: T, to: T) -> Self {
        TimeFrame { from, to }
    }
}

/// A frame within a single day. `to` of `00:00` closes the day when `from` is later.
impl TimeFrame<TimeOfDay> {
    pub fn start_seconds(&self) -> u32 {
        self.from.seconds_from_midnight()
    }

    pub fn end_seconds(&self) -> u32 {
        if self.to.is_midnight() && !self.from.is_midnight() {
            SECONDS_PER_DAY
        } else {
            self.to.seconds_from_midnight()
        }
    }

    /// Half open: the start is inside the frame, the end is not.
    pub fn contains(&self, seconds_from_midnight: u32) -> bool {
        self.start_seconds() <= seconds_from_midnight && seconds_from_midnight < self.end_seconds()
    }

    pub fn starts_at_midnight(&self) -> bool {
        self.from.is_midnight()
    }

    pub fn ends_at_day_boundary(&self) -> bool {
        self.end_seconds() == SECONDS_PER_DAY
    }

    pub fn duration_seconds(&self) -> u32 {
        self.end_seconds().saturating_sub(self.start_seconds())
    }
}

impl<T: Display> Display for TimeFrame<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::TimeFrame;
    use crate::date_time::time_of_day::TimeOfDay;
    use rstest::rstest;

    fn frame(from: &str, to: &str) -> TimeFrame<TimeOfDay> {
        TimeFrame::new(from.parse().unwrap(), to.parse().unwrap())
    }

    #[rstest]
    #[case("09:00", "12:00", 9 * 3600, true)]
    #[case("09:00", "12:00", 12 * 3600 - 1, true)]
    #[case("09:00", "12:00", 12 * 3600, false)]
    #[case("09:00", "12:00", 9 * 3600 - 1, false)]
    #[case("22:00", "00:00", 23 * 3600 + 59 * 60, true)]
    #[case("22:00", "24:00", 23 * 3600 + 59 * 60, true)]
    fn test_contains_is_half_open(
        #[case] from: &str,
        #[case] to: &str,
        #[case] now: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(frame(from, to).contains(now), expected);
    }

    #[test]
    fn test_midnight_end_closes_the_day() {
        let late = frame("22:00", "00:00");

        assert!(late.ends_at_day_boundary());
        assert_eq!(late.end_seconds(), 86_400);
        assert_eq!(late.duration_seconds(), 2 * 3600);
    }

    #[test]
    fn test_frame_from_midnight_to_midnight_is_empty() {
        let empty = frame("00:00", "00:00");

        assert!(empty.starts_at_midnight());
        assert!(!empty.ends_at_day_boundary());
        assert_eq!(empty.duration_seconds(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(frame("9:00", "12:30").to_string(), "09:00 - 12:30");
    }
}
