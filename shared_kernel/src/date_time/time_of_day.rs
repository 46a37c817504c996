use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error as ThisError;

pub const SECONDS_PER_DAY: u32 = 86_400;
const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day with minute precision.
///
/// `24:00` is accepted and means the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum TimeOfDayError {
    #[error("`{0}` is not in the HH:MM format")]
    Format(String),
    #[error("`{0}` is not a valid time of day")]
    OutOfRange(String),
}

impl TimeOfDay {
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, TimeOfDayError> {
        let minutes = u16::from(hour) * 60 + u16::from(minute);
        if minute > 59 || minutes > MINUTES_PER_DAY {
            return Err(TimeOfDayError::OutOfRange(format!("{hour:02}:{minute:02}")));
        }
        Ok(TimeOfDay { minutes })
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }

    pub fn seconds_from_midnight(&self) -> u32 {
        u32::from(self.minutes) * 60
    }

    pub fn is_midnight(&self) -> bool {
        self.minutes == 0
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let format_error = || TimeOfDayError::Format(trimmed.to_owned());
        let (hour, minute) = trimmed.split_once(':').ok_or_else(format_error)?;

        let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
            return Err(format_error());
        }

        let hour = hour.parse::<u8>().map_err(|_| format_error())?;
        let minute = minute.parse::<u8>().map_err(|_| format_error())?;
        TimeOfDay::from_hm(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
