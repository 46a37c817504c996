use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Europe::Kiev as Kyiv;
use chrono_tz::Tz;
use std::ops::Add;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
/// KyivTZDateTime stores the instant as `DateTime<UTC>`; the schedule's wall clock
/// (local date, seconds since local midnight) is always read in Kyiv time.
pub struct KyivTZDateTime(DateTime<Utc>);

impl KyivTZDateTime {
    pub fn now() -> Self {
        KyivTZDateTime(Utc::now())
    }

    pub fn to_date_time(&self) -> DateTime<Tz> {
        Kyiv.from_utc_datetime(&self.0.naive_utc())
    }

    /// Local calendar date.
    pub fn date(&self) -> NaiveDate {
        self.to_date_time().date_naive()
    }

    /// Local wall-clock seconds since midnight, `0..86_400`.
    pub fn seconds_from_midnight(&self) -> u32 {
        self.to_date_time().num_seconds_from_midnight()
    }
}

impl Add<Duration> for KyivTZDateTime {
    type Output = KyivTZDateTime;

    fn add(self, rhs: Duration) -> Self::Output {
        KyivTZDateTime(self.0 + rhs)
    }
}

impl From<DateTime<Utc>> for KyivTZDateTime {
    fn from(data: DateTime<Utc>) -> KyivTZDateTime {
        KyivTZDateTime(data)
    }
}

impl TryFrom<NaiveDateTime> for KyivTZDateTime {
    type Error = String;

    fn try_from(value: NaiveDateTime) -> Result<Self, Self::Error> {
        Kyiv.from_local_datetime(&value)
            .single()
            .ok_or_else(|| format!("Failed to convert {value} to Kyiv timezone"))
            .map(|date_time| Self(date_time.with_timezone(&Utc)))
    }
}
