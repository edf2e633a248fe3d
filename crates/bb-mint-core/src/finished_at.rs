use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinishedAtError {
    #[error("finished date {0:?} is not a valid calendar date")]
    InvalidDate(String),

    #[error("finished date {0:?} does not exist in the local time zone")]
    SkippedDay(String),

    #[error("finished date {0:?} is before the Unix epoch")]
    OutOfRange(String),
}

/// Seconds since the epoch of local midnight on `date` (`YYYY-MM-DD`).
/// An empty date is `0`. When a DST switch skips midnight, the first local
/// time that exists on that day is used instead.
pub fn finished_at_from_local_date(date: &str) -> Result<u64, FinishedAtError> {
    finished_at_in(date, &Local)
}

pub fn finished_at_in<Tz: TimeZone>(date: &str, tz: &Tz) -> Result<u64, FinishedAtError> {
    let date = date.trim();
    if date.is_empty() {
        return Ok(0);
    }

    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| FinishedAtError::InvalidDate(date.to_owned()))?;

    let midnight = start_of_day(tz, day)
        .ok_or_else(|| FinishedAtError::SkippedDay(date.to_owned()))?;

    u64::try_from(midnight.timestamp()).map_err(|_| FinishedAtError::OutOfRange(date.to_owned()))
}

/// First instant of `day` in `tz`, stepping by the minute past a gap.
/// earliest() picks the first instant when a fold repeats a local time.
fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Tz>> {
    (0..24 * 60)
        .filter_map(|minute: u32| NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0))
        .find_map(|time| tz.from_local_datetime(&day.and_time(time)).earliest())
}
