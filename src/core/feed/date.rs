//! Lenient date parsing for feed rows.
//!
//! Feed rows carry dates as epoch milliseconds (numbers or digit strings),
//! German `dd.mm.yyyy[ hh:mm]` strings or ISO-like strings. Local wall-clock
//! values are interpreted in the timezone passed to [`parse_date_in`].

use std::sync::LazyLock;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use regex::Regex;

use super::types::RawValue;

/// Largest magnitude of an epoch-milliseconds value that still denotes a date.
///
/// This is the ±100,000,000-day bound of ECMAScript dates. chrono stops earlier,
/// at the edges of year ±262143 (about ±8.2e15 ms), so finite epochs between
/// the two limits are absent as well.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

static GERMAN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{3,4})(?:\s+([0-9]{1,2}):([0-9]{2}))?$")
        .expect("german date pattern must compile")
});

static EPOCH_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,13}$").expect("epoch pattern must compile"));

const LOCAL_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only formats read as local midnight.
const LOCAL_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d %B %Y", "%B %d, %Y"];

/// Parses a raw date value, reading local times in the machine's timezone.
pub fn parse_date(input: &RawValue) -> Option<DateTime<Utc>> {
    parse_date_in(input, &chrono::Local)
}

pub fn parse_date_in<Tz: TimeZone>(input: &RawValue, tz: &Tz) -> Option<DateTime<Utc>> {
    match input {
        RawValue::Number(millis) => from_epoch_millis(*millis),
        RawValue::Text(text) => parse_date_str_in(text, tz),
        _ => None,
    }
}

pub fn parse_date_str_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if EPOCH_DIGITS.is_match(trimmed) {
        return from_epoch_millis(trimmed.parse::<f64>().ok()?);
    }

    if let Some(captures) = GERMAN_DATE.captures(trimmed) {
        let number = |index: usize| -> Option<i64> {
            captures
                .get(index)
                .map(|token| token.as_str().parse::<i64>())
                .transpose()
                .ok()
                .flatten()
        };
        let day = number(1)?;
        let month = number(2)?;
        let year_token = captures.get(3)?.as_str();
        let mut year = number(3)?;
        if year_token.len() == 3 || year < 1000 {
            year += 2000;
        }
        let hour = number(4).unwrap_or(0);
        let minute = number(5).unwrap_or(0);
        return local_instant(tz, year, month, day, hour, minute);
    }

    parse_general(trimmed, tz)
}

fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Builds a local instant from calendar components, rolling overflowing
/// months, days, hours and minutes into the next unit.
fn local_instant<Tz: TimeZone>(
    tz: &Tz,
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
) -> Option<DateTime<Utc>> {
    let month_index = month - 1;
    let year = i32::try_from(year + month_index.div_euclid(12)).ok()?;
    let month = u32::try_from(month_index.rem_euclid(12) + 1).ok()?;
    let naive = NaiveDate::from_ymd_opt(year, month, 1)?
        .and_time(NaiveTime::MIN)
        .checked_add_signed(TimeDelta::try_days(day - 1)?)?
        .checked_add_signed(TimeDelta::try_hours(hour)?)?
        .checked_add_signed(TimeDelta::try_minutes(minute)?)?;
    resolve_local(tz, naive)
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        // Wall-clock time skipped by a DST transition.
        LocalResult::None => tz
            .from_local_datetime(&naive.checked_add_signed(TimeDelta::try_hours(1)?)?)
            .earliest()
            .map(|instant| instant.with_timezone(&Utc)),
    }
}

fn parse_general<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(instant) = DateTime::parse_from_rfc2822(input) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in LOCAL_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return resolve_local(tz, naive);
        }
    }
    // Only the ISO date-only form denotes UTC midnight.
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    for format in LOCAL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return resolve_local(tz, date.and_time(NaiveTime::MIN));
        }
    }
    None
}
