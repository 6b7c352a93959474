//! # Tide Table Parsing
//!
//! Converts the text of a published tide table into a chronological series of
//! [`Day`] values.
//!
//! ## Table Layout
//! The tables are plain text split into month blocks. Each block opens with a
//! header naming the month and year, followed by one line per day:
//!
//! ```text
//!                  JAN 2026
//!
//!    13  0652  6.99  1920  7.06  0034  3.10  1304  3.29
//!    14  0753  7.09  2019  7.12  0140  3.20  1417  3.23
//! ```
//!
//! A day line is the day of the month followed by `HHMM depth` pairs, in any
//! order (highs and lows usually sit in separate columns). Everything else on
//! the page, such as titles, column headings and blank lines, is skipped.
//!
//! ## Grammar Rules
//! - **Month header**: a month name (first three letters significant) and a year
//! - **Day line**: a one- or two-digit day of month, then a token starting with a digit
//! - **Tide pair**: a four-digit 24-hour time followed by a signed decimal depth
//!
//! A day line whose pairs do not follow the tide-pair rule aborts the whole parse
//! with [`TideError::MalformedLine`]: a broken line usually means the layout has
//! shifted, and skipping it would throw the high/low alternation off for every
//! tide after it. The same goes for a day line whose date is not the day after
//! the previous one, so a parsed table always has one day per date with no gaps.
//!
//! ## High/Low Inference
//! The tables give no high/low flag. The first tide of the series is high if it is
//! deeper than the second, low otherwise; from there the flag alternates across the
//! whole series, ignoring day boundaries.

use crate::{Day, Tide, TideError};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use tracing::debug;

/// Month abbreviations as they appear in table headers
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A parsed table: every day it lists, in order.
#[derive(Clone, Debug)]
pub struct TideTable {
    year: i32,
    days: Vec<Day>,
}

impl TideTable {
    /// Year of the first day in the table; used to pick between published tables
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn days_mut(&mut self) -> &mut [Day] {
        &mut self.days
    }

    pub fn into_days(self) -> Vec<Day> {
        self.days
    }
}

/// A time/depth pair before the high/low flag is known.
#[derive(Clone, Copy, Debug)]
struct Reading {
    time: DateTime<Utc>,
    depth: f64,
}

/// Parse the full text of a tide table.
///
/// # Errors
/// - [`TideError::MalformedLine`] for a day line that breaks the tide-pair rule,
///   names a date that does not exist, or does not follow the previous day line
///   by exactly one day
/// - [`TideError::EmptyTable`] if no day lines were found
///
/// No partial series is returned on failure.
pub fn parse(text: &str) -> Result<TideTable, TideError> {
    // (year, month) of the block we are in; day lines before the first header are page furniture
    let mut block: Option<(i32, u32)> = None;
    let mut parsed: Vec<(NaiveDate, Vec<Reading>)> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if let Some((month, year)) = month_header(line) {
            block = Some((year, month));
            continue;
        }

        let Some((year, month)) = block else {
            continue;
        };
        let Some((day_of_month, pairs)) = day_line(line) else {
            continue;
        };

        let malformed = || TideError::MalformedLine {
            line: index + 1,
            text: line.trim().to_string(),
        };

        let date = NaiveDate::from_ymd_opt(year, month, day_of_month).ok_or_else(malformed)?;
        if let Some((previous, _)) = parsed.last() {
            // Repeated, skipped or reordered dates mean a corrupted table
            if previous.succ_opt() != Some(date) {
                return Err(malformed());
            }
        }
        let mut readings = tide_pairs(date, pairs).ok_or_else(malformed)?;
        readings.sort_by_key(|r| r.time);
        parsed.push((date, readings));
    }

    if parsed.is_empty() {
        return Err(TideError::EmptyTable);
    }

    let days = assign_high_low(parsed)?;
    let year = days[0].date().year();
    debug!(days = days.len(), year, "parsed tide table");

    Ok(TideTable { year, days })
}

/// Month header rule: `JAN 2026`, `JANUARY 2026`.
///
/// Returns the month number (1-12) and the year.
fn month_header(line: &str) -> Option<(u32, i32)> {
    let mut tokens = line.split_whitespace();
    let (name, year) = (tokens.next()?, tokens.next()?);
    if tokens.next().is_some() {
        return None;
    }

    if name.len() < 3 || !name.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let month = MONTHS.iter().position(|m| *m == &name[..3])? as u32 + 1;

    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = year.parse().ok()?;

    Some((month, year))
}

/// Day line rule: day of month, whitespace, then something starting with a digit.
///
/// Returns the day of month and the rest of the line holding the tide pairs.
fn day_line(line: &str) -> Option<(u32, &str)> {
    let line = line.trim();
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if !(1..=2).contains(&digits) {
        return None;
    }

    let (day, rest) = line.split_at(digits);
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some((day.parse().ok()?, rest))
}

/// Tide pair rule, applied until the line is exhausted.
///
/// `None` if any token breaks the rule or a time has no depth.
fn tide_pairs(date: NaiveDate, pairs: &str) -> Option<Vec<Reading>> {
    let tokens: Vec<&str> = pairs.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return None;
    }

    tokens
        .chunks(2)
        .map(|pair| {
            let (hour, minute) = clock_time(pair[0])?;
            let depth = depth(pair[1])?;
            let time = Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0)?);
            Some(Reading { time, depth })
        })
        .collect()
}

/// `HHMM`, exactly two digits of hour and two of minute.
fn clock_time(token: &str) -> Option<(u32, u32)> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = token[..2].parse().ok()?;
    let minute: u32 = token[2..].parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

/// Signed decimal metres: `3.84`, `-2.48`, `8`.
fn depth(token: &str) -> Option<f64> {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let digits = unsigned.bytes().filter(u8::is_ascii_digit).count();
    let points = unsigned.bytes().filter(|b| *b == b'.').count();
    if digits == 0 || points > 1 || digits + points != unsigned.len() {
        return None;
    }
    token.parse().ok()
}

/// Flag every tide high or low in one pass over the flattened series, then build the days.
fn assign_high_low(parsed: Vec<(NaiveDate, Vec<Reading>)>) -> Result<Vec<Day>, TideError> {
    let mut high = {
        let mut depths = parsed
            .iter()
            .flat_map(|(_, readings)| readings.iter().map(|r| r.depth));
        match (depths.next(), depths.next()) {
            (Some(first), Some(second)) => first > second,
            _ => false,
        }
    };

    parsed
        .into_iter()
        .map(|(date, readings)| {
            let tides = readings
                .into_iter()
                .map(|r| {
                    let tide = Tide::new(r.time, r.depth, high);
                    high = !high;
                    tide
                })
                .collect();
            Day::new(date, tides)
        })
        .collect()
}
