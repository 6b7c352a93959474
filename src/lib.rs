//! # Tide Calendar Core Library
//!
//! This library turns a published tide table into a typed time series and derives
//! two products from it: which days carry a neap or a spring tide, and the sunrise
//! and sunset times for the site on those days.
//!
//! ## Data Flow
//! 1. **Fetch**: download the raw table text ([`tide_data`])
//! 2. **Parse**: scan the text into one [`Day`] per calendar date ([`tide_table`])
//! 3. **Classify**: mark local range extrema as neap/spring ([`neaps_springs`])
//! 4. **Describe**: add sunrise/sunset ([`sun`]) and hand events to a
//!    calendar sink ([`calendar`])
//!
//! Each request owns its own series; nothing is shared between requests and
//! nothing is persisted.
//!
//! ## Core Types
//! - [`Tide`]: a single high or low water at an absolute UTC instant
//! - [`Day`]: the tides of one calendar date with the derived tidal range
//! - [`Observer`]: a validated latitude/longitude for solar calculations

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Module declarations
pub mod calendar;
pub mod config;
pub mod error;
pub mod neaps_springs;
pub mod sun;
pub mod tide_data;
pub mod tide_table;

pub use error::TideError;

/// A single tide: the moment water is highest or lowest.
///
/// The raw tables only carry times and depths; whether a tide is high or low is
/// inferred by the parser and fixed at construction.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use tide_calendar::Tide;
///
/// let tide = Tide::new(Utc.with_ymd_and_hms(2026, 1, 1, 9, 2, 0).unwrap(), 8.34, true);
/// assert_eq!(tide.to_string(), "H 09:02 8.34m");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tide {
    time: DateTime<Utc>,
    depth: f64,
    high: bool,
}

impl Tide {
    pub fn new(time: DateTime<Utc>, depth: f64, high: bool) -> Self {
        Tide { time, depth, high }
    }

    /// Absolute time of the tide
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Depth in metres
    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

/// Renders as `<H|L> <HH:MM> <depth>m`, clock time in UTC.
impl fmt::Display for Tide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}m",
            if self.high { "H" } else { "L" },
            self.time.format("%H:%M"),
            self.depth
        )
    }
}

/// Neap/spring label written by [`neaps_springs::classify`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Smallest range in its window
    Neap,
    /// Largest range in its window
    Spring,
    /// Not an extremum, or too close to either end of the series to tell
    #[default]
    Neither,
}

/// The tides of one calendar date, three or four of them.
///
/// Construction sorts the tides by time and computes the tidal range; both are
/// fixed from then on. Only the classification may change afterwards, and only
/// from within this crate.
///
/// # Example
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use tide_calendar::{Classification, Day, Tide};
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
/// let day = Day::new(date, vec![
///     Tide::new(Utc.with_ymd_and_hms(2026, 1, 4, 11, 35, 0).unwrap(), 9.24, true),
///     Tide::new(Utc.with_ymd_and_hms(2026, 1, 4, 6, 8, 0).unwrap(), 1.35, false),
///     Tide::new(Utc.with_ymd_and_hms(2026, 1, 4, 18, 35, 0).unwrap(), 0.93, false),
/// ]).unwrap();
///
/// assert_eq!(day.tides()[0].depth(), 1.35);
/// assert!((day.range() - 8.31).abs() < 1e-9);
/// assert_eq!(day.classification(), Classification::Neither);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Day {
    date: NaiveDate,
    tides: Vec<Tide>,
    range: f64,
    classification: Classification,
}

impl Day {
    /// Build a day from tides in any order.
    ///
    /// Fails with [`TideError::InvalidInput`] if `tides` is empty or any depth
    /// is not finite.
    pub fn new(date: NaiveDate, mut tides: Vec<Tide>) -> Result<Self, TideError> {
        if tides.is_empty() {
            return Err(TideError::InvalidInput(format!("no tides on {date}")));
        }
        if let Some(bad) = tides.iter().find(|t| !t.depth.is_finite()) {
            return Err(TideError::InvalidInput(format!(
                "non-finite depth {} on {date}",
                bad.depth
            )));
        }

        tides.sort_by_key(|t| t.time);
        let range = tidal_range(&tides);

        Ok(Day {
            date,
            tides,
            range,
            classification: Classification::Neither,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Tides in chronological order
    pub fn tides(&self) -> &[Tide] {
        &self.tides
    }

    /// Highest depth minus lowest depth, in metres
    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub(crate) fn set_classification(&mut self, classification: Classification) {
        self.classification = classification;
    }

    /// All tides on one line, e.g. `L 03:24 2.05m H 09:02 8.34m`
    pub fn title(&self) -> String {
        self.render_tides(" ")
    }

    /// One tide per line, chronological
    pub fn description(&self) -> String {
        self.render_tides("\n")
    }

    fn render_tides(&self, separator: &str) -> String {
        self.tides
            .iter()
            .map(Tide::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

fn tidal_range(tides: &[Tide]) -> f64 {
    let (min, max) = tides
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), t| {
            (min.min(t.depth), max.max(t.depth))
        });
    max - min
}

/// Where on Earth the sun is observed from, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    latitude: f64,
    longitude: f64,
}

impl Observer {
    /// Fails with [`TideError::InvalidInput`] outside [-90, 90] x [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TideError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(TideError::InvalidInput(format!(
                "latitude {latitude} out of range"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(TideError::InvalidInput(format!(
                "longitude {longitude} out of range"
            )));
        }
        Ok(Observer {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}
