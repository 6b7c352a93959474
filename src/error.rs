//! # Error Types
//!
//! Every stage of the pipeline reports failure through [`TideError`]. The
//! variants say which stage failed: fetching, parsing, building a [`Day`],
//! resolving the table year, or computing a sunrise/sunset. None of them are
//! retried inside the library.
//!
//! [`Day`]: crate::Day

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while fetching, parsing and analysing a tide table.
#[derive(Error, Debug)]
pub enum TideError {
    /// HTTP request failed (network error, timeout or non-2xx status)
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A data line did not follow the tide-table grammar
    #[error("malformed tide table at line {line}: {text:?}")]
    MalformedLine { line: usize, text: String },

    /// The table parsed but contained no days
    #[error("tide table contains no days")]
    EmptyTable,

    /// Neither the present nor the next published table covers the year
    #[error("{year} not available from the published tide tables")]
    YearUnavailable { year: i32 },

    /// Degenerate input, e.g. a day with no tides or a non-finite depth
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The sun does not rise or set at this latitude on this date
    #[error("no sunrise or sunset on {date} at latitude {latitude}")]
    NoSunEvent { date: NaiveDate, latitude: f64 },
}
