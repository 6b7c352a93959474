//! # Calendar Events
//!
//! Turns a classified tide series into all-day calendar events. What happens to
//! the events afterwards (an ICS file, a remote calendar, a terminal listing) is
//! up to the [`CalendarSink`] they are handed to.
//!
//! Each event carries a title, a description made of the day's tides followed by
//! the sunrise/sunset line, the date, the site as its location, and a
//! category/colour derived from the classification.

use crate::sun::Sun;
use crate::{Classification, Day, TideError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which days become events
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventScope {
    /// Only neap and spring days
    #[default]
    NeapsAndSprings,
    /// Every day; unclassified days are titled with their tides
    AllDays,
}

/// One all-day calendar event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TideEvent {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    /// Site name
    pub location: String,
    /// `neap`, `spring` or `tides`
    pub category: String,
    /// CSS basic colour name
    pub color: String,
}

/// Receiver of calendar events
pub trait CalendarSink {
    /// Remove previously added tide events
    fn clear(&mut self);

    fn add_event(&mut self, event: TideEvent);
}

/// In-memory calendar
impl CalendarSink for Vec<TideEvent> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn add_event(&mut self, event: TideEvent) {
        self.push(event);
    }
}

/// Build the event for one day, or `None` if the scope leaves it out.
///
/// # Errors
/// [`TideError::NoSunEvent`] if the sun does not rise or set that day.
pub fn tide_event(
    day: &Day,
    site: &str,
    sun: &Sun,
    scope: EventScope,
) -> Result<Option<TideEvent>, TideError> {
    let (title, category, color) = match (day.classification(), scope) {
        (Classification::Neap, _) => ("Neap tide".to_string(), "neap", "aqua"),
        (Classification::Spring, _) => ("Spring tide".to_string(), "spring", "blue"),
        (Classification::Neither, EventScope::AllDays) => (day.title(), "tides", "gray"),
        (Classification::Neither, EventScope::NeapsAndSprings) => return Ok(None),
    };

    let description = format!("{}\n{}", day.description(), sun.at_date(day.date())?);

    Ok(Some(TideEvent {
        date: day.date(),
        title,
        description,
        location: site.to_string(),
        category: category.to_string(),
        color: color.to_string(),
    }))
}

/// Replace the sink's events with those for `days` at `site`, in date order.
///
/// Every event is built before the sink is touched, so a failure leaves the
/// sink as it was. Returns the number of events added.
pub fn populate<C: CalendarSink>(
    sink: &mut C,
    site: &str,
    days: &[Day],
    sun: &Sun,
    scope: EventScope,
) -> Result<usize, TideError> {
    let events = days
        .iter()
        .filter_map(|day| tide_event(day, site, sun, scope).transpose())
        .collect::<Result<Vec<_>, _>>()?;

    sink.clear();
    let count = events.len();
    for event in events {
        debug!(date = %event.date, title = %event.title, "adding event");
        sink.add_event(event);
    }
    Ok(count)
}
