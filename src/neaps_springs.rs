//! # Neap and Spring Detection
//!
//! Labels each [`Day`] whose tidal range is a local extremum. Spring and neap
//! tides alternate roughly every seven days, so a window of three days either
//! side of a candidate spans about half a cycle: enough to isolate the one
//! extremum per cycle without reacting to day-to-day noise.
//!
//! A day is a spring if its range is strictly larger than every other range in
//! the window, a neap if strictly smaller. The first and last [`WINDOW`] days
//! have no full window and stay [`Classification::Neither`].

use crate::{Classification, Day};
use tracing::debug;

/// Days either side of the candidate
pub const WINDOW: usize = 3;

/// Classify every day of a chronological series in place.
///
/// Reads only [`Day::range`], so running it again gives the same labels.
pub fn classify(days: &mut [Day]) {
    let labels: Vec<Classification> = (0..days.len()).map(|i| label(&days[..], i)).collect();

    for (day, classification) in days.iter_mut().zip(labels) {
        day.set_classification(classification);
    }

    debug!(
        days = days.len(),
        neaps = neaps(days).count(),
        springs = springs(days).count(),
        "classified tide series"
    );
}

/// Days labelled neap, in order
pub fn neaps(days: &[Day]) -> impl Iterator<Item = &Day> {
    days.iter()
        .filter(|d| d.classification() == Classification::Neap)
}

/// Days labelled spring, in order
pub fn springs(days: &[Day]) -> impl Iterator<Item = &Day> {
    days.iter()
        .filter(|d| d.classification() == Classification::Spring)
}

fn label(days: &[Day], i: usize) -> Classification {
    if i < WINDOW || i + WINDOW >= days.len() {
        return Classification::Neither;
    }

    let range = days[i].range();
    let others = (i - WINDOW..=i + WINDOW)
        .filter(|&j| j != i)
        .map(|j| days[j].range());

    let (mut neap, mut spring) = (true, true);
    for other in others {
        neap &= other > range;
        spring &= other < range;
    }

    match (neap, spring) {
        (true, _) => Classification::Neap,
        (_, true) => Classification::Spring,
        _ => Classification::Neither,
    }
}
