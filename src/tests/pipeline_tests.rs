//! # End-to-End Tests for the Tide Calendar Pipeline
//!
//! These tests run the real January–February 2026 Liverpool table through every
//! stage: retrieval (from an in-memory source), parsing, neap/spring
//! classification and event construction. The fixture keeps the publisher's
//! layout, with high and low waters in separate columns.

use chrono::{Duration, NaiveDate};
use tide_calendar::calendar::{self, EventScope, TideEvent};
use tide_calendar::config::Config;
use tide_calendar::neaps_springs::{self, WINDOW};
use tide_calendar::sun::Sun;
use tide_calendar::tide_data::{Publication, TextSource, TideTables};
use tide_calendar::tide_table;
use tide_calendar::{Classification, Day, TideError};

const JAN_FEB_2026: &str = include_str!("fixtures/liverpool_2026_jan_feb.txt");

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

fn classified_fixture() -> Vec<Day> {
    let mut days = tide_table::parse(JAN_FEB_2026).unwrap().into_days();
    neaps_springs::classify(&mut days);
    days
}

/// Serves the fixture as Liverpool's present table and a 2025 table as the next one.
struct FixtureSource;

impl TextSource for FixtureSource {
    async fn fetch_text(&self, uri: &str) -> Result<String, TideError> {
        if uri.ends_with("/present/liverpoo.htm") {
            Ok(JAN_FEB_2026.to_string())
        } else if uri.ends_with("/next/liverpoo.htm") {
            Ok("DEC 2025\n31  0100 9.0  0700 1.0\n".to_string())
        } else {
            Err(TideError::InvalidInput(format!("unexpected fetch of {uri}")))
        }
    }
}

/// Every calendar date from 1 January to 22 February appears exactly once, in order.
#[test]
fn fixture_has_one_day_per_date_without_gaps() {
    let table = tide_table::parse(JAN_FEB_2026).unwrap();
    assert_eq!(table.year(), 2026);
    assert_eq!(table.days().len(), 53, "31 days of January + 22 of February");

    assert_eq!(table.days()[0].date(), date(1, 1));
    for pair in table.days().windows(2) {
        assert_eq!(
            pair[1].date() - pair[0].date(),
            Duration::days(1),
            "gap or disorder after {}",
            pair[0].date()
        );
    }
}

/// Each day's tides are chronological and its range matches its depths.
#[test]
fn fixture_days_are_sorted_with_fresh_ranges() {
    let table = tide_table::parse(JAN_FEB_2026).unwrap();
    for day in table.days() {
        let tides = day.tides();
        assert!((3..=4).contains(&tides.len()), "{} has {} tides", day.date(), tides.len());
        assert!(
            tides.windows(2).all(|w| w[0].time() < w[1].time()),
            "tides out of order on {}",
            day.date()
        );

        let max = tides.iter().map(|t| t.depth()).fold(f64::NEG_INFINITY, f64::max);
        let min = tides.iter().map(|t| t.depth()).fold(f64::INFINITY, f64::min);
        assert_eq!(day.range(), max - min, "range on {}", day.date());
    }
}

/// High and low waters alternate through the whole series, across midnight.
#[test]
fn fixture_tides_alternate_high_and_low() {
    let table = tide_table::parse(JAN_FEB_2026).unwrap();
    let tides: Vec<_> = table.days().iter().flat_map(|d| d.tides()).collect();

    assert!(!tides[0].is_high(), "series opens on the 03:24 low water");
    for pair in tides.windows(2) {
        assert_ne!(
            pair[0].is_high(),
            pair[1].is_high(),
            "no alternation at {}",
            pair[1].time()
        );
    }
    // Highs are always the deeper water in this table
    assert!(tides.iter().filter(|t| t.is_high()).all(|t| t.depth() > 6.0));
    assert!(tides.iter().filter(|t| !t.is_high()).all(|t| t.depth() < 4.0));
}

/// Known neaps and springs for early 2026.
#[test]
fn fixture_neaps_and_springs() {
    let days = classified_fixture();

    let neaps: Vec<_> = neaps_springs::neaps(&days).map(Day::date).collect();
    let springs: Vec<_> = neaps_springs::springs(&days).map(Day::date).collect();

    assert_eq!(neaps, vec![date(1, 14), date(1, 28), date(2, 12)]);
    assert_eq!(springs, vec![date(1, 5), date(1, 22), date(2, 3)]);
}

/// The first and last three days can never be classified.
#[test]
fn fixture_edges_are_unclassified() {
    let days = classified_fixture();
    let edges = days[..WINDOW].iter().chain(&days[days.len() - WINDOW..]);
    for day in edges {
        assert_eq!(
            day.classification(),
            Classification::Neither,
            "{} should be unclassified",
            day.date()
        );
    }
}

/// Classifying an already classified series changes nothing.
#[test]
fn classification_is_idempotent() {
    let mut days = classified_fixture();
    let first: Vec<_> = days.iter().map(Day::classification).collect();
    neaps_springs::classify(&mut days);
    let second: Vec<_> = days.iter().map(Day::classification).collect();
    assert_eq!(first, second);
}

/// A corrupted time anywhere in the table aborts the whole parse.
#[test]
fn corrupted_time_aborts_parse() {
    let corrupted = JAN_FEB_2026.replacen("1221  9.32", "12x1  9.32", 1);
    assert_ne!(corrupted, JAN_FEB_2026);

    match tide_table::parse(&corrupted) {
        Err(TideError::MalformedLine { text, .. }) => assert!(text.starts_with("5 ")),
        other => panic!("expected MalformedLine, got {other:?}"),
    }
}

/// A day line dropped from the table aborts the parse at the line after the gap.
#[test]
fn missing_day_aborts_parse() {
    let gappy = JAN_FEB_2026.replacen(
        "   11    0448  7.30  1712  7.46    1105  2.88  2338  2.82\n",
        "",
        1,
    );
    assert_ne!(gappy, JAN_FEB_2026);

    match tide_table::parse(&gappy) {
        Err(TideError::MalformedLine { text, .. }) => assert!(text.starts_with("12 ")),
        other => panic!("expected MalformedLine, got {other:?}"),
    }
}

/// Fetch, parse, classify and describe, as the binary does it.
#[tokio::test]
async fn pipeline_builds_neap_and_spring_events() {
    let config = Config::default();
    let sun = Sun::new(config.observer("Liverpool").unwrap());
    let tables = TideTables::new(FixtureSource, &config.source.base_url);

    let mut table = tables.get_tides("Liverpool", 2026).await.unwrap();
    neaps_springs::classify(table.days_mut());

    let mut events: Vec<TideEvent> = Vec::new();
    let count = calendar::populate(
        &mut events,
        "Liverpool",
        table.days(),
        &sun,
        EventScope::NeapsAndSprings,
    )
    .unwrap();
    assert_eq!(count, 6);
    assert!(events.iter().all(|e| e.location == "Liverpool"));

    let titles: Vec<_> = events.iter().map(|e| (e.date, e.title.as_str())).collect();
    assert_eq!(
        titles,
        vec![
            (date(1, 5), "Spring tide"),
            (date(1, 14), "Neap tide"),
            (date(1, 22), "Spring tide"),
            (date(1, 28), "Neap tide"),
            (date(2, 3), "Spring tide"),
            (date(2, 12), "Neap tide"),
        ]
    );

    let first = &events[0];
    let lines: Vec<_> = first.description.lines().collect();
    assert_eq!(
        lines[..4],
        ["H 00:02 8.92m", "L 06:53 1.3m", "H 12:21 9.32m", "L 19:20 0.87m"]
    );
    assert_eq!(lines[4], "Sunrise 08:26Z Sunset 16:08Z");
}

/// Neither published table covers 2027, so the year is unavailable.
#[tokio::test]
async fn pipeline_reports_unavailable_year() {
    let tables = TideTables::new(FixtureSource, "https://tables.example");
    let err = tables.get_tides("Liverpool", 2027).await.unwrap_err();
    assert!(matches!(err, TideError::YearUnavailable { year: 2027 }), "{err:?}");

    let table = tables.get_tides("Liverpool", 2025).await.unwrap();
    assert_eq!(table.year(), 2025);
    assert_eq!(table.days().len(), 1);

    let table = tables
        .get_table("Liverpool", Publication::Present)
        .await
        .unwrap();
    assert_eq!(table.year(), 2026);
}
