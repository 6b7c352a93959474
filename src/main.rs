//! # Tide Calendar Entry Point
//!
//! Fetches a year of tide tables for one site, marks neap and spring days and
//! prints them as calendar events with sunrise/sunset times. Logging goes to
//! stderr (`RUST_LOG` overrides the `info` default); stdout carries only events.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::Parser;
use std::path::PathBuf;
use tide_calendar::calendar::{self, EventScope, TideEvent};
use tide_calendar::config::Config;
use tide_calendar::neaps_springs;
use tide_calendar::sun::Sun;
use tide_calendar::tide_data::TideTables;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate neap and spring tide calendar entries from published tide tables
#[derive(Parser, Debug)]
#[command(name = "tide-calendar")]
#[command(version, about, long_about = None)]
struct Args {
    /// Site name from the site registry (default from configuration)
    #[arg(short, long)]
    site: Option<String>,

    /// Year to generate (default: current UTC year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only generate entries for neaps and springs
    #[arg(short, long)]
    nsonly: bool,

    /// Output events as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let site = args.site.unwrap_or_else(|| config.default_site.clone());
    let year = args.year.unwrap_or_else(|| Utc::now().year());
    let sun = Sun::new(config.observer(&site)?);
    let tables = TideTables::from_config(&config.source)?;

    // Only the fetch is async; everything after it is plain computation
    let rt = tokio::runtime::Runtime::new()?;
    info!(%site, year, "getting tides");
    let mut table = rt
        .block_on(tables.get_tides(&site, year))
        .with_context(|| format!("cannot build {year} tide calendar for {site}"))?;

    neaps_springs::classify(table.days_mut());

    let scope = if args.nsonly {
        EventScope::NeapsAndSprings
    } else {
        EventScope::AllDays
    };
    let mut events: Vec<TideEvent> = Vec::new();
    let count = calendar::populate(&mut events, &site, table.days(), &sun, scope)
        .with_context(|| format!("cannot describe tides at {site}"))?;
    info!(count, "created events");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        for event in &events {
            println!(
                "{} {} ({})\n{}\n",
                event.date,
                event.title,
                event.location,
                event.description
            );
        }
    }

    Ok(())
}
