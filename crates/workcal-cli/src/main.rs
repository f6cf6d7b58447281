//! `workcal` CLI — resolve a calendar definition into frames and segments.
//!
//! ## Usage
//!
//! ```sh
//! # Time frames that apply on a date
//! workcal -c office.toml frames --date 2014-10-31
//!
//! # Segments for a whole day
//! workcal -c office.toml solve --date 2014-10-31
//!
//! # Segments for part of a day
//! workcal -c office.toml solve --date 2014-10-31 --from 12:00 --to 13:00
//!
//! # Segments across several days (weekends, holidays resolved per day)
//! workcal -c office.toml span --from 2014-10-31T12:00 --to 2014-11-03T10:00
//! ```

mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::{load_calendar, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = cli.calendar {
        config.calendar = path;
    }
    config.pretty |= cli.pretty;
    tracing::debug!(?config, "loaded configuration");

    let calendar = load_calendar(&config.calendar)?;

    match cli.command {
        Commands::Frames { date } => {
            let frames = calendar
                .time_frames_for_date(date)
                .with_context(|| format!("Failed to resolve time frames for {date}"))?;
            print_json(&frames, config.pretty)?;
        }
        Commands::Solve {
            date,
            from,
            to,
            fit,
        } => {
            let frames = calendar
                .time_frames_for_date(date)
                .with_context(|| format!("Failed to resolve time frames for {date}"))?;
            let (start, end) = if fit {
                (None, None)
            } else {
                let (midnight, next_midnight) = workcal::day_bounds(date);
                (
                    Some(from.map_or(midnight, |t| date.and_time(t))),
                    Some(to.map_or(next_midnight, |t| date.and_time(t))),
                )
            };
            let segments = calendar
                .solve(&frames, start, end)
                .with_context(|| format!("Failed to solve {date}"))?;
            print_json(&segments, config.pretty)?;
        }
        Commands::Span { from, to } => {
            let segments = calendar
                .solve_span(from, to)
                .with_context(|| format!("Failed to solve {from} to {to}"))?;
            print_json(&segments, config.pretty)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
