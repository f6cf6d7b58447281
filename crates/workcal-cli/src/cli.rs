//! Command-line arguments.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "workcal",
    version,
    about = "Resolve working-time calendars into frames and segments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Calendar definition file, TOML or JSON [default: workcal.toml]
    #[arg(short, long, global = true)]
    pub calendar: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the time frames that apply to a date
    Frames {
        /// Calendar day (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
    },
    /// Tile one day into working/non-working segments
    Solve {
        /// Calendar day (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        /// Range start on that day (HH:MM), defaults to midnight
        #[arg(long, value_parser = parse_time)]
        from: Option<NaiveTime>,
        /// Range end on that day (HH:MM), defaults to the next midnight
        #[arg(long, value_parser = parse_time)]
        to: Option<NaiveTime>,
        /// Derive the range from the day's bounded frames instead of midnight
        #[arg(long, conflicts_with_all = ["from", "to"])]
        fit: bool,
    },
    /// Tile an arbitrary range, resolving every day it crosses
    Span {
        /// Range start (YYYY-MM-DDTHH:MM)
        #[arg(long, value_parser = parse_datetime)]
        from: NaiveDateTime,
        /// Range end (YYYY-MM-DDTHH:MM)
        #[arg(long, value_parser = parse_datetime)]
        to: NaiveDateTime,
    },
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    workcal::parse_time_of_day(s).ok_or_else(|| format!("invalid time '{s}', expected HH:MM"))
}

/// Accepts `T` or a space between date and time, with or without seconds.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("invalid datetime '{s}', expected YYYY-MM-DDTHH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 6)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2026-03-06T12:30"), Ok(expected));
        assert_eq!(parse_datetime("2026-03-06 12:30:00"), Ok(expected));
        assert!(parse_datetime("2026-03-06").is_err());
    }
}
