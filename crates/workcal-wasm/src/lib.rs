//! WASM bindings for workcal.
//!
//! Exposes time frame resolution and range tiling to JavaScript via
//! `wasm-bindgen`. The calendar definition and every result cross the boundary
//! as JSON strings, so the host UI never depends on Rust types.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p workcal-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/workcal-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/workcal_wasm.wasm
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use workcal::{Calendar, CalendarDefinition};

// ---------------------------------------------------------------------------
// Helpers: parsing inputs that arrive as strings
// ---------------------------------------------------------------------------

fn parse_calendar(json: &str) -> Result<Calendar, String> {
    let definition: CalendarDefinition =
        serde_json::from_str(json).map_err(|e| format!("Invalid calendar JSON: {}", e))?;
    Calendar::from_definition(definition).map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

/// Parse an ISO 8601 local datetime, with or without seconds.
fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    workcal::parse_time_of_day(s).ok_or_else(|| format!("Invalid time '{}'", s))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Boundary-free implementations
// ---------------------------------------------------------------------------

fn resolve_time_frames_impl(calendar_json: &str, date: &str) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let frames = calendar
        .time_frames_for_date(parse_date(date)?)
        .map_err(|e| e.to_string())?;
    to_json(&frames)
}

fn solve_impl(
    calendar_json: &str,
    date: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let date = parse_date(date)?;
    let frames = calendar
        .time_frames_for_date(date)
        .map_err(|e| e.to_string())?;

    let (midnight, next_midnight) = workcal::day_bounds(date);
    let start = match from {
        Some(t) => date.and_time(parse_time(t)?),
        None => midnight,
    };
    let end = match to {
        Some(t) => date.and_time(parse_time(t)?),
        None => next_midnight,
    };

    let segments = calendar
        .solve(&frames, Some(start), Some(end))
        .map_err(|e| e.to_string())?;
    to_json(&segments)
}

fn solve_span_impl(calendar_json: &str, from: &str, to: &str) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let segments = calendar
        .solve_span(parse_datetime(from)?, parse_datetime(to)?)
        .map_err(|e| e.to_string())?;
    to_json(&segments)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Time frames that apply on `date` (`YYYY-MM-DD`).
///
/// `calendar_json` is a calendar definition (`{time_frames: [...], date_frames:
/// [...]}`). Returns a JSON array of `{name, start, end, working, color?, classes?}`.
#[wasm_bindgen(js_name = "resolveTimeFrames")]
pub fn resolve_time_frames(calendar_json: &str, date: &str) -> Result<String, JsValue> {
    resolve_time_frames_impl(calendar_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Tile `date` into segments, from `from` to `to` (`HH:MM`), defaulting to the
/// whole day. Returns a JSON array of `{start, end, working, color?, classes?}`.
#[wasm_bindgen(js_name = "solve")]
pub fn solve(
    calendar_json: &str,
    date: &str,
    from: Option<String>,
    to: Option<String>,
) -> Result<String, JsValue> {
    solve_impl(calendar_json, date, from.as_deref(), to.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Tile `[from, to)` (ISO 8601 local datetimes), resolving every day in between.
#[wasm_bindgen(js_name = "solveSpan")]
pub fn solve_span(calendar_json: &str, from: &str, to: &str) -> Result<String, JsValue> {
    solve_span_impl(calendar_json, from, to).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDAR: &str = r#"{
        "time_frames": [
            {"name": "day", "start": "09:00", "end": "18:00", "default": true},
            {"name": "noon", "start": "12:00", "end": "13:30", "working": false, "color": "red", "default": true},
            {"name": "closed", "working": false}
        ],
        "date_frames": [
            {"name": "weekend", "evaluator": {"weekdays": ["Sat", "Sun"]}, "targets": ["closed"]}
        ]
    }"#;

    fn parse(json: &str) -> Vec<serde_json::Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn resolves_frames_for_weekday_and_weekend() {
        let weekday = parse(&resolve_time_frames_impl(CALENDAR, "2026-03-02").unwrap());
        assert_eq!(weekday.len(), 2);
        assert_eq!(weekday[1]["name"], "noon");

        let saturday = parse(&resolve_time_frames_impl(CALENDAR, "2026-03-07").unwrap());
        assert_eq!(saturday.len(), 1);
        assert_eq!(saturday[0]["name"], "closed");
    }

    #[test]
    fn solves_day_and_partial_range() {
        let day = parse(&solve_impl(CALENDAR, "2026-03-02", None, None).unwrap());
        assert_eq!(day.len(), 5);

        let lunch = parse(&solve_impl(CALENDAR, "2026-03-02", Some("12:15"), Some("13:00")).unwrap());
        assert_eq!(lunch.len(), 1);
        assert_eq!(lunch[0]["color"], "red");
    }

    #[test]
    fn solves_span() {
        let span = parse(&solve_span_impl(CALENDAR, "2026-03-06T18:00", "2026-03-09T09:00").unwrap());
        assert_eq!(span.len(), 1);
        assert_eq!(span[0]["working"], false);
    }

    #[test]
    fn reports_errors_as_strings() {
        let err = solve_impl(CALENDAR, "2026-03-02", Some("13:00"), Some("12:00")).unwrap_err();
        assert!(err.contains("Invalid range"));

        assert!(resolve_time_frames_impl("{", "2026-03-02")
            .unwrap_err()
            .starts_with("Invalid calendar JSON"));
        assert!(resolve_time_frames_impl(CALENDAR, "March 2").is_err());
    }
}
