//! # workcal
//!
//! Working-time calendar resolution.
//!
//! Time frames describe named time-of-day spans (business hours, a lunch
//! break, a closed day) with a working flag and display metadata. Date frames
//! override which time frames apply on particular days (a holiday, weekends, a
//! vacation range). The resolver anchors the frames for a day and tiles any
//! time range into contiguous segments telling, at every instant, whether time
//! is working and how it should be displayed.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveTime};
//! use workcal::{Calendar, TimeFrameDef};
//!
//! let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
//! let mut cal = Calendar::new();
//! cal.register_time_frames([
//!     ("day", TimeFrameDef::bounded(hm(9, 0), hm(18, 0)).as_default()),
//!     ("noon", TimeFrameDef::bounded(hm(12, 0), hm(13, 30)).non_working().as_default()),
//! ])
//! .unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let segments = cal.solve_day(date).unwrap();
//! assert_eq!(segments.len(), 5);
//! assert!(segments[1].working());
//! ```
//!
//! ## Modules
//!
//! - [`timeframe`] — time frame descriptors and their ordered registry
//! - [`dateframe`] — date selectors (single date, range, evaluator) and their registry
//! - [`resolver`] — per-day frame selection and range tiling
//! - [`calendar`] — the [`Calendar`] facade tying it together
//! - [`config`] — serde definitions for loading a calendar from a file
//! - [`error`] — Error types

pub mod calendar;
pub mod config;
pub mod dateframe;
pub mod error;
pub mod resolver;
pub mod timeframe;

pub use calendar::{day_bounds, Calendar};
pub use config::{CalendarDefinition, NamedDateFrame, NamedTimeFrame};
pub use dateframe::{DateEvaluator, DateFrame, DateFrameDef, DateFrameRegistry, DateSelector};
pub use error::{CalendarError, Result};
pub use resolver::{solve, time_frames_for_date, working_duration, ResolvedTimeFrame, Segment};
pub use timeframe::{
    parse_time_of_day, Attributes, TimeFrame, TimeFrameDef, TimeFrameRegistry, TimeSpan,
};
