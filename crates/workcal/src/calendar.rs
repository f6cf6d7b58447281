//! The [`Calendar`] facade: both registries plus day and span solving.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::CalendarDefinition;
use crate::dateframe::{DateFrameDef, DateFrameRegistry};
use crate::error::{CalendarError, Result};
use crate::resolver::{self, ResolvedTimeFrame, Segment};
use crate::timeframe::{TimeFrame, TimeFrameDef, TimeFrameRegistry};

/// Time frames, date overrides, and the queries that combine them.
///
/// Registration is expected to happen once during setup; every query takes
/// `&self` and keeps no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    time_frames: TimeFrameRegistry,
    date_frames: DateFrameRegistry,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a calendar from a deserialized definition.
    ///
    /// # Errors
    /// Fails like [`Calendar::register_time_frames`] and
    /// [`Calendar::register_date_frames`].
    pub fn from_definition(definition: CalendarDefinition) -> Result<Self> {
        let mut calendar = Self::new();
        calendar.register_time_frames(
            definition
                .time_frames
                .into_iter()
                .map(|named| (named.name, named.frame)),
        )?;
        calendar.register_date_frames(
            definition
                .date_frames
                .into_iter()
                .map(|named| (named.name, named.frame)),
        )?;
        Ok(calendar)
    }

    /// # Errors
    /// Returns `CalendarError::InvalidTimeFrame` on malformed bounds.
    pub fn register_time_frames<I, K>(&mut self, defs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, TimeFrameDef)>,
        K: Into<String>,
    {
        self.time_frames.register(defs)
    }

    /// # Errors
    /// Returns `CalendarError::InvalidDateFrame` on a malformed selector or
    /// empty target list.
    pub fn register_date_frames<I, K>(&mut self, defs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, DateFrameDef)>,
        K: Into<String>,
    {
        self.date_frames.register(defs)
    }

    pub fn remove_time_frames<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        self.time_frames.remove(names)
    }

    pub fn remove_date_frames<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        self.date_frames.remove(names)
    }

    pub fn clear_time_frames(&mut self) {
        self.time_frames.clear();
    }

    pub fn clear_date_frames(&mut self) {
        self.date_frames.clear();
    }

    /// # Errors
    /// Returns `CalendarError::UnknownTimeFrame` if `name` was never registered.
    pub fn time_frame(&self, name: &str) -> Result<&TimeFrame> {
        self.time_frames.lookup(name)
    }

    pub fn time_frames(&self) -> &TimeFrameRegistry {
        &self.time_frames
    }

    pub fn date_frames(&self) -> &DateFrameRegistry {
        &self.date_frames
    }

    /// See [`resolver::time_frames_for_date`].
    pub fn time_frames_for_date(&self, date: NaiveDate) -> Result<Vec<ResolvedTimeFrame>> {
        resolver::time_frames_for_date(&self.time_frames, &self.date_frames, date)
    }

    /// See [`resolver::solve`].
    pub fn solve(
        &self,
        frames: &[ResolvedTimeFrame],
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Segment>> {
        resolver::solve(frames, start, end)
    }

    /// Resolve `date` and tile it from midnight to the next midnight.
    pub fn solve_day(&self, date: NaiveDate) -> Result<Vec<Segment>> {
        let (start, end) = day_bounds(date);
        let frames = self.time_frames_for_date(date)?;
        resolver::solve(&frames, Some(start), Some(end))
    }

    /// Tile `[from, to)`, resolving frames separately for every day it touches.
    ///
    /// Equal neighbouring segments on either side of midnight are merged.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidRange` when `to <= from`, and
    /// `CalendarError::UnknownTimeFrame` when a day resolves to a missing frame.
    pub fn solve_span(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<Segment>> {
        if to <= from {
            return Err(CalendarError::InvalidRange {
                start: from,
                end: to,
            });
        }

        let mut segments: Vec<Segment> = Vec::new();
        let mut day = from.date();
        loop {
            let (day_start, day_end) = day_bounds(day);
            if day_start >= to {
                break;
            }
            let frames = self.time_frames_for_date(day)?;
            let pieces = resolver::solve(&frames, Some(day_start.max(from)), Some(day_end.min(to)))?;
            for piece in pieces {
                match segments.last_mut() {
                    Some(last) if last.end == piece.start && last.attributes == piece.attributes => {
                        last.end = piece.end;
                    }
                    _ => segments.push(piece),
                }
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        tracing::debug!(%from, %to, segments = segments.len(), "solved span");
        Ok(segments)
    }
}

/// Midnight of `date` and the following midnight.
///
/// The last representable day has no following midnight; its range ends at
/// `NaiveDateTime::MAX` instead.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date
        .succ_opt()
        .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
    (start, end)
}
