//! Frame selection for a calendar day and tiling of a time range into segments.
//!
//! [`time_frames_for_date`] picks the frames that apply to one day (date frame
//! overrides first, registered defaults otherwise) and anchors them to that day.
//! [`solve`] takes any list of anchored frames and tiles a range into
//! contiguous, attribute-uniform [`Segment`]s, later frames overriding earlier
//! ones where they overlap.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::dateframe::DateFrameRegistry;
use crate::error::{CalendarError, Result};
use crate::timeframe::{Attributes, TimeFrame, TimeFrameRegistry};

/// A time frame anchored to a concrete calendar day.
///
/// `start` and `end` are both `None` for all-day frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTimeFrame {
    pub name: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ResolvedTimeFrame {
    /// Anchor `frame` to `date`: its time-of-day bounds become datetimes on that day.
    pub fn anchor(frame: &TimeFrame, date: NaiveDate) -> Self {
        Self {
            name: frame.name.clone(),
            start: frame.start().map(|t| date.and_time(t)),
            end: frame.end().map(|t| date.and_time(t)),
            attributes: frame.attributes.clone(),
        }
    }

    pub fn bounded(
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        attributes: Attributes,
    ) -> Self {
        Self {
            name: name.into(),
            start: Some(start),
            end: Some(end),
            attributes,
        }
    }

    pub fn all_day(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
            attributes,
        }
    }

    /// `(start, end)` when both bounds are set.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.start.zip(self.end)
    }

    pub fn is_all_day(&self) -> bool {
        self.bounds().is_none()
    }

    pub fn working(&self) -> bool {
        self.attributes.working
    }
}

/// One half-open `[start, end)` piece of a solved range.
///
/// Bounds are `None` only when the range itself was open: no explicit bound was
/// given and no bounded frame could supply one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Segment {
    pub fn working(&self) -> bool {
        self.attributes.working
    }

    pub fn color(&self) -> Option<&str> {
        self.attributes.color.as_deref()
    }

    pub fn classes(&self) -> Option<&[String]> {
        self.attributes.classes.as_deref()
    }

    /// Length of the segment, `None` when it is unbounded on either side.
    pub fn duration(&self) -> Option<Duration> {
        self.start.zip(self.end).map(|(start, end)| end - start)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start.is_none_or(|s| s <= instant) && self.end.is_none_or(|e| instant < e)
    }
}

/// Select and anchor the time frames that apply to `date`.
///
/// When any date frame matches, its targets are used (in rule order, first
/// occurrence kept); otherwise every default time frame, in registration order.
///
/// # Errors
/// Returns `CalendarError::UnknownTimeFrame` when a matching date frame targets a
/// name missing from `time_frames`.
pub fn time_frames_for_date(
    time_frames: &TimeFrameRegistry,
    date_frames: &DateFrameRegistry,
    date: NaiveDate,
) -> Result<Vec<ResolvedTimeFrame>> {
    let targets = date_frames.matching_targets(date);

    let resolved = if targets.is_empty() {
        time_frames
            .defaults()
            .map(|frame| ResolvedTimeFrame::anchor(frame, date))
            .collect()
    } else {
        targets
            .into_iter()
            .map(|name| {
                time_frames
                    .lookup(name)
                    .map(|frame| ResolvedTimeFrame::anchor(frame, date))
            })
            .collect::<Result<Vec<_>>>()?
    };

    tracing::debug!(%date, frames = resolved.len(), "resolved time frames for date");
    Ok(resolved)
}

/// Tile a range into contiguous segments according to `frames`.
///
/// The range is `[start, end)` when both are given. A missing bound defaults to
/// the earliest start / latest end among bounded frames; with no bounded frame
/// it stays open and a single segment is returned.
///
/// Uncovered time is non-working when `frames` holds at least one bounded
/// frame, and working when it holds none. All-day frames replace that default
/// across the whole range (the last one wins), and bounded frames are laid on
/// top in list order, each overriding everything before it where it overlaps.
/// Adjacent pieces with equal attributes are merged.
///
/// # Errors
/// Returns `CalendarError::InvalidRange` when the resolved range has both
/// bounds and `end <= start`.
pub fn solve(
    frames: &[ResolvedTimeFrame],
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<Vec<Segment>> {
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            return Err(CalendarError::InvalidRange { start, end });
        }
    }

    let has_bounded = frames.iter().any(|f| !f.is_all_day());
    let fill = frames
        .iter()
        .rev()
        .find(|f| f.is_all_day())
        .map(|f| f.attributes.clone())
        .unwrap_or_else(|| Attributes::plain(!has_bounded));

    // Degenerate bounds still make uncovered time closed, but tile nothing.
    let bounded: Vec<(NaiveDateTime, NaiveDateTime, &Attributes)> = frames
        .iter()
        .filter_map(|f| f.bounds().map(|(s, e)| (s, e, &f.attributes)))
        .filter(|(s, e, _)| s < e)
        .collect();

    let range_start = start.or_else(|| bounded.iter().map(|b| b.0).min());
    let range_end = end.or_else(|| bounded.iter().map(|b| b.1).max());

    let (lo, hi) = match (range_start, range_end) {
        (Some(lo), Some(hi)) if hi <= lo => {
            return Err(CalendarError::InvalidRange { start: lo, end: hi })
        }
        (Some(lo), Some(hi)) => (lo, hi),
        (lo, hi) => {
            tracing::debug!(start = ?lo, end = ?hi, "solving open range as a single segment");
            return Ok(vec![Segment {
                start: lo,
                end: hi,
                attributes: fill,
            }]);
        }
    };

    let clips: Vec<(NaiveDateTime, NaiveDateTime, &Attributes)> = bounded
        .iter()
        .map(|&(s, e, attrs)| (s.max(lo), e.min(hi), attrs))
        .filter(|(s, e, _)| s < e)
        .collect();

    let mut cuts: Vec<NaiveDateTime> = Vec::with_capacity(clips.len() * 2 + 2);
    cuts.push(lo);
    cuts.push(hi);
    cuts.extend(clips.iter().flat_map(|&(s, e, _)| [s, e]));
    cuts.sort();
    cuts.dedup();

    let mut segments: Vec<Segment> = Vec::new();
    for window in cuts.windows(2) {
        let (a, b) = (window[0], window[1]);
        // Atomic pieces never straddle a clip boundary, so containment is exact.
        let attributes = clips
            .iter()
            .rev()
            .find(|&&(s, e, _)| s <= a && b <= e)
            .map_or(&fill, |&(_, _, attrs)| attrs);

        match segments.last_mut() {
            Some(last) if last.attributes == *attributes => last.end = Some(b),
            _ => segments.push(Segment {
                start: Some(a),
                end: Some(b),
                attributes: attributes.clone(),
            }),
        }
    }

    tracing::debug!(%lo, %hi, frames = frames.len(), segments = segments.len(), "solved range");
    Ok(segments)
}

/// Total time covered by bounded working segments.
pub fn working_duration(segments: &[Segment]) -> Duration {
    segments
        .iter()
        .filter(|s| s.working())
        .filter_map(Segment::duration)
        .fold(Duration::zero(), |acc, d| acc + d)
}
