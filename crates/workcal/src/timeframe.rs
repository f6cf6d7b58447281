//! Named time-of-day spans and the registry that holds them.
//!
//! A [`TimeFrame`] is either bounded (a `start..end` time-of-day span within a
//! single day) or all-day. Frames are registered once, in a stable order that
//! later acts as a tie-break when frames overlap.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Display and working-state attributes shared by frames and solved segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub working: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
}

impl Attributes {
    /// Plain working or non-working attributes with no display metadata.
    pub fn plain(working: bool) -> Self {
        Self {
            working,
            color: None,
            classes: None,
        }
    }
}

/// A time-of-day span with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Descriptor supplied at registration time.
///
/// Deserializes from `{ "start": "09:00", "end": "18:00", "working": true,
/// "color": "red", "classes": "noon-css", "default": true }`. `classes` takes a
/// single token or a list of tokens; `working` defaults to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFrameDef {
    #[serde(default, with = "time_of_day", skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "time_of_day", skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveTime>,
    #[serde(default = "default_working")]
    pub working: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub classes: Option<Vec<String>>,
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

fn default_working() -> bool {
    true
}

impl Default for TimeFrameDef {
    fn default() -> Self {
        Self::all_day()
    }
}

impl TimeFrameDef {
    /// A working frame spanning `start..end` of every day it applies to.
    pub fn bounded(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::all_day()
        }
    }

    /// A working frame covering the whole day.
    pub fn all_day() -> Self {
        Self {
            start: None,
            end: None,
            working: true,
            color: None,
            classes: None,
            is_default: false,
        }
    }

    pub fn non_working(mut self) -> Self {
        self.working = false;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the frame as used on dates no date frame overrides.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    fn validate(self, name: &str) -> Result<TimeFrame> {
        let span = match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Some(TimeSpan { start, end }),
            (Some(start), Some(end)) => {
                return Err(CalendarError::InvalidTimeFrame {
                    name: name.to_string(),
                    reason: format!("start {start} must be before end {end}"),
                })
            }
            (None, None) => None,
            _ => {
                return Err(CalendarError::InvalidTimeFrame {
                    name: name.to_string(),
                    reason: "start and end must be given together".to_string(),
                })
            }
        };
        Ok(TimeFrame {
            name: name.to_string(),
            span,
            attributes: Attributes {
                working: self.working,
                color: self.color,
                classes: self.classes,
            },
            is_default: self.is_default,
        })
    }
}

/// A validated, registered time frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFrame {
    pub name: String,
    /// `None` for all-day frames.
    pub span: Option<TimeSpan>,
    pub attributes: Attributes,
    pub is_default: bool,
}

impl TimeFrame {
    pub fn start(&self) -> Option<NaiveTime> {
        self.span.map(|s| s.start)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        self.span.map(|s| s.end)
    }

    pub fn working(&self) -> bool {
        self.attributes.working
    }

    pub fn is_all_day(&self) -> bool {
        self.span.is_none()
    }
}

/// Insertion-ordered store of [`TimeFrame`]s keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TimeFrameRegistry {
    frames: Vec<TimeFrame>,
    index: HashMap<String, usize>,
}

impl TimeFrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace frames, in the order given.
    ///
    /// A replaced frame keeps its original position. The whole batch is
    /// validated first: on error nothing is inserted.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidTimeFrame` when a descriptor has only one
    /// bound or `start >= end`.
    pub fn register<I, K>(&mut self, defs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, TimeFrameDef)>,
        K: Into<String>,
    {
        let validated = defs
            .into_iter()
            .map(|(name, def)| {
                let name: String = name.into();
                def.validate(&name)
            })
            .collect::<Result<Vec<_>>>()?;

        for frame in validated {
            tracing::debug!(name = %frame.name, all_day = frame.is_all_day(), "registering time frame");
            match self.index.get(&frame.name) {
                Some(&pos) => self.frames[pos] = frame,
                None => {
                    self.index.insert(frame.name.clone(), self.frames.len());
                    self.frames.push(frame);
                }
            }
        }
        Ok(())
    }

    /// # Errors
    /// Returns `CalendarError::UnknownTimeFrame` if `name` was never registered.
    pub fn lookup(&self, name: &str) -> Result<&TimeFrame> {
        self.get(name)
            .ok_or_else(|| CalendarError::UnknownTimeFrame(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&TimeFrame> {
        self.index.get(name).map(|&pos| &self.frames[pos])
    }

    /// Frames flagged `default`, in registration order.
    pub fn defaults(&self) -> impl Iterator<Item = &TimeFrame> {
        self.frames.iter().filter(|f| f.is_default)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeFrame> {
        self.frames.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.name.as_str())
    }

    /// Remove frames by name. Unknown names are ignored. Returns how many were removed.
    pub fn remove<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        let before = self.frames.len();
        self.frames
            .retain(|f| !names.iter().any(|n| n.as_ref() == f.name));
        self.reindex();
        before - self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn reindex(&mut self) {
        self.index = self
            .frames
            .iter()
            .enumerate()
            .map(|(pos, f)| (f.name.clone(), pos))
            .collect();
    }
}

/// Parse a `"HH:MM"` or `"HH:MM:SS"` time of day.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    time_of_day::parse(s)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::One(token) => vec![token],
        OneOrMany::Many(tokens) => tokens,
    }))
}

/// `"HH:MM"` / `"HH:MM:SS"` serde for optional time-of-day fields.
pub(crate) mod time_of_day {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
    }

    pub fn format(t: &NaiveTime) -> String {
        if t.second() == 0 {
            t.format("%H:%M").to_string()
        } else {
            t.format("%H:%M:%S").to_string()
        }
    }

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&format(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| {
            parse(&s).ok_or_else(|| de::Error::custom(format!("invalid time of day '{s}'")))
        })
        .transpose()
    }
}
