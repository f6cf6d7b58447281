//! Date-scoped overrides: rules that swap in alternate time frames for some days.
//!
//! Each [`DateFrame`] pairs a [`DateSelector`] with an ordered list of time frame
//! names. Target names are resolved lazily, when a date is queried.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Predicate deciding whether a date frame applies to a date.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateEvaluator {
    /// Matches any of the listed weekdays (e.g. `["Sat", "Sun"]`).
    Weekdays(Vec<Weekday>),
    /// Matches the same month and day every year. `month` is 1-based.
    MonthDay { month: u32, day: u32 },
    /// Arbitrary predicate, available to programmatic callers only.
    #[serde(skip)]
    Custom(Arc<dyn Fn(NaiveDate) -> bool + Send + Sync>),
}

impl DateEvaluator {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(NaiveDate) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn weekend() -> Self {
        Self::Weekdays(vec![Weekday::Sat, Weekday::Sun])
    }

    pub fn evaluate(&self, date: NaiveDate) -> bool {
        match self {
            Self::Weekdays(days) => days.contains(&date.weekday()),
            Self::MonthDay { month, day } => date.month() == *month && date.day() == *day,
            Self::Custom(f) => f(date),
        }
    }
}

impl fmt::Debug for DateEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekdays(days) => f.debug_tuple("Weekdays").field(days).finish(),
            Self::MonthDay { month, day } => f
                .debug_struct("MonthDay")
                .field("month", month)
                .field("day", day)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Which dates a [`DateFrame`] applies to.
#[derive(Debug, Clone)]
pub enum DateSelector {
    /// Exactly one calendar day.
    Date(NaiveDate),
    /// Every day in `start..=end`.
    Range { start: NaiveDate, end: NaiveDate },
    Evaluator(DateEvaluator),
}

impl DateSelector {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Self::Date(day) => *day == date,
            Self::Range { start, end } => *start <= date && date <= *end,
            Self::Evaluator(evaluator) => evaluator.evaluate(date),
        }
    }
}

/// Descriptor supplied at registration time.
///
/// Exactly one of `date`, the `start`/`end` pair, or `evaluator` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateFrameDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluator: Option<DateEvaluator>,
    #[serde(default)]
    pub targets: Vec<String>,
}

impl DateFrameDef {
    pub fn on<I, S>(date: NaiveDate, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            date: Some(date),
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn between<I, S>(start: NaiveDate, end: NaiveDate, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start: Some(start),
            end: Some(end),
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn when<I, S>(evaluator: DateEvaluator, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            evaluator: Some(evaluator),
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn validate(self, name: &str) -> Result<DateFrame> {
        let invalid = |reason: String| CalendarError::InvalidDateFrame {
            name: name.to_string(),
            reason,
        };

        let range = match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            (Some(start), Some(end)) => {
                return Err(invalid(format!("range start {start} is after end {end}")))
            }
            (None, None) => None,
            _ => return Err(invalid("start and end must be given together".to_string())),
        };

        let selector = match (self.date, range, self.evaluator) {
            (Some(date), None, None) => DateSelector::Date(date),
            (None, Some((start, end)), None) => DateSelector::Range { start, end },
            (None, None, Some(evaluator)) => {
                if let DateEvaluator::MonthDay { month, day } = &evaluator {
                    // 2000 is a leap year, so Feb 29 is accepted.
                    if NaiveDate::from_ymd_opt(2000, *month, *day).is_none() {
                        return Err(invalid(format!("no such month/day {month}/{day}")));
                    }
                }
                DateSelector::Evaluator(evaluator)
            }
            (None, None, None) => {
                return Err(invalid(
                    "one of date, start/end or evaluator is required".to_string(),
                ))
            }
            _ => {
                return Err(invalid(
                    "only one of date, start/end or evaluator may be given".to_string(),
                ))
            }
        };

        if self.targets.is_empty() {
            return Err(invalid("targets must not be empty".to_string()));
        }

        Ok(DateFrame {
            name: name.to_string(),
            selector,
            targets: self.targets,
        })
    }
}

/// A validated, registered date frame.
#[derive(Debug, Clone)]
pub struct DateFrame {
    pub name: String,
    pub selector: DateSelector,
    pub targets: Vec<String>,
}

/// Insertion-ordered store of [`DateFrame`]s keyed by name.
#[derive(Debug, Clone, Default)]
pub struct DateFrameRegistry {
    frames: Vec<DateFrame>,
    index: HashMap<String, usize>,
}

impl DateFrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace rules, in the order given.
    ///
    /// The batch is validated before anything is inserted. A replaced rule keeps
    /// its original position.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidDateFrame` when a descriptor has no selector,
    /// more than one selector, a half-open or inverted range, or no targets.
    pub fn register<I, K>(&mut self, defs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, DateFrameDef)>,
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
            tracing::debug!(name = %frame.name, targets = ?frame.targets, "registering date frame");
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

    /// Targets of every rule matching `date`, in rule order, first occurrence kept.
    ///
    /// Empty when no rule matches.
    pub fn matching_targets(&self, date: NaiveDate) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for frame in self.frames.iter().filter(|f| f.selector.matches(date)) {
            tracing::trace!(name = %frame.name, %date, "date frame matched");
            for target in &frame.targets {
                if !targets.contains(&target.as_str()) {
                    targets.push(target.as_str());
                }
            }
        }
        targets
    }

    pub fn get(&self, name: &str) -> Option<&DateFrame> {
        self.index.get(name).map(|&pos| &self.frames[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateFrame> {
        self.frames.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.name.as_str())
    }

    /// Remove rules by name. Unknown names are ignored. Returns how many were removed.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let sel = DateSelector::Range {
            start: ymd(2014, 8, 15),
            end: ymd(2014, 8, 30),
        };
        assert!(sel.matches(ymd(2014, 8, 15)));
        assert!(sel.matches(ymd(2014, 8, 30)));
        assert!(!sel.matches(ymd(2014, 8, 14)));
        assert!(!sel.matches(ymd(2014, 8, 31)));
    }

    #[test]
    fn month_day_rejects_impossible_dates() {
        let def = DateFrameDef::when(DateEvaluator::MonthDay { month: 2, day: 30 }, ["x"]);
        assert!(matches!(
            def.validate("bad"),
            Err(CalendarError::InvalidDateFrame { .. })
        ));

        let leap = DateFrameDef::when(DateEvaluator::MonthDay { month: 2, day: 29 }, ["x"]);
        assert!(leap.validate("leap").is_ok());
    }

    #[test]
    fn weekday_evaluator_deserializes_from_names() {
        let def: DateFrameDef = serde_json::from_str(
            r#"{"evaluator": {"weekdays": ["Sat", "Sun"]}, "targets": ["weekend"]}"#,
        )
        .unwrap();
        let frame = def.validate("weekend").unwrap();
        // 2014-11-01 was a Saturday.
        assert!(frame.selector.matches(ymd(2014, 11, 1)));
        assert!(!frame.selector.matches(ymd(2014, 11, 3)));
    }

    #[test]
    fn removal_keeps_lookup_and_replacement_positions() {
        let mut registry = DateFrameRegistry::new();
        registry
            .register([
                ("a", DateFrameDef::on(ymd(2014, 1, 1), ["x"])),
                ("b", DateFrameDef::on(ymd(2014, 1, 2), ["y"])),
                ("c", DateFrameDef::on(ymd(2014, 1, 3), ["z"])),
            ])
            .unwrap();

        assert_eq!(registry.remove(&["b", "unknown"]), 1);
        assert!(registry.get("b").is_none());
        assert_eq!(registry.get("c").unwrap().targets, vec!["z".to_string()]);

        registry
            .register([("c", DateFrameDef::on(ymd(2014, 1, 3), ["w"]))])
            .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(registry.matching_targets(ymd(2014, 1, 3)), vec!["w"]);
    }
}
