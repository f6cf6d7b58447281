//! Property-based tests for `solve` using proptest.
//!
//! These check tiling invariants for arbitrary frame lists, not just the
//! scenarios in `solve_tests.rs`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use workcal::{solve, Attributes, ResolvedTimeFrame};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn minute(m: i64) -> NaiveDateTime {
    base() + Duration::minutes(m)
}

fn arb_attributes() -> impl Strategy<Value = Attributes> {
    (
        any::<bool>(),
        prop::option::of(prop_oneof![Just("red".to_string()), Just("blue".to_string())]),
    )
        .prop_map(|(working, color)| Attributes {
            working,
            color,
            classes: None,
        })
}

/// A bounded frame somewhere in the first day, 15-minute resolution.
fn arb_bounded() -> impl Strategy<Value = ResolvedTimeFrame> {
    (0i64..96, 1i64..=32, arb_attributes()).prop_map(|(slot, len, attrs)| {
        let start = slot * 15;
        let end = (start + len * 15).min(24 * 60);
        ResolvedTimeFrame::bounded("b", minute(start), minute(end), attrs)
    })
}

fn arb_frame() -> impl Strategy<Value = ResolvedTimeFrame> {
    prop_oneof![
        4 => arb_bounded(),
        1 => arb_attributes().prop_map(|attrs| ResolvedTimeFrame::all_day("a", attrs)),
    ]
}

fn arb_range() -> impl Strategy<Value = (NaiveDateTime, NaiveDateTime)> {
    (0i64..1440, 1i64..1440).prop_map(|(start, len)| (minute(start), minute(start + len)))
}

/// Attributes a single instant should carry, computed directly from the rules.
fn expected_at(frames: &[ResolvedTimeFrame], instant: NaiveDateTime) -> Attributes {
    let has_bounded = frames.iter().any(|f| !f.is_all_day());
    let fill = frames
        .iter()
        .rev()
        .find(|f| f.is_all_day())
        .map(|f| f.attributes.clone())
        .unwrap_or_else(|| Attributes::plain(!has_bounded));
    frames
        .iter()
        .rev()
        .find(|f| matches!(f.bounds(), Some((s, e)) if s <= instant && instant < e))
        .map(|f| f.attributes.clone())
        .unwrap_or(fill)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Segments are contiguous and exactly cover the requested range.
    #[test]
    fn segments_tile_explicit_range(
        frames in prop::collection::vec(arb_frame(), 0..8),
        (start, end) in arb_range(),
    ) {
        let segments = solve(&frames, Some(start), Some(end)).unwrap();

        prop_assert!(!segments.is_empty());
        prop_assert_eq!(segments[0].start, Some(start));
        prop_assert_eq!(segments[segments.len() - 1].end, Some(end));
        for pair in segments.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
            prop_assert!(pair[0].start < pair[0].end);
            // Maximal runs: neighbours always differ.
            prop_assert_ne!(&pair[0].attributes, &pair[1].attributes);
        }
    }

    /// Every instant carries the attributes of the last frame covering it.
    #[test]
    fn later_frames_take_precedence(
        frames in prop::collection::vec(arb_frame(), 0..8),
        (start, end) in arb_range(),
        sample in 0i64..1440,
    ) {
        let segments = solve(&frames, Some(start), Some(end)).unwrap();
        let instant = minute(sample);
        prop_assume!(start <= instant && instant < end);

        let seg = segments.iter().find(|s| s.contains(instant)).unwrap();
        prop_assert_eq!(&seg.attributes, &expected_at(&frames, instant));
    }

    /// Without an explicit range, bounded frames define it.
    #[test]
    fn implicit_range_is_frame_envelope(
        frames in prop::collection::vec(arb_bounded(), 1..8),
    ) {
        let segments = solve(&frames, None, None).unwrap();
        let lo = frames.iter().filter_map(|f| f.start).min();
        let hi = frames.iter().filter_map(|f| f.end).max();

        prop_assert_eq!(segments[0].start, lo);
        prop_assert_eq!(segments[segments.len() - 1].end, hi);
    }
}
