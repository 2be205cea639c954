//! Selection helpers over in-memory slot lists.
//!
//! Pure functions, no I/O. The `*_now` variants read the system clock; the
//! others take `now` explicitly.

use chrono::{DateTime, Utc};

use crate::slot::AvailabilitySlot;

/// Number of slots returned by [`next_slots`] when callers have no preference.
pub const DEFAULT_NEXT_SLOT_COUNT: usize = 3;

/// Returns the slots starting strictly after `now`, in input order.
pub fn filter_future_slots(
    slots: &[AvailabilitySlot],
    now: DateTime<Utc>,
) -> Vec<AvailabilitySlot> {
    slots
        .iter()
        .filter(|slot| slot.starts_after(now))
        .cloned()
        .collect()
}

/// Returns up to `count` future slots, earliest first.
///
/// The sort is stable: slots with the same start keep their input order.
pub fn next_slots(
    slots: &[AvailabilitySlot],
    count: usize,
    now: DateTime<Utc>,
) -> Vec<AvailabilitySlot> {
    let mut upcoming = filter_future_slots(slots, now);
    upcoming.sort_by_key(|slot| slot.datetime);
    upcoming.truncate(count);
    upcoming
}

/// [`filter_future_slots`] against the system clock.
pub fn filter_future_slots_now(slots: &[AvailabilitySlot]) -> Vec<AvailabilitySlot> {
    filter_future_slots(slots, Utc::now())
}

/// [`next_slots`] against the system clock.
pub fn next_slots_now(slots: &[AvailabilitySlot], count: usize) -> Vec<AvailabilitySlot> {
    next_slots(slots, count, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn slot(key: &str, offset_minutes: i64) -> AvailabilitySlot {
        let start = now() + Duration::minutes(offset_minutes);
        AvailabilitySlot::new(key, start, start + Duration::hours(1), "fac", key)
    }

    fn keys(slots: &[AvailabilitySlot]) -> Vec<&str> {
        slots.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn future_filter_excludes_now_and_past() {
        let slots = vec![slot("past", -30), slot("now", 0), slot("soon", 15)];
        let future = filter_future_slots(&slots, now());
        assert_eq!(keys(&future), vec!["soon"]);
    }

    #[test]
    fn next_slots_picks_earliest_future() {
        let slots = vec![
            slot("late", 240),
            slot("past", -60),
            slot("early", 30),
            slot("now", 0),
            slot("middle", 90),
        ];

        let next = next_slots(&slots, 2, now());
        assert_eq!(keys(&next), vec!["early", "middle"]);
    }

    #[test]
    fn next_slots_default_count() {
        let slots: Vec<_> = (1..=5).map(|i| slot(&format!("s{i}"), i * 10)).collect();
        let next = next_slots(&slots, DEFAULT_NEXT_SLOT_COUNT, now());
        assert_eq!(keys(&next), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn next_slots_ties_keep_input_order() {
        let slots = vec![slot("b", 30), slot("a", 30), slot("c", 10)];
        let next = next_slots(&slots, 3, now());
        assert_eq!(keys(&next), vec!["c", "b", "a"]);
    }

    #[test]
    fn next_slots_with_fewer_than_count() {
        let slots = vec![slot("only", 5), slot("gone", -5)];
        assert_eq!(keys(&next_slots(&slots, 3, now())), vec!["only"]);
        assert!(next_slots(&[], 3, now()).is_empty());
    }
}
