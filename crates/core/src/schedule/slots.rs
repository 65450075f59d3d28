//! Bookable slot generation.
//!
//! Slots are ephemeral: computed fresh for every availability query and
//! never stored. The walk happens in the tenant's wall-clock time and each
//! boundary is projected onto the timeline afterwards, so a working day
//! keeps its shape across daylight-saving transitions even when its
//! absolute span stretches or shrinks.

use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{conflict::BookedInterval, pattern::WeekPlan};

/// One bookable window with the concurrent capacity still free in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Inclusive start of the window.
    pub start: Timestamp,

    /// Exclusive end of the window.
    pub end: Timestamp,

    /// Capacity left after existing bookings are counted, floored at zero.
    pub remaining_capacity: u32,
}

impl Slot {
    /// Whether the slot can still take a booking.
    pub fn is_open(&self) -> bool {
        self.remaining_capacity > 0
    }
}

/// Failure to project a working window onto the timeline.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A slot boundary could not be resolved in the tenant's timezone.
    #[error("could not resolve a slot boundary in the tenant timezone")]
    Time(#[from] jiff::Error),
}

/// A tenant's week plan bound to the timezone its wall-clock times mean.
#[derive(Debug, Clone)]
pub struct SlotCalendar {
    plan: WeekPlan,
    tz: TimeZone,
}

impl SlotCalendar {
    /// Bind a plan to a timezone.
    pub fn new(plan: WeekPlan, tz: TimeZone) -> Self {
        Self { plan, tz }
    }

    /// The plan the calendar generates from.
    pub fn plan(&self) -> &WeekPlan {
        &self.plan
    }

    /// The timezone wall-clock times are projected through.
    pub fn timezone(&self) -> &TimeZone {
        &self.tz
    }

    /// Enumerate every full-length slot in `[from, from + lookahead_days)`
    /// and derate each by the bookings overlapping it.
    ///
    /// Days without a pattern, and days whose pattern has zero capacity,
    /// yield nothing. A trailing window shorter than the slot length is
    /// dropped. `booked` must contain only capacity-consuming bookings;
    /// exhausted slots stay in the result with `remaining_capacity` zero
    /// so advisory callers can show them as full.
    ///
    /// # Errors
    ///
    /// Fails if a slot boundary cannot be projected onto the timeline, for
    /// example when the walk runs past the supported datetime range.
    pub fn slots(
        &self,
        from: Date,
        lookahead_days: u16,
        booked: &[BookedInterval],
    ) -> Result<Vec<Slot>, ScheduleError> {
        let mut slots = Vec::new();

        for date in from.series(1.day()).take(usize::from(lookahead_days)) {
            let Some(pattern) = self.plan.pattern(date.weekday()) else {
                continue;
            };

            if !pattern.is_enabled() {
                continue;
            }

            let day_end = date.to_datetime(pattern.end);
            let step = i64::from(pattern.slot_minutes).minutes();
            let mut cursor = date.to_datetime(pattern.start);

            loop {
                let slot_end = cursor.checked_add(step)?;

                if slot_end > day_end {
                    break;
                }

                let start = cursor.to_zoned(self.tz.clone())?.timestamp();
                let end = slot_end.to_zoned(self.tz.clone())?.timestamp();

                slots.push(Slot {
                    start,
                    end,
                    remaining_capacity: pattern.capacity.saturating_sub(overlap_count(
                        booked, start, end,
                    )),
                });

                cursor = slot_end;
            }
        }

        Ok(slots)
    }

    /// Like [`Self::slots`] but keeping only slots with capacity left, the
    /// shape user-facing availability responses want.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::slots`].
    pub fn open_slots(
        &self,
        from: Date,
        lookahead_days: u16,
        booked: &[BookedInterval],
    ) -> Result<Vec<Slot>, ScheduleError> {
        let mut slots = self.slots(from, lookahead_days, booked)?;
        slots.retain(Slot::is_open);

        Ok(slots)
    }
}

fn overlap_count(booked: &[BookedInterval], start: Timestamp, end: Timestamp) -> u32 {
    let count = booked
        .iter()
        .filter(|interval| interval.overlaps(start, end))
        .count();

    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use jiff::civil::{Weekday, date, time};
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;
    use crate::schedule::pattern::{PatternError, WorkPattern};

    fn business_hours(weekday: Weekday, capacity: u32) -> WorkPattern {
        WorkPattern {
            weekday,
            start: time(9, 0, 0, 0),
            end: time(17, 0, 0, 0),
            slot_minutes: 60,
            capacity,
        }
    }

    fn utc_calendar(patterns: Vec<WorkPattern>) -> Result<SlotCalendar, PatternError> {
        Ok(SlotCalendar::new(
            WeekPlan::from_patterns(patterns)?,
            TimeZone::UTC,
        ))
    }

    fn booked(start: &str, end: &str) -> Result<BookedInterval, jiff::Error> {
        Ok(BookedInterval {
            uuid: Uuid::now_v7(),
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    // 2026-08-31 is a Monday.
    const MONDAY: Date = date(2026, 8, 31);

    #[test]
    fn business_day_yields_eight_hourly_slots() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 2)])?;

        let slots = calendar.slots(MONDAY, 1, &[])?;

        assert_eq!(slots.len(), 8);

        let closing: Timestamp = "2026-08-31T17:00:00Z".parse()?;

        for slot in &slots {
            assert!(slot.end <= closing, "slot {slot:?} runs past closing");
            assert_eq!(slot.remaining_capacity, 2);
        }

        let first_start: Option<Timestamp> = slots.first().map(|slot| slot.start);

        assert_eq!(first_start, Some("2026-08-31T09:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn trailing_partial_window_is_dropped() -> TestResult {
        let mut pattern = business_hours(Weekday::Monday, 1);
        pattern.end = time(17, 30, 0, 0);

        let calendar = utc_calendar(vec![pattern])?;

        let slots = calendar.slots(MONDAY, 1, &[])?;

        assert_eq!(slots.len(), 8);

        let last_end: Option<Timestamp> = slots.last().map(|slot| slot.end);

        assert_eq!(last_end, Some("2026-08-31T17:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn days_without_a_pattern_yield_nothing() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 2)])?;

        // A full week starting Monday only has the Monday configured.
        let slots = calendar.slots(MONDAY, 7, &[])?;

        assert_eq!(slots.len(), 8);

        Ok(())
    }

    #[test]
    fn zero_capacity_disables_the_day() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 0)])?;

        let slots = calendar.slots(MONDAY, 1, &[])?;

        assert!(slots.is_empty());

        Ok(())
    }

    #[test]
    fn zero_lookahead_yields_nothing() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 2)])?;

        let slots = calendar.slots(MONDAY, 0, &[])?;

        assert!(slots.is_empty());

        Ok(())
    }

    #[test]
    fn bookings_derate_only_the_slots_they_overlap() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 2)])?;
        let job = booked("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;

        let slots = calendar.slots(MONDAY, 1, &[job])?;

        let capacities: Vec<u32> = slots.iter().map(|slot| slot.remaining_capacity).collect();

        assert_eq!(capacities, [1, 2, 2, 2, 2, 2, 2, 2]);

        Ok(())
    }

    #[test]
    fn a_booking_spanning_two_slots_derates_both() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 1)])?;
        let job = booked("2026-08-31T09:30:00Z", "2026-08-31T10:30:00Z")?;

        let slots = calendar.slots(MONDAY, 1, &[job])?;

        let capacities: Vec<u32> = slots.iter().map(|slot| slot.remaining_capacity).collect();

        assert_eq!(capacities, [0, 0, 1, 1, 1, 1, 1, 1]);

        Ok(())
    }

    #[test]
    fn exhausted_slots_stay_visible_in_the_raw_listing() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 1)])?;
        let job = booked("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;

        let all = calendar.slots(MONDAY, 1, &[job])?;
        let open = calendar.open_slots(MONDAY, 1, &[job])?;

        assert_eq!(all.len(), 8);
        assert_eq!(open.len(), 7);
        assert!(open.iter().all(Slot::is_open));

        Ok(())
    }

    #[test]
    fn overbooked_slots_floor_at_zero_rather_than_underflowing() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 1)])?;
        let first = booked("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;
        let second = booked("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;

        let slots = calendar.slots(MONDAY, 1, &[first, second])?;

        let lowest: Option<u32> = slots.first().map(|slot| slot.remaining_capacity);

        assert_eq!(lowest, Some(0));

        Ok(())
    }

    #[test]
    fn wall_clock_times_project_through_the_calendar_timezone() -> TestResult {
        use jiff::tz::Offset;

        let plan = WeekPlan::from_patterns(vec![business_hours(Weekday::Monday, 1)])?;
        let calendar = SlotCalendar::new(plan, TimeZone::fixed(Offset::constant(-4)));

        let slots = calendar.slots(MONDAY, 1, &[])?;

        let first_start: Option<Timestamp> = slots.first().map(|slot| slot.start);

        // 09:00 at UTC-4 is 13:00 in UTC.
        assert_eq!(first_start, Some("2026-08-31T13:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn slots_serialise_with_camel_case_keys() -> TestResult {
        let calendar = utc_calendar(vec![business_hours(Weekday::Monday, 2)])?;

        let slots = calendar.slots(MONDAY, 1, &[])?;
        let json = serde_json::to_string(&slots)?;

        assert!(json.contains("remainingCapacity"), "got {json}");

        Ok(())
    }
}
