//! Weekly working patterns.
//!
//! A tenant describes their working week as at most one [`WorkPattern`] per
//! weekday. The pattern carries the working window, the slot length the day
//! is divided into and how many jobs can run at once. A [`WeekPlan`] holds
//! the full week and is the input to slot generation.

use jiff::civil::{Time, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weekday serde representation: lowercase names on the way out, names or
/// Sunday-zero indexes on the way in.
pub mod weekday_name {
    use jiff::civil::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Lowercase English name of a weekday.
    pub fn name(weekday: Weekday) -> &'static str {
        match weekday {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }

    /// Parse a weekday from its English name, full or three-letter.
    pub fn from_name(name: &str) -> Option<Weekday> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Some(Weekday::Sunday),
            "monday" | "mon" => Some(Weekday::Monday),
            "tuesday" | "tue" => Some(Weekday::Tuesday),
            "wednesday" | "wed" => Some(Weekday::Wednesday),
            "thursday" | "thu" => Some(Weekday::Thursday),
            "friday" | "fri" => Some(Weekday::Friday),
            "saturday" | "sat" => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Serialize a weekday as its lowercase name.
    pub fn serialize<S>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(name(*weekday))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Index(i8),
        Name(String),
    }

    /// Deserialize a weekday from a name or a Sunday-zero index.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Index(index) => Weekday::from_sunday_zero_offset(index).map_err(de::Error::custom),
            Raw::Name(raw) => {
                from_name(&raw).ok_or_else(|| de::Error::custom(format!("unknown weekday {raw:?}")))
            }
        }
    }
}

/// Why a working pattern or a week of patterns was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The working window must open before it closes.
    #[error("pattern must start before it ends")]
    StartNotBeforeEnd,

    /// Slot length must be a positive number of minutes.
    #[error("slot duration must be a positive number of minutes")]
    NonPositiveSlotDuration,

    /// A week holds at most one pattern per weekday.
    #[error("two patterns configured for {0:?}")]
    DuplicateWeekday(Weekday),
}

/// One weekday's working window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPattern {
    /// Day of the week this pattern applies to.
    #[serde(with = "weekday_name")]
    pub weekday: Weekday,

    /// Local wall-clock time the working window opens.
    pub start: Time,

    /// Local wall-clock time the working window closes.
    pub end: Time,

    /// Length of each bookable slot in minutes.
    pub slot_minutes: i32,

    /// How many jobs can run at the same time. Zero switches the day off.
    pub capacity: u32,
}

impl WorkPattern {
    /// Check the window and slot length.
    ///
    /// Capacity is not checked here; zero capacity is the off switch for a
    /// day, not an error.
    ///
    /// # Errors
    ///
    /// Fails when the window opens at or after it closes, or when the slot
    /// length is zero or negative.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.start >= self.end {
            return Err(PatternError::StartNotBeforeEnd);
        }

        if self.slot_minutes <= 0 {
            return Err(PatternError::NonPositiveSlotDuration);
        }

        Ok(())
    }

    /// Whether the day accepts bookings at all.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Sunday-zero storage index for this pattern's weekday.
    pub fn day_index(&self) -> u8 {
        self.weekday.to_sunday_zero_offset().unsigned_abs()
    }
}

/// A tenant's full working week, at most one pattern per weekday.
///
/// Construction validates every pattern, so a held plan is always
/// internally consistent. Days without a pattern are closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WorkPattern>", into = "Vec<WorkPattern>")]
pub struct WeekPlan {
    days: [Option<WorkPattern>; 7],
}

fn day_index(weekday: Weekday) -> usize {
    usize::from(weekday.to_sunday_zero_offset().unsigned_abs())
}

impl WeekPlan {
    /// Build a plan from individual patterns.
    ///
    /// # Errors
    ///
    /// Fails if any pattern is invalid or if two patterns share a weekday.
    pub fn from_patterns(
        patterns: impl IntoIterator<Item = WorkPattern>,
    ) -> Result<Self, PatternError> {
        let mut plan = Self::default();

        for pattern in patterns {
            let weekday = pattern.weekday;

            if plan.upsert(pattern)?.is_some() {
                return Err(PatternError::DuplicateWeekday(weekday));
            }
        }

        Ok(plan)
    }

    /// Insert or replace the pattern for its weekday, returning the
    /// replaced pattern if there was one.
    ///
    /// # Errors
    ///
    /// Fails if the pattern itself is invalid; the plan is left untouched.
    pub fn upsert(&mut self, pattern: WorkPattern) -> Result<Option<WorkPattern>, PatternError> {
        pattern.validate()?;

        Ok(self
            .days
            .get_mut(day_index(pattern.weekday))
            .and_then(|slot| slot.replace(pattern)))
    }

    /// Remove the pattern for a weekday, returning it if one was set.
    pub fn remove(&mut self, weekday: Weekday) -> Option<WorkPattern> {
        self.days
            .get_mut(day_index(weekday))
            .and_then(Option::take)
    }

    /// The pattern for a weekday, if the day is configured.
    pub fn pattern(&self, weekday: Weekday) -> Option<&WorkPattern> {
        self.days.get(day_index(weekday)).and_then(Option::as_ref)
    }

    /// Concurrent-job capacity for a weekday. Unconfigured days have none.
    pub fn capacity(&self, weekday: Weekday) -> u32 {
        self.pattern(weekday).map_or(0, |pattern| pattern.capacity)
    }

    /// Whether no weekday is configured.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }

    /// Configured patterns in Sunday-first order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkPattern> {
        self.days.iter().filter_map(Option::as_ref)
    }
}

impl TryFrom<Vec<WorkPattern>> for WeekPlan {
    type Error = PatternError;

    fn try_from(patterns: Vec<WorkPattern>) -> Result<Self, Self::Error> {
        Self::from_patterns(patterns)
    }
}

impl From<WeekPlan> for Vec<WorkPattern> {
    fn from(plan: WeekPlan) -> Self {
        plan.days.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;
    use testresult::TestResult;

    use super::*;

    fn pattern(weekday: Weekday) -> WorkPattern {
        WorkPattern {
            weekday,
            start: time(9, 0, 0, 0),
            end: time(17, 0, 0, 0),
            slot_minutes: 60,
            capacity: 2,
        }
    }

    #[test]
    fn well_formed_pattern_passes() -> TestResult {
        pattern(Weekday::Monday).validate()?;

        Ok(())
    }

    #[test]
    fn window_must_open_before_it_closes() {
        let mut subject = pattern(Weekday::Monday);
        subject.end = subject.start;

        assert_eq!(subject.validate(), Err(PatternError::StartNotBeforeEnd));

        subject.end = time(8, 0, 0, 0);

        assert_eq!(subject.validate(), Err(PatternError::StartNotBeforeEnd));
    }

    #[test]
    fn slot_length_must_be_positive() {
        let mut subject = pattern(Weekday::Monday);
        subject.slot_minutes = 0;

        assert_eq!(subject.validate(), Err(PatternError::NonPositiveSlotDuration));

        subject.slot_minutes = -30;

        assert_eq!(subject.validate(), Err(PatternError::NonPositiveSlotDuration));
    }

    #[test]
    fn zero_capacity_disables_the_day_without_invalidating_it() -> TestResult {
        let mut subject = pattern(Weekday::Monday);
        subject.capacity = 0;

        subject.validate()?;
        assert!(!subject.is_enabled());

        Ok(())
    }

    #[test]
    fn plan_looks_up_patterns_by_weekday() -> TestResult {
        let plan = WeekPlan::from_patterns([
            pattern(Weekday::Monday),
            pattern(Weekday::Wednesday),
        ])?;

        assert!(plan.pattern(Weekday::Monday).is_some());
        assert!(plan.pattern(Weekday::Tuesday).is_none());
        assert_eq!(plan.capacity(Weekday::Wednesday), 2);
        assert_eq!(plan.capacity(Weekday::Sunday), 0);

        Ok(())
    }

    #[test]
    fn duplicate_weekdays_are_rejected() {
        let result = WeekPlan::from_patterns([
            pattern(Weekday::Monday),
            pattern(Weekday::Monday),
        ]);

        assert_eq!(result, Err(PatternError::DuplicateWeekday(Weekday::Monday)));
    }

    #[test]
    fn invalid_pattern_poisons_the_whole_plan() {
        let mut bad = pattern(Weekday::Friday);
        bad.slot_minutes = 0;

        let result = WeekPlan::from_patterns([pattern(Weekday::Monday), bad]);

        assert_eq!(result, Err(PatternError::NonPositiveSlotDuration));
    }

    #[test]
    fn upsert_replaces_and_returns_the_previous_pattern() -> TestResult {
        let mut plan = WeekPlan::from_patterns([pattern(Weekday::Monday)])?;

        let mut replacement = pattern(Weekday::Monday);
        replacement.capacity = 5;

        let previous = plan.upsert(replacement)?;

        assert_eq!(previous.map(|p| p.capacity), Some(2));
        assert_eq!(plan.capacity(Weekday::Monday), 5);

        Ok(())
    }

    #[test]
    fn remove_clears_a_day() -> TestResult {
        let mut plan = WeekPlan::from_patterns([pattern(Weekday::Monday)])?;

        assert!(plan.remove(Weekday::Monday).is_some());
        assert!(plan.remove(Weekday::Monday).is_none());
        assert!(plan.is_empty());

        Ok(())
    }

    #[test]
    fn weekdays_deserialise_from_names_and_indexes() -> TestResult {
        let by_name: WorkPattern = serde_json::from_str(
            r#"{"weekday": "monday", "start": "09:00:00", "end": "17:00:00", "slotMinutes": 60, "capacity": 2}"#,
        )?;
        let by_index: WorkPattern = serde_json::from_str(
            r#"{"weekday": 1, "start": "09:00:00", "end": "17:00:00", "slotMinutes": 60, "capacity": 2}"#,
        )?;

        assert_eq!(by_name, by_index);
        assert_eq!(by_name.weekday, Weekday::Monday);

        Ok(())
    }

    #[test]
    fn unknown_weekdays_are_rejected() {
        let result: Result<WorkPattern, _> = serde_json::from_str(
            r#"{"weekday": "noday", "start": "09:00:00", "end": "17:00:00", "slotMinutes": 60, "capacity": 2}"#,
        );

        assert!(result.is_err());

        let result: Result<WorkPattern, _> = serde_json::from_str(
            r#"{"weekday": 7, "start": "09:00:00", "end": "17:00:00", "slotMinutes": 60, "capacity": 2}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn plans_round_trip_as_pattern_lists() -> TestResult {
        let plan = WeekPlan::from_patterns([
            pattern(Weekday::Monday),
            pattern(Weekday::Saturday),
        ])?;

        let json = serde_json::to_string(&plan)?;
        let restored: WeekPlan = serde_json::from_str(&json)?;

        assert_eq!(plan, restored);

        Ok(())
    }

    #[test]
    fn sunday_sorts_first_in_iteration() -> TestResult {
        let plan = WeekPlan::from_patterns([
            pattern(Weekday::Saturday),
            pattern(Weekday::Sunday),
            pattern(Weekday::Tuesday),
        ])?;

        let order: Vec<_> = plan.iter().map(|p| p.weekday).collect();

        assert_eq!(order, [Weekday::Sunday, Weekday::Tuesday, Weekday::Saturday]);

        Ok(())
    }
}
