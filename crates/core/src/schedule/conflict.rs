//! Overlap counting against existing bookings.
//!
//! The guard answers one question: may a candidate interval be admitted
//! given what is already on the books and how many jobs the day allows at
//! once? Callers pass only capacity-consuming bookings; cancelled and
//! declined work must already be filtered out.

use jiff::Timestamp;
use smallvec::SmallVec;
use uuid::Uuid;

/// An existing booking's occupied interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    /// Identity of the booking occupying the interval.
    pub uuid: Uuid,

    /// Inclusive start of the occupied interval.
    pub start: Timestamp,

    /// Exclusive end of the occupied interval.
    pub end: Timestamp,
}

impl BookedInterval {
    /// Half-open overlap test: touching boundaries do not overlap, so a
    /// job may start the instant another ends.
    pub fn overlaps(&self, start: Timestamp, end: Timestamp) -> bool {
        self.start < end && start < self.end
    }
}

/// Verdict for a candidate interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictOutcome {
    /// The interval fits within capacity.
    Clear,

    /// Admitting the interval would exceed capacity.
    Conflict {
        /// Bookings already occupying the contested interval.
        conflicting: SmallVec<[Uuid; 4]>,
    },
}

impl ConflictOutcome {
    /// Whether the candidate must be refused.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Bookings blocking the candidate, empty when clear.
    pub fn conflicting(&self) -> &[Uuid] {
        match self {
            Self::Clear => &[],
            Self::Conflict { conflicting } => conflicting,
        }
    }
}

/// Count overlaps and compare against capacity.
///
/// The candidate conflicts when at least `capacity` existing bookings
/// overlap it, so a capacity of zero refuses everything. `exclude` names a
/// booking whose own interval must not count against the candidate, which
/// lets a reschedule land on or around its current time.
pub fn check_capacity(
    start: Timestamp,
    end: Timestamp,
    booked: &[BookedInterval],
    capacity: u32,
    exclude: Option<Uuid>,
) -> ConflictOutcome {
    let conflicting: SmallVec<[Uuid; 4]> = booked
        .iter()
        .filter(|interval| exclude != Some(interval.uuid))
        .filter(|interval| interval.overlaps(start, end))
        .map(|interval| interval.uuid)
        .collect();

    let count = u32::try_from(conflicting.len()).unwrap_or(u32::MAX);

    if count >= capacity {
        ConflictOutcome::Conflict { conflicting }
    } else {
        ConflictOutcome::Clear
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn interval(start: &str, end: &str) -> Result<BookedInterval, jiff::Error> {
        Ok(BookedInterval {
            uuid: Uuid::now_v7(),
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    fn at(timestamp: &str) -> Result<Timestamp, jiff::Error> {
        timestamp.parse()
    }

    #[test]
    fn empty_book_is_clear() -> TestResult {
        let outcome = check_capacity(
            at("2026-08-31T09:00:00Z")?,
            at("2026-08-31T10:00:00Z")?,
            &[],
            1,
            None,
        );

        assert_eq!(outcome, ConflictOutcome::Clear);

        Ok(())
    }

    #[test]
    fn touching_boundaries_do_not_conflict() -> TestResult {
        let booked = interval("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;

        let outcome = check_capacity(
            at("2026-08-31T10:00:00Z")?,
            at("2026-08-31T11:00:00Z")?,
            &[booked],
            1,
            None,
        );

        assert_eq!(outcome, ConflictOutcome::Clear);

        Ok(())
    }

    #[test]
    fn one_overlap_fills_capacity_one() -> TestResult {
        let booked = interval("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;

        let outcome = check_capacity(
            at("2026-08-31T09:30:00Z")?,
            at("2026-08-31T10:30:00Z")?,
            &[booked],
            1,
            None,
        );

        assert!(outcome.is_conflict());
        assert_eq!(outcome.conflicting(), [booked.uuid]);

        Ok(())
    }

    #[test]
    fn capacity_two_admits_a_second_job_but_not_a_third() -> TestResult {
        let first = interval("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;
        let second = interval("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;

        let with_one_booked = check_capacity(
            at("2026-08-31T09:00:00Z")?,
            at("2026-08-31T10:00:00Z")?,
            &[first],
            2,
            None,
        );
        let with_two_booked = check_capacity(
            at("2026-08-31T09:00:00Z")?,
            at("2026-08-31T10:00:00Z")?,
            &[first, second],
            2,
            None,
        );

        assert_eq!(with_one_booked, ConflictOutcome::Clear);
        assert!(with_two_booked.is_conflict());
        assert_eq!(with_two_booked.conflicting().len(), 2);

        Ok(())
    }

    #[test]
    fn containment_and_partial_overlap_both_count() -> TestResult {
        let booked = interval("2026-08-31T09:00:00Z", "2026-08-31T12:00:00Z")?;

        for (start, end) in [
            ("2026-08-31T10:00:00Z", "2026-08-31T11:00:00Z"),
            ("2026-08-31T08:00:00Z", "2026-08-31T09:30:00Z"),
            ("2026-08-31T11:30:00Z", "2026-08-31T13:00:00Z"),
            ("2026-08-31T08:00:00Z", "2026-08-31T13:00:00Z"),
        ] {
            let outcome = check_capacity(at(start)?, at(end)?, &[booked], 1, None);

            assert!(outcome.is_conflict(), "expected conflict for {start}..{end}");
        }

        Ok(())
    }

    #[test]
    fn excluding_a_booking_lets_it_reschedule_over_itself() -> TestResult {
        let existing = interval("2026-08-31T09:00:00Z", "2026-08-31T10:00:00Z")?;

        let without_exclusion = check_capacity(
            at("2026-08-31T09:15:00Z")?,
            at("2026-08-31T10:15:00Z")?,
            &[existing],
            1,
            None,
        );
        let with_exclusion = check_capacity(
            at("2026-08-31T09:15:00Z")?,
            at("2026-08-31T10:15:00Z")?,
            &[existing],
            1,
            Some(existing.uuid),
        );

        assert!(without_exclusion.is_conflict());
        assert_eq!(with_exclusion, ConflictOutcome::Clear);

        Ok(())
    }

    #[test]
    fn zero_capacity_refuses_even_an_empty_day() -> TestResult {
        let outcome = check_capacity(
            at("2026-08-31T09:00:00Z")?,
            at("2026-08-31T10:00:00Z")?,
            &[],
            0,
            None,
        );

        assert!(outcome.is_conflict());
        assert!(outcome.conflicting().is_empty());

        Ok(())
    }
}
