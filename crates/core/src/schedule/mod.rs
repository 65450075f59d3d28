//! Working patterns, slot generation and conflict checking.

pub mod conflict;
pub mod pattern;
pub mod slots;

pub use conflict::{BookedInterval, ConflictOutcome, check_capacity};
pub use pattern::{PatternError, WeekPlan, WorkPattern};
pub use slots::{ScheduleError, Slot, SlotCalendar};
