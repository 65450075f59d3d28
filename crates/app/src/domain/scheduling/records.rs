//! Scheduling Records

use jiff::Timestamp;
use lustre::schedule::WorkPattern;

use crate::uuids::TypedUuid;

/// Work Pattern UUID
pub type WorkPatternUuid = TypedUuid<WorkPatternRecord>;

/// Work Pattern Record
///
/// One stored weekday template. The row identity is stable across upserts:
/// replacing Monday's hours updates the existing Monday row.
#[derive(Debug, Clone)]
pub struct WorkPatternRecord {
    pub uuid: WorkPatternUuid,

    /// The validated weekday window this row stores.
    pub pattern: WorkPattern,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
