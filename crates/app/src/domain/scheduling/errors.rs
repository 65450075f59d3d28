//! Scheduling service errors.

use lustre::schedule::{PatternError, ScheduleError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulingServiceError {
    #[error("work pattern already exists")]
    AlreadyExists,

    #[error("work pattern not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),

    #[error(transparent)]
    Time(#[from] ScheduleError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SchedulingServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
