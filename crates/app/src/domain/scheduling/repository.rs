//! Scheduling Repository

use jiff::{Timestamp, civil::Weekday};
use jiff_sqlx::{Time as SqlxTime, Timestamp as SqlxTimestamp};
use lustre::{
    booking::BookingStatus,
    schedule::{BookedInterval, WorkPattern},
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::scheduling::records::{WorkPatternRecord, WorkPatternUuid};

const UPSERT_WORK_PATTERN_SQL: &str = include_str!("sql/upsert_work_pattern.sql");
const LIST_WORK_PATTERNS_SQL: &str = include_str!("sql/list_work_patterns.sql");
const DELETE_WORK_PATTERN_SQL: &str = include_str!("sql/delete_work_pattern.sql");
const TENANT_TIMEZONE_SQL: &str = include_str!("sql/tenant_timezone.sql");
const BOOKED_INTERVALS_SQL: &str = include_str!("sql/booked_intervals.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSchedulingRepository;

impl PgSchedulingRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert or replace the pattern for its weekday. The conflict target
    /// is `(tenant_uuid, weekday)`, so the stored row keeps its original
    /// UUID when a weekday is reconfigured.
    pub(crate) async fn upsert_work_pattern(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: WorkPatternUuid,
        pattern: &WorkPattern,
    ) -> Result<WorkPatternRecord, sqlx::Error> {
        query_as::<Postgres, WorkPatternRecord>(UPSERT_WORK_PATTERN_SQL)
            .bind(uuid.into_uuid())
            .bind(i16::from(pattern.day_index()))
            .bind(SqlxTime::from(pattern.start))
            .bind(SqlxTime::from(pattern.end))
            .bind(pattern.slot_minutes)
            .bind(i32::try_from(pattern.capacity).unwrap_or(i32::MAX))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_work_patterns(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<WorkPatternRecord>, sqlx::Error> {
        query_as::<Postgres, WorkPatternRecord>(LIST_WORK_PATTERNS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_work_pattern(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        weekday: Weekday,
    ) -> Result<Option<WorkPatternRecord>, sqlx::Error> {
        query_as::<Postgres, WorkPatternRecord>(DELETE_WORK_PATTERN_SQL)
            .bind(i16::from(weekday.to_sunday_zero_offset().unsigned_abs()))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn tenant_timezone(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, sqlx::Error> {
        query_scalar(TENANT_TIMEZONE_SQL).fetch_one(&mut **tx).await
    }

    /// Capacity-consuming bookings overlapping `[start, end)`.
    pub(crate) async fn booked_intervals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<BookedInterval>, sqlx::Error> {
        let blocking: Vec<String> = BookingStatus::BLOCKING
            .iter()
            .map(|status| status.as_str().to_string())
            .collect();

        let rows = query(BOOKED_INTERVALS_SQL)
            .bind(SqlxTimestamp::from(start))
            .bind(SqlxTimestamp::from(end))
            .bind(&blocking)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(booked_interval_from_row).collect()
    }
}

fn booked_interval_from_row(row: &PgRow) -> sqlx::Result<BookedInterval> {
    Ok(BookedInterval {
        uuid: row.try_get("uuid")?,
        start: row.try_get::<SqlxTimestamp, _>("start_at")?.to_jiff(),
        end: row.try_get::<SqlxTimestamp, _>("end_at")?.to_jiff(),
    })
}

impl<'r> FromRow<'r, PgRow> for WorkPatternRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let weekday: i16 = row.try_get("weekday")?;
        let weekday = i8::try_from(weekday)
            .ok()
            .and_then(|offset| Weekday::from_sunday_zero_offset(offset).ok())
            .ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "weekday".to_string(),
                source: format!("weekday {weekday} is outside 0..=6").into(),
            })?;

        let capacity: i32 = row.try_get("capacity")?;
        let capacity = u32::try_from(capacity).map_err(|err| sqlx::Error::ColumnDecode {
            index: "capacity".to_string(),
            source: Box::new(err),
        })?;

        Ok(Self {
            uuid: WorkPatternUuid::from_uuid(row.try_get("uuid")?),
            pattern: WorkPattern {
                weekday,
                start: row.try_get::<SqlxTime, _>("start_time")?.to_jiff(),
                end: row.try_get::<SqlxTime, _>("end_time")?.to_jiff(),
                slot_minutes: row.try_get("slot_minutes")?,
                capacity,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
