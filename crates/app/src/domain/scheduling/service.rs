//! Scheduling service.

use async_trait::async_trait;
use jiff::{
    ToSpan,
    civil::{Date, Weekday},
    tz::TimeZone,
};
use lustre::schedule::{ScheduleError, Slot, SlotCalendar, WeekPlan, WorkPattern};
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        scheduling::{
            errors::SchedulingServiceError,
            records::{WorkPatternRecord, WorkPatternUuid},
            repository::PgSchedulingRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgSchedulingService {
    db: Db,
    repository: PgSchedulingRepository,
}

impl PgSchedulingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSchedulingRepository::new(),
        }
    }
}

fn resolve_timezone(name: &str) -> Result<TimeZone, SchedulingServiceError> {
    // TimeZone::get needs a tzdb; UTC must work without one.
    if name == "UTC" {
        return Ok(TimeZone::UTC);
    }

    TimeZone::get(name).map_err(|_err| SchedulingServiceError::UnknownTimezone(name.to_string()))
}

#[async_trait]
impl SchedulingService for PgSchedulingService {
    async fn set_work_pattern(
        &self,
        tenant: TenantUuid,
        pattern: WorkPattern,
    ) -> Result<WorkPatternRecord, SchedulingServiceError> {
        pattern.validate()?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let stored = self
            .repository
            .upsert_work_pattern(&mut tx, WorkPatternUuid::new(), &pattern)
            .await?;

        tx.commit().await?;

        Ok(stored)
    }

    async fn remove_work_pattern(
        &self,
        tenant: TenantUuid,
        weekday: Weekday,
    ) -> Result<Option<WorkPatternRecord>, SchedulingServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let removed = self.repository.delete_work_pattern(&mut tx, weekday).await?;

        tx.commit().await?;

        Ok(removed)
    }

    async fn week_plan(&self, tenant: TenantUuid) -> Result<WeekPlan, SchedulingServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let patterns = self.repository.list_work_patterns(&mut tx).await?;

        tx.commit().await?;

        Ok(WeekPlan::from_patterns(
            patterns.into_iter().map(|record| record.pattern),
        )?)
    }

    async fn available_slots(
        &self,
        tenant: TenantUuid,
        from: Date,
        lookahead_days: u16,
    ) -> Result<Vec<Slot>, SchedulingServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let timezone = self.repository.tenant_timezone(&mut tx).await?;
        let patterns = self.repository.list_work_patterns(&mut tx).await?;

        let tz = resolve_timezone(&timezone)?;
        let plan = WeekPlan::from_patterns(patterns.into_iter().map(|record| record.pattern))?;
        let calendar = SlotCalendar::new(plan, tz);

        // Fetch bookings for the whole window once; the calendar derates
        // each slot against them in memory.
        let window_start = from
            .to_zoned(calendar.timezone().clone())
            .map_err(ScheduleError::from)?
            .timestamp();

        let window_end = from
            .checked_add(i64::from(lookahead_days).days())
            .map_err(ScheduleError::from)?
            .to_zoned(calendar.timezone().clone())
            .map_err(ScheduleError::from)?
            .timestamp();

        let booked = self
            .repository
            .booked_intervals(&mut tx, window_start, window_end)
            .await?;

        tx.commit().await?;

        Ok(calendar.open_slots(from, lookahead_days, &booked)?)
    }
}

#[automock]
#[async_trait]
/// Weekly work patterns and the availability built from them.
pub trait SchedulingService: Send + Sync {
    /// Validates and stores a weekday's working window, replacing any
    /// previous pattern for that weekday.
    async fn set_work_pattern(
        &self,
        tenant: TenantUuid,
        pattern: WorkPattern,
    ) -> Result<WorkPatternRecord, SchedulingServiceError>;

    /// Removes a weekday's pattern, closing the day. Returns the removed
    /// pattern, or `None` when the day had none.
    async fn remove_work_pattern(
        &self,
        tenant: TenantUuid,
        weekday: Weekday,
    ) -> Result<Option<WorkPatternRecord>, SchedulingServiceError>;

    /// The tenant's configured week.
    async fn week_plan(&self, tenant: TenantUuid) -> Result<WeekPlan, SchedulingServiceError>;

    /// Bookable slots with capacity left in `[from, from + lookahead_days)`,
    /// computed fresh against current bookings.
    async fn available_slots(
        &self,
        tenant: TenantUuid,
        from: Date,
        lookahead_days: u16,
    ) -> Result<Vec<Slot>, SchedulingServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use lustre::schedule::PatternError;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn business_hours(weekday: Weekday) -> WorkPattern {
        WorkPattern {
            weekday,
            start: time(9, 0, 0, 0),
            end: time(17, 0, 0, 0),
            slot_minutes: 60,
            capacity: 2,
        }
    }

    // 2026-08-31 is a Monday.
    const MONDAY: Date = date(2026, 8, 31);

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn set_then_plan_round_trips() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.scheduling
            .set_work_pattern(ctx.tenant_uuid, business_hours(Weekday::Monday))
            .await?;

        let plan = ctx.scheduling.week_plan(ctx.tenant_uuid).await?;

        assert_eq!(plan.capacity(Weekday::Monday), 2);
        assert_eq!(plan.capacity(Weekday::Tuesday), 0);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn reconfiguring_a_weekday_keeps_the_row_identity() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx
            .scheduling
            .set_work_pattern(ctx.tenant_uuid, business_hours(Weekday::Monday))
            .await?;

        let mut narrower = business_hours(Weekday::Monday);
        narrower.end = time(13, 0, 0, 0);

        let second = ctx
            .scheduling
            .set_work_pattern(ctx.tenant_uuid, narrower)
            .await?;

        assert_eq!(second.uuid, first.uuid);
        assert_eq!(second.pattern.end, time(13, 0, 0, 0));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn invalid_pattern_is_rejected_before_storage() {
        let ctx = TestContext::new().await;

        let mut backwards = business_hours(Weekday::Monday);
        backwards.start = time(17, 0, 0, 0);
        backwards.end = time(9, 0, 0, 0);

        let result = ctx
            .scheduling
            .set_work_pattern(ctx.tenant_uuid, backwards)
            .await;

        assert!(
            matches!(
                result,
                Err(SchedulingServiceError::InvalidPattern(
                    PatternError::StartNotBeforeEnd
                ))
            ),
            "expected StartNotBeforeEnd, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn availability_reflects_the_work_pattern() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.scheduling
            .set_work_pattern(ctx.tenant_uuid, business_hours(Weekday::Monday))
            .await?;

        let slots = ctx
            .scheduling
            .available_slots(ctx.tenant_uuid, MONDAY, 7)
            .await?;

        assert_eq!(slots.len(), 8);
        assert!(slots.iter().all(|slot| slot.remaining_capacity == 2));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn removing_a_pattern_closes_the_day() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.scheduling
            .set_work_pattern(ctx.tenant_uuid, business_hours(Weekday::Monday))
            .await?;

        let removed = ctx
            .scheduling
            .remove_work_pattern(ctx.tenant_uuid, Weekday::Monday)
            .await?;

        assert!(removed.is_some());

        let slots = ctx
            .scheduling
            .available_slots(ctx.tenant_uuid, MONDAY, 7)
            .await?;

        assert!(slots.is_empty());

        let removed_again = ctx
            .scheduling
            .remove_work_pattern(ctx.tenant_uuid, Weekday::Monday)
            .await?;

        assert!(removed_again.is_none());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn unconfigured_tenants_have_no_availability() -> TestResult {
        let ctx = TestContext::new().await;

        let slots = ctx
            .scheduling
            .available_slots(ctx.tenant_uuid, MONDAY, 30)
            .await?;

        assert!(slots.is_empty());

        Ok(())
    }
}
