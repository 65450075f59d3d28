//! Tenants service.

use async_trait::async_trait;
use jiff::tz::TimeZone;
use mockall::automock;

use crate::{
    database::Db,
    domain::tenants::{
        data::NewTenant,
        errors::TenantsServiceError,
        records::{TenantRecord, TenantUuid},
        repository::PgTenantsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    db: Db,
    repository: PgTenantsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTenantsRepository::new(),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError> {
        // Reject timezones the scheduler could never resolve later.
        if tenant.timezone != "UTC" && TimeZone::get(&tenant.timezone).is_err() {
            return Err(TenantsServiceError::UnknownTimezone(tenant.timezone));
        }

        self.repository
            .create_tenant(self.db.pool(), tenant)
            .await
            .map_err(Into::into)
    }

    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_tenant(&mut tx).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
/// Tenant persistence operations.
pub trait TenantsService: Send + Sync {
    /// Creates a new tenant.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError>;

    /// Fetch a tenant by UUID; soft-deleted tenants are not found.
    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_tenant(name: &str) -> NewTenant {
        NewTenant {
            uuid: TenantUuid::new(),
            name: name.to_string(),
            plan: "starter".to_string(),
            timezone: "UTC".to_string(),
            monthly_booking_limit: Some(25),
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn create_then_get_round_trips() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgTenantsService::new(ctx.db.clone());

        let data = new_tenant("Suds Lab");
        let uuid = data.uuid;

        let created = svc.create_tenant(data).await?;

        assert_eq!(created.uuid, uuid);
        assert_eq!(created.name, "Suds Lab");
        assert_eq!(created.monthly_booking_limit, Some(25));
        assert!(created.deleted_at.is_none());

        let fetched = svc.get_tenant(uuid).await?;

        assert_eq!(fetched.uuid, uuid);
        assert_eq!(fetched.timezone, "UTC");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgTenantsService::new(ctx.db.clone());

        let data = new_tenant("First");
        let mut duplicate = new_tenant("Second");
        duplicate.uuid = data.uuid;

        svc.create_tenant(data).await?;

        let result = svc.create_tenant(duplicate).await;

        assert!(
            matches!(result, Err(TenantsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn unknown_timezone_is_rejected_before_insert() {
        let ctx = TestContext::new().await;
        let svc = PgTenantsService::new(ctx.db.clone());

        let mut data = new_tenant("Nowhere Detailing");
        data.timezone = "Mars/Olympus_Mons".to_string();

        let result = svc.create_tenant(data).await;

        assert!(
            matches!(result, Err(TenantsServiceError::UnknownTimezone(_))),
            "expected UnknownTimezone, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn get_unknown_tenant_returns_not_found() {
        let ctx = TestContext::new().await;
        let svc = PgTenantsService::new(ctx.db.clone());

        let result = svc.get_tenant(TenantUuid::new()).await;

        assert!(
            matches!(result, Err(TenantsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn negative_monthly_limit_is_invalid_data() {
        let ctx = TestContext::new().await;
        let svc = PgTenantsService::new(ctx.db.clone());

        let mut data = new_tenant("Negative Limit");
        data.monthly_booking_limit = Some(-1);

        let result = svc.create_tenant(data).await;

        assert!(
            matches!(result, Err(TenantsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}
