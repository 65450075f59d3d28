//! Catalog service.

use async_trait::async_trait;
use lustre::pricing::PricingConfig;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        catalog::{
            data::{NewAddon, NewService},
            errors::CatalogServiceError,
            records::{AddonRecord, AddonUuid, ServiceRecord, ServiceUuid},
            repository::PgCatalogRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_service(
        &self,
        tenant: TenantUuid,
        service: NewService,
    ) -> Result<ServiceRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_service(&mut tx, service).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_service(
        &self,
        tenant: TenantUuid,
        service: ServiceUuid,
    ) -> Result<ServiceRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_service(&mut tx, service).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_services(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<ServiceRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self.repository.list_services(&mut tx).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn create_addon(
        &self,
        tenant: TenantUuid,
        addon: NewAddon,
    ) -> Result<AddonRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_addon(&mut tx, addon).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_addons(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<AddonRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self.repository.list_addons(&mut tx).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn get_addons(
        &self,
        tenant: TenantUuid,
        addons: Vec<AddonUuid>,
    ) -> Result<Vec<AddonRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self.repository.get_addons(&mut tx, &addons).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn set_pricing_config(
        &self,
        tenant: TenantUuid,
        config: PricingConfig,
    ) -> Result<PricingConfig, CatalogServiceError> {
        config.validate()?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let stored = self.repository.upsert_pricing_config(&mut tx, &config).await?;

        tx.commit().await?;

        Ok(stored)
    }

    async fn pricing_config(&self, tenant: TenantUuid) -> Result<PricingConfig, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let stored = self.repository.pricing_config(&mut tx).await?;

        tx.commit().await?;

        Ok(stored.unwrap_or_default())
    }
}

#[automock]
#[async_trait]
/// Services, add-ons and the tenant pricing configuration.
pub trait CatalogService: Send + Sync {
    /// Creates a detailing service.
    async fn create_service(
        &self,
        tenant: TenantUuid,
        service: NewService,
    ) -> Result<ServiceRecord, CatalogServiceError>;

    /// Fetch a service by UUID.
    async fn get_service(
        &self,
        tenant: TenantUuid,
        service: ServiceUuid,
    ) -> Result<ServiceRecord, CatalogServiceError>;

    /// All live services, ordered by name.
    async fn list_services(&self, tenant: TenantUuid)
    -> Result<Vec<ServiceRecord>, CatalogServiceError>;

    /// Creates an add-on.
    async fn create_addon(
        &self,
        tenant: TenantUuid,
        addon: NewAddon,
    ) -> Result<AddonRecord, CatalogServiceError>;

    /// All live add-ons, ordered by name.
    async fn list_addons(&self, tenant: TenantUuid)
    -> Result<Vec<AddonRecord>, CatalogServiceError>;

    /// The add-ons among `addons` that exist. Unknown UUIDs are skipped
    /// rather than treated as an error, so a stale add-on in a request
    /// quietly contributes nothing.
    async fn get_addons(
        &self,
        tenant: TenantUuid,
        addons: Vec<AddonUuid>,
    ) -> Result<Vec<AddonRecord>, CatalogServiceError>;

    /// Validates and stores the tenant's pricing configuration, replacing
    /// any previous one.
    async fn set_pricing_config(
        &self,
        tenant: TenantUuid,
        config: PricingConfig,
    ) -> Result<PricingConfig, CatalogServiceError>;

    /// The tenant's pricing configuration, or the permissive defaults when
    /// none has been stored yet.
    async fn pricing_config(&self, tenant: TenantUuid) -> Result<PricingConfig, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use lustre::pricing::{DistancePolicy, PricingRule};
    use rust_decimal::Decimal;
    use rustc_hash::FxHashMap;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn sample_config() -> PricingConfig {
        PricingConfig {
            base_price: 50.0,
            vehicle_multipliers: FxHashMap::from_iter([
                ("sedan".to_string(), 1.0),
                ("suv".to_string(), 1.5),
            ]),
            tax_rate: 0.2,
            distance: DistancePolicy::new(5.0, 2.0),
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn service_and_addon_round_trip() -> TestResult {
        let ctx = TestContext::new().await;

        let service = ctx
            .catalog
            .create_service(
                ctx.tenant_uuid,
                NewService {
                    uuid: ServiceUuid::new(),
                    name: "Full Valet".to_string(),
                    base_price: Decimal::new(12000, 2),
                    duration_minutes: 120,
                },
            )
            .await?;

        let fetched = ctx.catalog.get_service(ctx.tenant_uuid, service.uuid).await?;

        assert_eq!(fetched.name, "Full Valet");
        assert_eq!(fetched.base_price, Decimal::new(12000, 2));
        assert_eq!(fetched.duration_minutes, 120);

        let addon = ctx
            .catalog
            .create_addon(
                ctx.tenant_uuid,
                NewAddon {
                    uuid: AddonUuid::new(),
                    name: "Wax".to_string(),
                    price_delta: Decimal::new(1500, 2),
                },
            )
            .await?;

        let addons = ctx.catalog.list_addons(ctx.tenant_uuid).await?;

        assert_eq!(addons.len(), 1);
        assert_eq!(addons[0].uuid, addon.uuid);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn get_addons_skips_unknown_uuids() -> TestResult {
        let ctx = TestContext::new().await;

        let known = ctx
            .catalog
            .create_addon(
                ctx.tenant_uuid,
                NewAddon {
                    uuid: AddonUuid::new(),
                    name: "Interior Shampoo".to_string(),
                    price_delta: Decimal::new(2500, 2),
                },
            )
            .await?;

        let addons = ctx
            .catalog
            .get_addons(ctx.tenant_uuid, vec![known.uuid, AddonUuid::new()])
            .await?;

        assert_eq!(addons.len(), 1);
        assert_eq!(addons[0].uuid, known.uuid);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn invalid_config_is_rejected_with_every_violation() {
        let ctx = TestContext::new().await;

        let config = PricingConfig {
            base_price: -10.0,
            tax_rate: 1.5,
            ..PricingConfig::default()
        };

        let result = ctx.catalog.set_pricing_config(ctx.tenant_uuid, config).await;

        let Err(CatalogServiceError::InvalidConfig(rejection)) = result else {
            panic!("expected InvalidConfig, got {result:?}");
        };

        assert_eq!(
            rejection.violations.as_slice(),
            [
                PricingRule::NonNegativeBasePrice(-10.0),
                PricingRule::TaxRateWithinBounds(1.5),
            ]
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn missing_config_falls_back_to_defaults() -> TestResult {
        let ctx = TestContext::new().await;

        let config = ctx.catalog.pricing_config(ctx.tenant_uuid).await?;

        assert_eq!(config, PricingConfig::default());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn upsert_overwrites_the_previous_config() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.catalog
            .set_pricing_config(ctx.tenant_uuid, sample_config())
            .await?;

        let replacement = PricingConfig {
            tax_rate: 0.05,
            ..sample_config()
        };

        ctx.catalog
            .set_pricing_config(ctx.tenant_uuid, replacement.clone())
            .await?;

        let stored = ctx.catalog.pricing_config(ctx.tenant_uuid).await?;

        assert_eq!(stored, replacement);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn services_are_isolated_per_tenant() -> TestResult {
        let ctx = TestContext::new().await;

        let service = ctx
            .catalog
            .create_service(
                ctx.tenant_uuid,
                NewService {
                    uuid: ServiceUuid::new(),
                    name: "Mini Valet".to_string(),
                    base_price: Decimal::new(4500, 2),
                    duration_minutes: 45,
                },
            )
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx.catalog.get_service(tenant_b, service.uuid).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound for cross-tenant access, got {result:?}"
        );

        assert!(ctx.catalog.list_services(tenant_b).await?.is_empty());

        Ok(())
    }
}
