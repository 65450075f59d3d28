//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use lustre::pricing::PricingConfig;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar, types::Json,
};
use uuid::Uuid;

use crate::domain::catalog::{
    data::{NewAddon, NewService},
    records::{AddonRecord, AddonUuid, ServiceRecord, ServiceUuid},
};

const CREATE_SERVICE_SQL: &str = include_str!("sql/create_service.sql");
const GET_SERVICE_SQL: &str = include_str!("sql/get_service.sql");
const LIST_SERVICES_SQL: &str = include_str!("sql/list_services.sql");
const CREATE_ADDON_SQL: &str = include_str!("sql/create_addon.sql");
const LIST_ADDONS_SQL: &str = include_str!("sql/list_addons.sql");
const GET_ADDONS_SQL: &str = include_str!("sql/get_addons.sql");
const UPSERT_PRICING_CONFIG_SQL: &str = include_str!("sql/upsert_pricing_config.sql");
const GET_PRICING_CONFIG_SQL: &str = include_str!("sql/get_pricing_config.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_service(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        service: NewService,
    ) -> Result<ServiceRecord, sqlx::Error> {
        query_as::<Postgres, ServiceRecord>(CREATE_SERVICE_SQL)
            .bind(service.uuid.into_uuid())
            .bind(service.name)
            .bind(service.base_price)
            .bind(service.duration_minutes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_service(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        service: ServiceUuid,
    ) -> Result<ServiceRecord, sqlx::Error> {
        query_as::<Postgres, ServiceRecord>(GET_SERVICE_SQL)
            .bind(service.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_services(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ServiceRecord>, sqlx::Error> {
        query_as::<Postgres, ServiceRecord>(LIST_SERVICES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_addon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        addon: NewAddon,
    ) -> Result<AddonRecord, sqlx::Error> {
        query_as::<Postgres, AddonRecord>(CREATE_ADDON_SQL)
            .bind(addon.uuid.into_uuid())
            .bind(addon.name)
            .bind(addon.price_delta)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_addons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<AddonRecord>, sqlx::Error> {
        query_as::<Postgres, AddonRecord>(LIST_ADDONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch the add-ons among `addons` that exist; unknown UUIDs are
    /// simply absent from the result.
    pub(crate) async fn get_addons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        addons: &[AddonUuid],
    ) -> Result<Vec<AddonRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = addons.iter().map(|addon| addon.into_uuid()).collect();

        query_as::<Postgres, AddonRecord>(GET_ADDONS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_pricing_config(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        config: &PricingConfig,
    ) -> Result<PricingConfig, sqlx::Error> {
        let stored: Json<PricingConfig> = query_scalar(UPSERT_PRICING_CONFIG_SQL)
            .bind(Json(config))
            .fetch_one(&mut **tx)
            .await?;

        Ok(stored.0)
    }

    pub(crate) async fn pricing_config(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<PricingConfig>, sqlx::Error> {
        let stored: Option<Json<PricingConfig>> = query_scalar(GET_PRICING_CONFIG_SQL)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(stored.map(|config| config.0))
    }
}

impl<'r> FromRow<'r, PgRow> for ServiceRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ServiceUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            base_price: row.try_get("base_price")?,
            duration_minutes: row.try_get("duration_minutes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddonRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddonUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price_delta: row.try_get("price_delta")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
