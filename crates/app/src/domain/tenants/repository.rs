//! Tenants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::tenants::{
    data::NewTenant,
    records::{TenantRecord, TenantUuid},
};

const CREATE_TENANT_SQL: &str = include_str!("sql/create_tenant.sql");
const GET_TENANT_SQL: &str = include_str!("sql/get_tenant.sql");

/// PostgreSQL-backed tenants repository.
///
/// Provisioning inserts run on the plain pool before any tenant context
/// exists; reads run inside a tenant transaction, where the self policy
/// exposes exactly one row.
#[derive(Debug, Clone, Default)]
pub(crate) struct PgTenantsRepository;

impl PgTenantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_tenant(
        &self,
        pool: &PgPool,
        tenant: NewTenant,
    ) -> Result<TenantRecord, sqlx::Error> {
        query_as::<Postgres, TenantRecord>(CREATE_TENANT_SQL)
            .bind(tenant.uuid.into_uuid())
            .bind(tenant.name)
            .bind(tenant.plan)
            .bind(tenant.timezone)
            .bind(tenant.monthly_booking_limit)
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn get_tenant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<TenantRecord, sqlx::Error> {
        query_as::<Postgres, TenantRecord>(GET_TENANT_SQL)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TenantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TenantUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            plan: row.try_get("plan")?,
            timezone: row.try_get("timezone")?,
            monthly_booking_limit: row.try_get("monthly_booking_limit")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
