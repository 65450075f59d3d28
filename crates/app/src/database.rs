//! Database connection management and tenant-scoped transactions.

use sqlx::{PgPool, Postgres, Transaction, query, query_scalar};

use crate::domain::tenants::records::TenantUuid;

/// SQL used to set tenant context for row-level security.
///
/// The third argument makes the setting transaction-local, so the context
/// never leaks into a pooled connection's next checkout.
pub const SET_TENANT_CONTEXT_SQL: &str = "SELECT set_config('app.current_tenant_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction with the tenant context set for RLS policies.
    ///
    /// Every tenant-scoped query in the crate runs inside one of these;
    /// the policies on each table reduce it to the tenant's own rows.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting tenant
    /// context fails.
    pub async fn begin_tenant_transaction(
        &self,
        tenant: TenantUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_TENANT_CONTEXT_SQL)
            .bind(tenant.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Returns the underlying pool for queries that run before a tenant is
    /// known, such as actor resolution and tenant creation.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Warn when the connected role bypasses row-level security.
///
/// Superusers and roles with `BYPASSRLS` skip policies even on tables with
/// `FORCE ROW LEVEL SECURITY`, which silently disables tenant isolation.
///
/// # Errors
///
/// Returns an error when the role lookup fails.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), sqlx::Error> {
    let bypasses: bool = query_scalar(
        "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user",
    )
    .fetch_one(pool)
    .await?;

    if bypasses {
        tracing::warn!("connected role bypasses row-level security; tenant isolation is off");
    }

    Ok(())
}
