//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        accounts::{AccountsService, PgAccountsService},
        bookings::{BookingsService, PgBookingsService},
        catalog::{CatalogService, PgCatalogService},
        scheduling::{PgSchedulingService, SchedulingService},
        tenants::{PgTenantsService, TenantsService},
    },
    notify::{NotificationDispatcher, NullDispatcher, WebhookDispatcher},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// The wired service graph every call site shares.
///
/// Admin tooling, seeding and manual booking all go through these handles,
/// so there is exactly one implementation of each operation in play.
#[derive(Clone)]
pub struct AppContext {
    pub tenants: Arc<dyn TenantsService>,
    pub accounts: Arc<dyn AccountsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub scheduling: Arc<dyn SchedulingService>,
    pub bookings: Arc<dyn BookingsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// Booking notifications POST to `webhook_url` when one is configured
    /// and are dropped with a debug log line otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        webhook_url: Option<String>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let notifier: Arc<dyn NotificationDispatcher> = match webhook_url {
            Some(url) => Arc::new(WebhookDispatcher::new(url)),
            None => Arc::new(NullDispatcher),
        };

        let tenants: Arc<dyn TenantsService> = Arc::new(PgTenantsService::new(db.clone()));
        let accounts: Arc<dyn AccountsService> = Arc::new(PgAccountsService::new(db.clone()));

        let bookings = Arc::new(PgBookingsService::new(
            db.clone(),
            accounts.clone(),
            tenants.clone(),
            notifier,
        ));

        Ok(Self {
            tenants,
            accounts,
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            scheduling: Arc::new(PgSchedulingService::new(db)),
            bookings,
        })
    }
}
