//! Bookings service.
//!
//! The intake orchestrator. A booking request passes through, in order:
//! shape validation, actor resolution, the monthly quota, per-day advisory
//! locks, the capacity-aware conflict guard, and pricing from the stored
//! catalogue. Everything from the quota count to the insert runs inside a
//! single tenant transaction, so a refusal at any step leaves no trace.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use lustre::{
    pricing::{
        PriceBreakdown, PricingConfig, PricingInputs, compute_price_breakdown,
        validate_pricing_inputs, vehicle_multiplier,
    },
    quota::QuotaDecision,
    schedule::{ConflictOutcome, check_capacity},
};
use mockall::automock;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use smallvec::smallvec;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        accounts::{data::ActorRef, service::AccountsService},
        bookings::{
            data::{BookingRequest, QuoteRequest},
            errors::{BookingRule, BookingsServiceError},
            records::{BookingRecord, BookingUuid},
            repository::PgBookingsRepository,
        },
        tenants::{records::TenantUuid, service::TenantsService},
    },
    notify::NotificationDispatcher,
};

/// Bounds of the calendar month containing `at`, in the tenant's timezone.
///
/// Quota counting uses the civil month the tenant sees on their invoice,
/// not a rolling thirty days.
fn month_window(timezone: &TimeZone, at: Timestamp) -> Result<(Timestamp, Timestamp), jiff::Error> {
    let first = at.to_zoned(timezone.clone()).date().first_of_month();
    let next = first.checked_add(1.month())?;

    Ok((
        first.to_zoned(timezone.clone())?.timestamp(),
        next.to_zoned(timezone.clone())?.timestamp(),
    ))
}

/// Calendar days a window touches in the tenant's timezone, ascending.
///
/// A window ending exactly at midnight locks the following day too, which
/// costs one extra no-contention lock and nothing else.
fn lock_days(timezone: &TimeZone, start: Timestamp, end: Timestamp) -> Vec<Date> {
    let first = start.to_zoned(timezone.clone()).date();
    let last = end.to_zoned(timezone.clone()).date();

    first
        .series(1.day())
        .take_while(|day| *day <= last)
        .collect()
}

/// Assemble pricing inputs from catalogue rows.
///
/// The conversions to `f64` feed the same coercion layer quotes use, so a
/// booking and a quote over identical ingredients price identically.
fn booking_inputs(
    config: &PricingConfig,
    base_price: Decimal,
    tier: &str,
    addon_deltas: &[Decimal],
    distance: Option<f64>,
) -> PricingInputs {
    let addons: Decimal = addon_deltas.iter().copied().sum();

    PricingInputs {
        base_price: base_price.to_f64(),
        vehicle_multiplier: Some(vehicle_multiplier(tier, &config.vehicle_multipliers)),
        addons_total: addons.to_f64(),
        distance_surcharge: distance
            .and_then(|distance| config.distance.surcharge(distance).to_f64()),
        tax_rate: Some(config.tax_rate),
    }
}

/// Reads that resolve a request's referenced records report a missing row
/// as a bad reference, not as a missing booking.
fn related_resource(error: sqlx::Error) -> BookingsServiceError {
    if matches!(error, sqlx::Error::RowNotFound) {
        return BookingsServiceError::InvalidReference;
    }

    error.into()
}

#[derive(Clone)]
pub struct PgBookingsService {
    db: Db,
    repository: PgBookingsRepository,
    accounts: Arc<dyn AccountsService>,
    tenants: Arc<dyn TenantsService>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl PgBookingsService {
    #[must_use]
    pub fn new(
        db: Db,
        accounts: Arc<dyn AccountsService>,
        tenants: Arc<dyn TenantsService>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            db,
            repository: PgBookingsRepository::new(),
            accounts,
            tenants,
            notifier,
        }
    }

    /// Hand a committed booking to the dispatcher on a detached task.
    fn dispatch_created(&self, booking: BookingRecord) {
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            notifier.booking_created(booking).await;
        });
    }
}

#[async_trait]
impl BookingsService for PgBookingsService {
    #[tracing::instrument(
        name = "bookings.service.create_booking",
        skip(self, request),
        fields(
            reference = %request.reference,
            tenant_uuid = tracing::field::Empty,
            actor_kind = tracing::field::Empty,
            booking_uuid = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn create_booking(
        &self,
        actor: ActorRef,
        request: BookingRequest,
    ) -> Result<BookingRecord, BookingsServiceError> {
        request.validate().map_err(BookingsServiceError::Validation)?;

        let resolved = self
            .accounts
            .resolve_actor(actor)
            .await
            .map_err(BookingsServiceError::TenantResolution)?;

        let span = Span::current();

        span.record("tenant_uuid", tracing::field::display(resolved.tenant));
        span.record("actor_kind", tracing::field::display(resolved.kind));

        let tenant = self.tenants.get_tenant(resolved.tenant).await?;
        let timezone = tenant.time_zone()?;

        // An early return anywhere below rolls the whole intake back.
        let mut tx = self.db.begin_tenant_transaction(resolved.tenant).await?;

        let (month_start, month_end) =
            month_window(&timezone, Timestamp::now()).map_err(BookingsServiceError::Time)?;

        let current = self
            .repository
            .count_created_between(&mut tx, month_start, month_end)
            .await?;

        if let QuotaDecision::Exhausted { limit, current } =
            tenant.quota_policy().evaluate(resolved.kind, current)
        {
            return Err(BookingsServiceError::QuotaExceeded { limit, current });
        }

        // Ascending, so concurrent multi-day writers acquire in the same
        // sequence and cannot deadlock.
        for day in lock_days(&timezone, request.start_at, request.end_at) {
            self.repository.lock_day(&mut tx, resolved.tenant, day).await?;
        }

        let weekday = request.start_at.to_zoned(timezone.clone()).date().weekday();
        let capacity = self.repository.day_capacity(&mut tx, weekday).await?;

        let booked = self
            .repository
            .find_overlapping(&mut tx, request.start_at, request.end_at, None)
            .await?;

        if let ConflictOutcome::Conflict { conflicting } =
            check_capacity(request.start_at, request.end_at, &booked, capacity, None)
        {
            return Err(BookingsServiceError::SchedulingConflict { conflicting });
        }

        // Price strictly from stored rows; the request never carries money.
        let base_price = self
            .repository
            .service_base_price(&mut tx, request.service_uuid)
            .await
            .map_err(related_resource)?;

        let tier = self
            .repository
            .vehicle_tier(&mut tx, request.vehicle_uuid)
            .await
            .map_err(related_resource)?;

        let deltas = self
            .repository
            .addon_price_deltas(&mut tx, &request.addon_uuids)
            .await?;

        let config = self
            .repository
            .pricing_config(&mut tx)
            .await?
            .unwrap_or_default();

        let distance = match request.distance_miles {
            Some(distance) => Some(distance),
            None => {
                self.repository
                    .address_distance(&mut tx, request.address_uuid)
                    .await
                    .map_err(related_resource)?
            }
        };

        let breakdown =
            compute_price_breakdown(booking_inputs(&config, base_price, &tier, &deltas, distance));

        let record = self
            .repository
            .insert_booking(&mut tx, &request, &breakdown)
            .await?;

        tx.commit().await?;

        span.record("booking_uuid", tracing::field::display(record.uuid));
        span.record("total", tracing::field::display(record.breakdown.total));

        info!(booking_uuid = %record.uuid, "created booking");

        self.dispatch_created(record.clone());

        Ok(record)
    }

    #[tracing::instrument(
        name = "bookings.service.reschedule_booking",
        skip(self),
        fields(booking_uuid = %booking, tenant_uuid = tracing::field::Empty),
        err
    )]
    async fn reschedule_booking(
        &self,
        actor: ActorRef,
        booking: BookingUuid,
        start_at: Timestamp,
        end_at: Timestamp,
    ) -> Result<BookingRecord, BookingsServiceError> {
        if start_at >= end_at {
            return Err(BookingsServiceError::Validation(smallvec![
                BookingRule::StartNotBeforeEnd
            ]));
        }

        let resolved = self
            .accounts
            .resolve_actor(actor)
            .await
            .map_err(BookingsServiceError::TenantResolution)?;

        Span::current().record("tenant_uuid", tracing::field::display(resolved.tenant));

        let tenant = self.tenants.get_tenant(resolved.tenant).await?;
        let timezone = tenant.time_zone()?;

        let mut tx = self.db.begin_tenant_transaction(resolved.tenant).await?;

        for day in lock_days(&timezone, start_at, end_at) {
            self.repository.lock_day(&mut tx, resolved.tenant, day).await?;
        }

        let weekday = start_at.to_zoned(timezone.clone()).date().weekday();
        let capacity = self.repository.day_capacity(&mut tx, weekday).await?;

        // The booking's own interval is excluded in SQL, so the guard sees
        // only the competition for the new window.
        let booked = self
            .repository
            .find_overlapping(&mut tx, start_at, end_at, Some(booking))
            .await?;

        if let ConflictOutcome::Conflict { conflicting } =
            check_capacity(start_at, end_at, &booked, capacity, None)
        {
            return Err(BookingsServiceError::SchedulingConflict { conflicting });
        }

        let record = self
            .repository
            .reschedule_booking(&mut tx, booking, start_at, end_at)
            .await?;

        tx.commit().await?;

        info!(booking_uuid = %record.uuid, "rescheduled booking");

        Ok(record)
    }

    async fn quote(
        &self,
        tenant: TenantUuid,
        request: QuoteRequest,
    ) -> Result<PriceBreakdown, BookingsServiceError> {
        // Overrides come straight from callers, so they get the strict
        // boundary check before the tolerant coercion layer sees them.
        validate_pricing_inputs(&request.overrides)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let config = self
            .repository
            .pricing_config(&mut tx)
            .await?
            .unwrap_or_default();

        let base_price = match (request.overrides.base_price, request.service_uuid) {
            (Some(base), _) => Some(base),
            (None, Some(service)) => self
                .repository
                .service_base_price(&mut tx, service)
                .await
                .map_err(related_resource)?
                .to_f64(),
            (None, None) => Some(config.base_price),
        };

        let multiplier = match (request.overrides.vehicle_multiplier, request.vehicle_uuid) {
            (Some(multiplier), _) => Some(multiplier),
            (None, Some(vehicle)) => {
                let tier = self
                    .repository
                    .vehicle_tier(&mut tx, vehicle)
                    .await
                    .map_err(related_resource)?;

                Some(vehicle_multiplier(&tier, &config.vehicle_multipliers))
            }
            (None, None) => None,
        };

        let addons = match request.overrides.addons_total {
            Some(total) => Some(total),
            None => {
                let deltas = self
                    .repository
                    .addon_price_deltas(&mut tx, &request.addon_uuids)
                    .await?;

                deltas.iter().copied().sum::<Decimal>().to_f64()
            }
        };

        let surcharge = match request.overrides.distance_surcharge {
            Some(surcharge) => Some(surcharge),
            None => request
                .distance_miles
                .and_then(|distance| config.distance.surcharge(distance).to_f64()),
        };

        let tax_rate = request.overrides.tax_rate.or(Some(config.tax_rate));

        tx.commit().await?;

        Ok(compute_price_breakdown(PricingInputs {
            base_price,
            vehicle_multiplier: multiplier,
            addons_total: addons,
            distance_surcharge: surcharge,
            tax_rate,
        }))
    }

    async fn check_window(
        &self,
        tenant: TenantUuid,
        start_at: Timestamp,
        end_at: Timestamp,
        exclude: Option<BookingUuid>,
    ) -> Result<ConflictOutcome, BookingsServiceError> {
        let record = self.tenants.get_tenant(tenant).await?;
        let timezone = record.time_zone()?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let weekday = start_at.to_zoned(timezone).date().weekday();
        let capacity = self.repository.day_capacity(&mut tx, weekday).await?;

        let booked = self
            .repository
            .find_overlapping(&mut tx, start_at, end_at, exclude)
            .await?;

        tx.commit().await?;

        Ok(check_capacity(start_at, end_at, &booked, capacity, None))
    }

    async fn get_booking(
        &self,
        tenant: TenantUuid,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_booking(&mut tx, booking).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_bookings(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self.repository.list_bookings(&mut tx).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn monthly_booking_count(
        &self,
        tenant: TenantUuid,
    ) -> Result<u32, BookingsServiceError> {
        let record = self.tenants.get_tenant(tenant).await?;
        let timezone = record.time_zone()?;

        let (month_start, month_end) =
            month_window(&timezone, Timestamp::now()).map_err(BookingsServiceError::Time)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let count = self
            .repository
            .count_created_between(&mut tx, month_start, month_end)
            .await?;

        tx.commit().await?;

        Ok(count)
    }
}

#[automock]
#[async_trait]
/// Booking intake, rescheduling, quoting and lookups.
pub trait BookingsService: Send + Sync {
    /// Create a booking on behalf of `actor`.
    ///
    /// The booking is priced from the tenant's stored catalogue at the
    /// moment of creation and the breakdown is frozen onto the record.
    /// Admission is serialised per tenant day, so two overlapping requests
    /// racing each other cannot both land in the last open slot.
    async fn create_booking(
        &self,
        actor: ActorRef,
        request: BookingRequest,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Move a booking to a new window, keeping its price untouched.
    ///
    /// The booking's current interval does not count against the new
    /// window, so shifting within its own slot always succeeds.
    async fn reschedule_booking(
        &self,
        actor: ActorRef,
        booking: BookingUuid,
        start_at: Timestamp,
        end_at: Timestamp,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Price a hypothetical booking without persisting anything.
    ///
    /// Stored records referenced by the request provide the ingredients;
    /// explicit overrides win over resolved records field by field.
    async fn quote(
        &self,
        tenant: TenantUuid,
        request: QuoteRequest,
    ) -> Result<PriceBreakdown, BookingsServiceError>;

    /// Advisory conflict probe for a window.
    ///
    /// Takes no locks; intake re-checks under its own serialisation, so a
    /// clear probe is a hint, not a reservation.
    async fn check_window(
        &self,
        tenant: TenantUuid,
        start_at: Timestamp,
        end_at: Timestamp,
        exclude: Option<BookingUuid>,
    ) -> Result<ConflictOutcome, BookingsServiceError>;

    /// Fetch a booking by UUID; soft-deleted bookings are not found.
    async fn get_booking(
        &self,
        tenant: TenantUuid,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// All of a tenant's live bookings, earliest start first.
    async fn list_bookings(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError>;

    /// Bookings created so far in the tenant's current civil month.
    async fn monthly_booking_count(
        &self,
        tenant: TenantUuid,
    ) -> Result<u32, BookingsServiceError>;
}
