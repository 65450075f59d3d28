//! Bookings Repository
//!
//! Besides the bookings table itself, this repository carries the
//! single-row reads booking intake needs from the other tables (service
//! price, add-on deltas, vehicle tier, address distance, pricing config,
//! weekday capacity) so the whole guarded section runs inside one tenant
//! transaction.

use std::hash::{Hash, Hasher};

use jiff::{Timestamp, civil::{Date, Weekday}};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use lustre::{
    booking::{BookingStatus, PaymentStatus},
    pricing::{PriceBreakdown, PricingConfig},
    schedule::BookedInterval,
};
use rust_decimal::Decimal;
use rustc_hash::FxHasher;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};
use uuid::Uuid;

use crate::domain::{
    accounts::records::{AddressUuid, CustomerUuid, VehicleUuid},
    bookings::{
        data::BookingRequest,
        records::{BookingRecord, BookingUuid},
    },
    catalog::records::{AddonUuid, ServiceUuid},
    tenants::records::TenantUuid,
};

const INSERT_BOOKING_SQL: &str = include_str!("sql/insert_booking.sql");
const GET_BOOKING_SQL: &str = include_str!("sql/get_booking.sql");
const LIST_BOOKINGS_SQL: &str = include_str!("sql/list_bookings.sql");
const RESCHEDULE_BOOKING_SQL: &str = include_str!("sql/reschedule_booking.sql");
const FIND_OVERLAPPING_SQL: &str = include_str!("sql/find_overlapping.sql");
const COUNT_CREATED_BETWEEN_SQL: &str = include_str!("sql/count_created_between.sql");
const DAY_CAPACITY_SQL: &str = include_str!("sql/day_capacity.sql");
const SERVICE_BASE_PRICE_SQL: &str = include_str!("sql/service_base_price.sql");
const ADDON_PRICE_DELTAS_SQL: &str = include_str!("sql/addon_price_deltas.sql");
const GET_PRICING_CONFIG_SQL: &str = include_str!("sql/get_pricing_config.sql");
const VEHICLE_TIER_SQL: &str = include_str!("sql/vehicle_tier.sql");
const ADDRESS_DISTANCE_SQL: &str = include_str!("sql/address_distance.sql");

/// Transaction-scoped advisory lock; released automatically at commit or
/// rollback.
const LOCK_DAY_SQL: &str = "SELECT pg_advisory_xact_lock($1)";

/// Advisory lock key for one tenant's calendar day.
///
/// Collisions between different (tenant, day) pairs only broaden a critical
/// section, they cannot admit a double booking.
fn day_lock_key(tenant: TenantUuid, day: Date) -> i64 {
    let mut hasher = FxHasher::default();

    tenant.into_uuid().as_bytes().hash(&mut hasher);
    (day.year(), day.month(), day.day()).hash(&mut hasher);

    i64::from_ne_bytes(hasher.finish().to_ne_bytes())
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBookingsRepository;

impl PgBookingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Serialise against other writers touching the same tenant day. Taken
    /// in ascending day order by the caller so multi-day writers cannot
    /// deadlock each other.
    pub(crate) async fn lock_day(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        day: Date,
    ) -> Result<(), sqlx::Error> {
        query(LOCK_DAY_SQL)
            .bind(day_lock_key(tenant, day))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Capacity-consuming bookings overlapping `[start, end)`, optionally
    /// ignoring one booking so a reschedule does not collide with itself.
    pub(crate) async fn find_overlapping(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        start: Timestamp,
        end: Timestamp,
        exclude: Option<BookingUuid>,
    ) -> Result<Vec<BookedInterval>, sqlx::Error> {
        let blocking: Vec<String> = BookingStatus::BLOCKING
            .iter()
            .map(|status| status.as_str().to_string())
            .collect();

        let rows = query(FIND_OVERLAPPING_SQL)
            .bind(SqlxTimestamp::from(start))
            .bind(SqlxTimestamp::from(end))
            .bind(&blocking)
            .bind(exclude.map(BookingUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(BookedInterval {
                    uuid: row.try_get("uuid")?,
                    start: row.try_get::<SqlxTimestamp, _>("start_at")?.to_jiff(),
                    end: row.try_get::<SqlxTimestamp, _>("end_at")?.to_jiff(),
                })
            })
            .collect()
    }

    pub(crate) async fn insert_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &BookingRequest,
        breakdown: &PriceBreakdown,
    ) -> Result<BookingRecord, sqlx::Error> {
        let addon_uuids: Vec<Uuid> = request
            .addon_uuids
            .iter()
            .map(|addon| addon.into_uuid())
            .collect();

        query_as::<Postgres, BookingRecord>(INSERT_BOOKING_SQL)
            .bind(request.uuid.into_uuid())
            .bind(request.customer_uuid.into_uuid())
            .bind(request.vehicle_uuid.into_uuid())
            .bind(request.address_uuid.into_uuid())
            .bind(request.service_uuid.into_uuid())
            .bind(&addon_uuids)
            .bind(SqlxTimestamp::from(request.start_at))
            .bind(SqlxTimestamp::from(request.end_at))
            .bind(request.reference.trim())
            .bind(Json(breakdown))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(GET_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_bookings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<BookingRecord>, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(LIST_BOOKINGS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn reschedule_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(RESCHEDULE_BOOKING_SQL)
            .bind(booking.into_uuid())
            .bind(SqlxTimestamp::from(start))
            .bind(SqlxTimestamp::from(end))
            .fetch_one(&mut **tx)
            .await
    }

    /// Bookings created in `[start, end)`, soft-deleted rows excluded.
    pub(crate) async fn count_created_between(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<u32, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_CREATED_BETWEEN_SQL)
            .bind(SqlxTimestamp::from(start))
            .bind(SqlxTimestamp::from(end))
            .fetch_one(&mut **tx)
            .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Concurrent-job capacity for a weekday. A missing pattern row means
    /// the day is closed.
    pub(crate) async fn day_capacity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        weekday: Weekday,
    ) -> Result<u32, sqlx::Error> {
        let capacity: Option<i32> = query_scalar(DAY_CAPACITY_SQL)
            .bind(i16::from(weekday.to_sunday_zero_offset().unsigned_abs()))
            .fetch_optional(&mut **tx)
            .await?;

        Ok(capacity.map_or(0, |capacity| u32::try_from(capacity).unwrap_or(0)))
    }

    pub(crate) async fn service_base_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        service: ServiceUuid,
    ) -> Result<Decimal, sqlx::Error> {
        query_scalar(SERVICE_BASE_PRICE_SQL)
            .bind(service.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Price deltas of the requested add-ons that exist; unknown UUIDs
    /// contribute nothing.
    pub(crate) async fn addon_price_deltas(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        addons: &[AddonUuid],
    ) -> Result<Vec<Decimal>, sqlx::Error> {
        let uuids: Vec<Uuid> = addons.iter().map(|addon| addon.into_uuid()).collect();

        query_scalar(ADDON_PRICE_DELTAS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
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

    pub(crate) async fn vehicle_tier(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle: VehicleUuid,
    ) -> Result<String, sqlx::Error> {
        query_scalar(VEHICLE_TIER_SQL)
            .bind(vehicle.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn address_distance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
    ) -> Result<Option<f64>, sqlx::Error> {
        query_scalar(ADDRESS_DISTANCE_SQL)
            .bind(address.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for BookingRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status: BookingStatus = status.parse().map_err(|err| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(err),
        })?;

        let payment_status: String = row.try_get("payment_status")?;
        let payment_status: PaymentStatus =
            payment_status
                .parse()
                .map_err(|err| sqlx::Error::ColumnDecode {
                    index: "payment_status".to_string(),
                    source: Box::new(err),
                })?;

        let addon_uuids: Vec<Uuid> = row.try_get("addon_uuids")?;

        Ok(Self {
            uuid: BookingUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            vehicle_uuid: VehicleUuid::from_uuid(row.try_get("vehicle_uuid")?),
            address_uuid: AddressUuid::from_uuid(row.try_get("address_uuid")?),
            service_uuid: ServiceUuid::from_uuid(row.try_get("service_uuid")?),
            addon_uuids: addon_uuids.into_iter().map(AddonUuid::from_uuid).collect(),
            start_at: row.try_get::<SqlxTimestamp, _>("start_at")?.to_jiff(),
            end_at: row.try_get::<SqlxTimestamp, _>("end_at")?.to_jiff(),
            reference: row.try_get("reference")?,
            status,
            payment_status,
            breakdown: row.try_get::<Json<PriceBreakdown>, _>("breakdown")?.0,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn lock_keys_separate_tenants_and_days() {
        let tenant_a = TenantUuid::new();
        let tenant_b = TenantUuid::new();
        let monday = date(2026, 8, 31);
        let tuesday = date(2026, 9, 1);

        assert_eq!(
            day_lock_key(tenant_a, monday),
            day_lock_key(tenant_a, monday)
        );
        assert_ne!(
            day_lock_key(tenant_a, monday),
            day_lock_key(tenant_a, tuesday)
        );
        assert_ne!(
            day_lock_key(tenant_a, monday),
            day_lock_key(tenant_b, monday)
        );
    }
}
