//! Accounts Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    accounts::{
        data::{NewAddress, NewCustomer, NewStaff, NewVehicle},
        records::{
            AddressRecord, AddressUuid, CustomerRecord, CustomerUuid, StaffRecord, StaffRole,
            StaffUuid, VehicleRecord, VehicleUuid,
        },
    },
    tenants::records::TenantUuid,
};

const CREATE_STAFF_SQL: &str = include_str!("sql/create_staff.sql");
const CREATE_CUSTOMER_SQL: &str = include_str!("sql/create_customer.sql");
const CREATE_VEHICLE_SQL: &str = include_str!("sql/create_vehicle.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");
const GET_CUSTOMER_SQL: &str = include_str!("sql/get_customer.sql");
const GET_VEHICLE_SQL: &str = include_str!("sql/get_vehicle.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const RESOLVE_STAFF_SQL: &str = include_str!("sql/resolve_staff.sql");
const RESOLVE_CUSTOMER_SQL: &str = include_str!("sql/resolve_customer.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_staff(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staff: NewStaff,
    ) -> Result<StaffRecord, sqlx::Error> {
        query_as::<Postgres, StaffRecord>(CREATE_STAFF_SQL)
            .bind(staff.uuid.into_uuid())
            .bind(staff.name)
            .bind(staff.role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, sqlx::Error> {
        query_as::<Postgres, CustomerRecord>(CREATE_CUSTOMER_SQL)
            .bind(customer.uuid.into_uuid())
            .bind(customer.name)
            .bind(customer.email)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_vehicle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle: NewVehicle,
    ) -> Result<VehicleRecord, sqlx::Error> {
        query_as::<Postgres, VehicleRecord>(CREATE_VEHICLE_SQL)
            .bind(vehicle.uuid.into_uuid())
            .bind(vehicle.customer_uuid.into_uuid())
            .bind(vehicle.tier)
            .bind(vehicle.label)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: NewAddress,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(CREATE_ADDRESS_SQL)
            .bind(address.uuid.into_uuid())
            .bind(address.customer_uuid.into_uuid())
            .bind(address.line_one)
            .bind(address.distance_miles)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, sqlx::Error> {
        query_as::<Postgres, CustomerRecord>(GET_CUSTOMER_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_vehicle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle: VehicleUuid,
    ) -> Result<VehicleRecord, sqlx::Error> {
        query_as::<Postgres, VehicleRecord>(GET_VEHICLE_SQL)
            .bind(vehicle.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_ADDRESS_SQL)
            .bind(address.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Resolution queries run on the pool, before any tenant context exists.
    pub(crate) async fn resolve_staff(
        &self,
        pool: &PgPool,
        staff: StaffUuid,
    ) -> Result<(TenantUuid, StaffRole), sqlx::Error> {
        let (tenant, role): (Uuid, String) = query_as(RESOLVE_STAFF_SQL)
            .bind(staff.into_uuid())
            .fetch_one(pool)
            .await?;

        let role = StaffRole::from_str(&role).map_err(|err| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(err),
        })?;

        Ok((TenantUuid::from_uuid(tenant), role))
    }

    pub(crate) async fn resolve_customer(
        &self,
        pool: &PgPool,
        customer: CustomerUuid,
    ) -> Result<TenantUuid, sqlx::Error> {
        let (tenant,): (Uuid,) = query_as(RESOLVE_CUSTOMER_SQL)
            .bind(customer.into_uuid())
            .fetch_one(pool)
            .await?;

        Ok(TenantUuid::from_uuid(tenant))
    }
}

impl<'r> FromRow<'r, PgRow> for StaffRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        let role = StaffRole::from_str(&role).map_err(|err| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(err),
        })?;

        Ok(Self {
            uuid: StaffUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            role,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VehicleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: VehicleUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            tier: row.try_get("tier")?,
            label: row.try_get("label")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            line_one: row.try_get("line_one")?,
            distance_miles: row.try_get("distance_miles")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
