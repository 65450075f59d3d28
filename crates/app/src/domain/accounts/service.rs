//! Accounts service.

use async_trait::async_trait;
use lustre::quota::ActorKind;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::{
            data::{ActorRef, NewAddress, NewCustomer, NewStaff, NewVehicle, ResolvedActor},
            errors::AccountsServiceError,
            records::{
                AddressRecord, AddressUuid, CustomerRecord, CustomerUuid, StaffRecord,
                VehicleRecord, VehicleUuid,
            },
            repository::PgAccountsRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn create_staff(
        &self,
        tenant: TenantUuid,
        staff: NewStaff,
    ) -> Result<StaffRecord, AccountsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_staff(&mut tx, staff).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_customer(
        &self,
        tenant: TenantUuid,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, AccountsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_vehicle(
        &self,
        tenant: TenantUuid,
        vehicle: NewVehicle,
    ) -> Result<VehicleRecord, AccountsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_vehicle(&mut tx, vehicle).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_address(
        &self,
        tenant: TenantUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AccountsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_address(&mut tx, address).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_customer(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, AccountsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn get_vehicle(
        &self,
        tenant: TenantUuid,
        vehicle: VehicleUuid,
    ) -> Result<VehicleRecord, AccountsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_vehicle(&mut tx, vehicle).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn get_address(
        &self,
        tenant: TenantUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AccountsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_address(&mut tx, address).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn resolve_actor(&self, actor: ActorRef) -> Result<ResolvedActor, AccountsServiceError> {
        match actor {
            ActorRef::Staff(staff) => {
                let (tenant, role) = self.repository.resolve_staff(self.db.pool(), staff).await?;

                Ok(ResolvedActor {
                    tenant,
                    kind: role.actor_kind(),
                })
            }
            ActorRef::Customer(customer) => {
                let tenant = self
                    .repository
                    .resolve_customer(self.db.pool(), customer)
                    .await?;

                Ok(ResolvedActor {
                    tenant,
                    kind: ActorKind::Customer,
                })
            }
            ActorRef::Guest { customer_uuid } => {
                let tenant = self
                    .repository
                    .resolve_customer(self.db.pool(), customer_uuid)
                    .await?;

                Ok(ResolvedActor {
                    tenant,
                    kind: ActorKind::Guest,
                })
            }
        }
    }
}

#[automock]
#[async_trait]
/// Account persistence and actor resolution.
pub trait AccountsService: Send + Sync {
    /// Creates a staff profile under a tenant.
    async fn create_staff(
        &self,
        tenant: TenantUuid,
        staff: NewStaff,
    ) -> Result<StaffRecord, AccountsServiceError>;

    /// Creates a customer under a tenant.
    async fn create_customer(
        &self,
        tenant: TenantUuid,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, AccountsServiceError>;

    /// Creates a vehicle for a customer.
    async fn create_vehicle(
        &self,
        tenant: TenantUuid,
        vehicle: NewVehicle,
    ) -> Result<VehicleRecord, AccountsServiceError>;

    /// Creates an address for a customer.
    async fn create_address(
        &self,
        tenant: TenantUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AccountsServiceError>;

    /// Fetch a customer by UUID.
    async fn get_customer(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, AccountsServiceError>;

    /// Fetch a vehicle by UUID.
    async fn get_vehicle(
        &self,
        tenant: TenantUuid,
        vehicle: VehicleUuid,
    ) -> Result<VehicleRecord, AccountsServiceError>;

    /// Fetch an address by UUID.
    async fn get_address(
        &self,
        tenant: TenantUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AccountsServiceError>;

    /// Turn "who is calling" into a tenant scope and a quota actor kind.
    ///
    /// Runs before any tenant context exists, so it is the one read path
    /// that is not scoped by row-level security.
    async fn resolve_actor(&self, actor: ActorRef) -> Result<ResolvedActor, AccountsServiceError>;
}
