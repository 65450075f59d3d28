//! Account Data

use lustre::quota::ActorKind;

use crate::domain::{
    accounts::records::{AddressUuid, CustomerUuid, StaffRole, StaffUuid, VehicleUuid},
    tenants::records::TenantUuid,
};

/// New Staff Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewStaff {
    pub uuid: StaffUuid,
    pub name: String,
    pub role: StaffRole,
}

/// New Customer Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub uuid: CustomerUuid,
    pub name: String,
    pub email: Option<String>,
}

/// New Vehicle Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub uuid: VehicleUuid,
    pub customer_uuid: CustomerUuid,
    pub tier: String,
    pub label: Option<String>,
}

/// New Address Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub customer_uuid: CustomerUuid,
    pub line_one: String,
    pub distance_miles: Option<f64>,
}

/// The caller of a booking operation, before resolution.
///
/// A guest has no session, so the payload's customer UUID stands in for an
/// identity; resolution still confirms the customer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRef {
    Staff(StaffUuid),
    Customer(CustomerUuid),
    Guest { customer_uuid: CustomerUuid },
}

/// The outcome of actor resolution: a tenant scope and a quota actor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedActor {
    pub tenant: TenantUuid,
    pub kind: ActorKind,
}
