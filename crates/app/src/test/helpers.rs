//! Test Helpers

use jiff::{
    Timestamp,
    civil::{Weekday, time},
};
use lustre::{
    pricing::{DistancePolicy, PricingConfig},
    schedule::WorkPattern,
};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{
    domain::{
        accounts::{
            AccountsService,
            data::{NewAddress, NewCustomer, NewVehicle},
            records::{AddressUuid, CustomerUuid, VehicleUuid},
        },
        bookings::{data::BookingRequest, records::BookingUuid},
        catalog::{
            CatalogService,
            data::{NewAddon, NewService},
            records::{AddonUuid, ServiceUuid},
        },
        scheduling::SchedulingService,
        tenants::records::TenantUuid,
    },
    test::TestContext,
};

/// UUIDs of a seeded intake graph: one customer with an SUV and an address
/// eight miles out, a "Full Valet" service, a "Wax" add-on, Monday working
/// hours at capacity two, and a pricing config with a five-mile free
/// radius.
pub(crate) struct IntakeFixture {
    pub customer: CustomerUuid,
    pub vehicle: VehicleUuid,
    pub address: AddressUuid,
    pub service: ServiceUuid,
    pub wax: AddonUuid,
}

impl IntakeFixture {
    /// Fresh UUIDs with no rows behind them, for tests that must fail
    /// before or during storage access.
    pub(crate) fn unsaved() -> Self {
        Self {
            customer: CustomerUuid::new(),
            vehicle: VehicleUuid::new(),
            address: AddressUuid::new(),
            service: ServiceUuid::new(),
            wax: AddonUuid::new(),
        }
    }
}

/// Seed everything booking intake touches for one tenant.
///
/// The numbers are chosen so a Monday-morning SUV valet with the wax
/// add-on prices at 253.20: 120 * 1.5 + 25 + (8 - 5) * 2 = 211, taxed at
/// twenty percent.
pub(crate) async fn seed_intake(ctx: &TestContext, tenant: TenantUuid) -> IntakeFixture {
    ctx.scheduling
        .set_work_pattern(
            tenant,
            WorkPattern {
                weekday: Weekday::Monday,
                start: time(9, 0, 0, 0),
                end: time(17, 0, 0, 0),
                slot_minutes: 60,
                capacity: 2,
            },
        )
        .await
        .expect("seed work pattern");

    let customer = ctx
        .accounts
        .create_customer(
            tenant,
            NewCustomer {
                uuid: CustomerUuid::new(),
                name: "Dana".to_string(),
                email: Some("dana@example.com".to_string()),
            },
        )
        .await
        .expect("seed customer");

    let vehicle = ctx
        .accounts
        .create_vehicle(
            tenant,
            NewVehicle {
                uuid: VehicleUuid::new(),
                customer_uuid: customer.uuid,
                tier: "suv".to_string(),
                label: Some("Black SUV".to_string()),
            },
        )
        .await
        .expect("seed vehicle");

    let address = ctx
        .accounts
        .create_address(
            tenant,
            NewAddress {
                uuid: AddressUuid::new(),
                customer_uuid: customer.uuid,
                line_one: "1 Main St".to_string(),
                distance_miles: Some(8.0),
            },
        )
        .await
        .expect("seed address");

    let service = ctx
        .catalog
        .create_service(
            tenant,
            NewService {
                uuid: ServiceUuid::new(),
                name: "Full Valet".to_string(),
                base_price: Decimal::new(120_00, 2),
                duration_minutes: 60,
            },
        )
        .await
        .expect("seed service");

    let wax = ctx
        .catalog
        .create_addon(
            tenant,
            NewAddon {
                uuid: AddonUuid::new(),
                name: "Wax".to_string(),
                price_delta: Decimal::new(25_00, 2),
            },
        )
        .await
        .expect("seed addon");

    let mut multipliers = FxHashMap::default();
    multipliers.insert("sedan".to_string(), 1.0);
    multipliers.insert("suv".to_string(), 1.5);

    ctx.catalog
        .set_pricing_config(
            tenant,
            PricingConfig {
                base_price: 50.0,
                vehicle_multipliers: multipliers,
                tax_rate: 0.2,
                distance: DistancePolicy::new(5.0, 2.0),
            },
        )
        .await
        .expect("seed pricing config");

    IntakeFixture {
        customer: customer.uuid,
        vehicle: vehicle.uuid,
        address: address.uuid,
        service: service.uuid,
        wax: wax.uuid,
    }
}

/// A shape-valid intake request against the fixture, with the travel
/// distance left to resolve from the stored address.
pub(crate) fn booking_request(
    fixture: &IntakeFixture,
    start_at: Timestamp,
    end_at: Timestamp,
    reference: &str,
) -> BookingRequest {
    BookingRequest {
        uuid: BookingUuid::new(),
        customer_uuid: fixture.customer,
        vehicle_uuid: fixture.vehicle,
        address_uuid: fixture.address,
        service_uuid: fixture.service,
        addon_uuids: vec![fixture.wax],
        start_at,
        end_at,
        reference: reference.to_string(),
        distance_miles: None,
    }
}
