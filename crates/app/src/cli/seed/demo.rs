//! Seed a complete demo tenant.
//!
//! Everything is created through the shared services, bookings included,
//! so the seeded data went down the same validation, quota and conflict
//! paths a live request would.

use clap::Args;
use jiff::{
    Timestamp, ToSpan,
    civil::{Date, Weekday, time},
    tz::TimeZone,
};
use lustre::{
    pricing::{DistancePolicy, PricingConfig},
    schedule::WorkPattern,
};
use lustre_app::{
    context::AppContext,
    domain::{
        accounts::{
            data::{ActorRef, NewAddress, NewCustomer, NewStaff, NewVehicle},
            records::{AddressUuid, CustomerUuid, StaffRole, StaffUuid, VehicleUuid},
        },
        bookings::{data::BookingRequest, records::BookingUuid},
        catalog::{
            data::{NewAddon, NewService},
            records::{AddonUuid, ServiceUuid},
        },
        tenants::{data::NewTenant, records::TenantUuid},
    },
};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

#[derive(Debug, Args)]
pub(crate) struct SeedDemoArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Webhook URL for booking notifications
    #[arg(long, env = "BOOKING_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Demo tenant display name
    #[arg(long, default_value = "Demo Detailing")]
    name: String,

    /// IANA timezone the demo tenant schedules in
    #[arg(long, default_value = "UTC")]
    timezone: String,
}

fn next_monday(today: Date) -> Result<Date, String> {
    today
        .series(1.day())
        .skip(1)
        .find(|date| date.weekday() == Weekday::Monday)
        .ok_or_else(|| "no upcoming monday on the calendar".to_string())
}

/// Project `hour` o'clock on `day` through the tenant's timezone.
fn at_hour(day: Date, hour: i8, tz: &TimeZone) -> Result<Timestamp, String> {
    day.at(hour, 0, 0, 0)
        .to_zoned(tz.clone())
        .map(|zoned| zoned.timestamp())
        .map_err(|error| format!("failed to project slot boundary: {error}"))
}

pub(crate) async fn run(args: SeedDemoArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, args.webhook_url)
        .await
        .map_err(|error| format!("failed to initialise services: {error}"))?;

    let tenant_uuid = TenantUuid::new();

    let tenant = context
        .tenants
        .create_tenant(NewTenant {
            uuid: tenant_uuid,
            name: args.name,
            plan: "starter".to_string(),
            timezone: args.timezone,
            monthly_booking_limit: None,
        })
        .await
        .map_err(|error| format!("failed to create demo tenant: {error}"))?;

    let tz = tenant
        .time_zone()
        .map_err(|error| format!("failed to resolve tenant timezone: {error}"))?;

    // Two bays on weekdays, a single Saturday-morning bay, Sunday closed.
    for weekday in [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ] {
        context
            .scheduling
            .set_work_pattern(
                tenant_uuid,
                WorkPattern {
                    weekday,
                    start: time(9, 0, 0, 0),
                    end: time(17, 0, 0, 0),
                    slot_minutes: 60,
                    capacity: 2,
                },
            )
            .await
            .map_err(|error| format!("failed to set work pattern: {error}"))?;
    }

    context
        .scheduling
        .set_work_pattern(
            tenant_uuid,
            WorkPattern {
                weekday: Weekday::Saturday,
                start: time(10, 0, 0, 0),
                end: time(14, 0, 0, 0),
                slot_minutes: 60,
                capacity: 1,
            },
        )
        .await
        .map_err(|error| format!("failed to set work pattern: {error}"))?;

    let mut multipliers = FxHashMap::default();
    multipliers.insert("sedan".to_string(), 1.0);
    multipliers.insert("suv".to_string(), 1.5);
    multipliers.insert("van".to_string(), 1.7);

    context
        .catalog
        .set_pricing_config(
            tenant_uuid,
            PricingConfig {
                base_price: 50.0,
                vehicle_multipliers: multipliers,
                tax_rate: 0.2,
                distance: DistancePolicy::new(5.0, 2.0),
            },
        )
        .await
        .map_err(|error| format!("failed to store pricing config: {error}"))?;

    let wash = seed_service(&context, tenant_uuid, "Exterior Wash", 45_00, 60).await?;
    let valet = seed_service(&context, tenant_uuid, "Full Valet", 120_00, 60).await?;
    let coating = seed_service(&context, tenant_uuid, "Ceramic Coating", 300_00, 120).await?;

    let wax = context
        .catalog
        .create_addon(
            tenant_uuid,
            NewAddon {
                uuid: AddonUuid::new(),
                name: "Wax".to_string(),
                price_delta: Decimal::new(25_00, 2),
            },
        )
        .await
        .map_err(|error| format!("failed to create add-on: {error}"))?;

    context
        .catalog
        .create_addon(
            tenant_uuid,
            NewAddon {
                uuid: AddonUuid::new(),
                name: "Interior Deep Clean".to_string(),
                price_delta: Decimal::new(40_00, 2),
            },
        )
        .await
        .map_err(|error| format!("failed to create add-on: {error}"))?;

    let admin = context
        .accounts
        .create_staff(
            tenant_uuid,
            NewStaff {
                uuid: StaffUuid::new(),
                name: "Avery".to_string(),
                role: StaffRole::Admin,
            },
        )
        .await
        .map_err(|error| format!("failed to create staff member: {error}"))?;

    let dana = seed_customer(&context, tenant_uuid, "Dana", "suv", "14 Hillcrest Road", 8.0).await?;
    let lee = seed_customer(&context, tenant_uuid, "Lee", "sedan", "2 Station Approach", 2.0).await?;

    let actor = ActorRef::Staff(admin.uuid);
    let monday = next_monday(Timestamp::now().to_zoned(tz.clone()).date())?;

    let nine = at_hour(monday, 9, &tz)?;
    let ten = at_hour(monday, 10, &tz)?;
    let noon = at_hour(monday, 12, &tz)?;

    // Both bays of the nine o'clock slot, then a two-hour job at ten.
    let first = context
        .bookings
        .create_booking(
            actor,
            BookingRequest {
                uuid: BookingUuid::new(),
                customer_uuid: dana.customer,
                vehicle_uuid: dana.vehicle,
                address_uuid: dana.address,
                service_uuid: valet,
                addon_uuids: vec![wax.uuid],
                start_at: nine,
                end_at: ten,
                reference: "demo-0001".to_string(),
                distance_miles: None,
            },
        )
        .await
        .map_err(|error| format!("failed to create demo booking: {error}"))?;

    let second = context
        .bookings
        .create_booking(
            actor,
            BookingRequest {
                uuid: BookingUuid::new(),
                customer_uuid: lee.customer,
                vehicle_uuid: lee.vehicle,
                address_uuid: lee.address,
                service_uuid: wash,
                addon_uuids: vec![],
                start_at: nine,
                end_at: ten,
                reference: "demo-0002".to_string(),
                distance_miles: None,
            },
        )
        .await
        .map_err(|error| format!("failed to create demo booking: {error}"))?;

    let third = context
        .bookings
        .create_booking(
            actor,
            BookingRequest {
                uuid: BookingUuid::new(),
                customer_uuid: dana.customer,
                vehicle_uuid: dana.vehicle,
                address_uuid: dana.address,
                service_uuid: coating,
                addon_uuids: vec![],
                start_at: ten,
                end_at: noon,
                reference: "demo-0003".to_string(),
                distance_miles: None,
            },
        )
        .await
        .map_err(|error| format!("failed to create demo booking: {error}"))?;

    println!("tenant_uuid: {tenant_uuid}");
    println!("admin_staff_uuid: {}", admin.uuid);
    println!("customer_dana: {}", dana.customer);
    println!("customer_lee: {}", lee.customer);
    println!("service_exterior_wash: {wash}");
    println!("service_full_valet: {valet}");
    println!("service_ceramic_coating: {coating}");
    println!("booking_demo_0001: {} (total {})", first.uuid, first.breakdown.total);
    println!("booking_demo_0002: {} (total {})", second.uuid, second.breakdown.total);
    println!("booking_demo_0003: {} (total {})", third.uuid, third.breakdown.total);

    Ok(())
}

async fn seed_service(
    context: &AppContext,
    tenant: TenantUuid,
    name: &str,
    price_cents: i64,
    duration_minutes: i32,
) -> Result<ServiceUuid, String> {
    let service = context
        .catalog
        .create_service(
            tenant,
            NewService {
                uuid: ServiceUuid::new(),
                name: name.to_string(),
                base_price: Decimal::new(price_cents, 2),
                duration_minutes,
            },
        )
        .await
        .map_err(|error| format!("failed to create service: {error}"))?;

    Ok(service.uuid)
}

struct SeededCustomer {
    customer: CustomerUuid,
    vehicle: VehicleUuid,
    address: AddressUuid,
}

async fn seed_customer(
    context: &AppContext,
    tenant: TenantUuid,
    name: &str,
    tier: &str,
    line_one: &str,
    distance_miles: f64,
) -> Result<SeededCustomer, String> {
    let customer = context
        .accounts
        .create_customer(
            tenant,
            NewCustomer {
                uuid: CustomerUuid::new(),
                name: name.to_string(),
                email: Some(format!("{}@example.com", name.to_ascii_lowercase())),
            },
        )
        .await
        .map_err(|error| format!("failed to create customer: {error}"))?;

    let vehicle = context
        .accounts
        .create_vehicle(
            tenant,
            NewVehicle {
                uuid: VehicleUuid::new(),
                customer_uuid: customer.uuid,
                tier: tier.to_string(),
                label: None,
            },
        )
        .await
        .map_err(|error| format!("failed to create vehicle: {error}"))?;

    let address = context
        .accounts
        .create_address(
            tenant,
            NewAddress {
                uuid: AddressUuid::new(),
                customer_uuid: customer.uuid,
                line_one: line_one.to_string(),
                distance_miles: Some(distance_miles),
            },
        )
        .await
        .map_err(|error| format!("failed to create address: {error}"))?;

    Ok(SeededCustomer {
        customer: customer.uuid,
        vehicle: vehicle.uuid,
        address: address.uuid,
    })
}
