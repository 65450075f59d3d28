use clap::Args;
use jiff::{Timestamp, ToSpan};
use lustre_app::{
    context::AppContext,
    domain::{
        accounts::{
            data::ActorRef,
            records::{AddressUuid, CustomerUuid, StaffUuid, VehicleUuid},
        },
        bookings::{data::BookingRequest, records::BookingUuid},
        catalog::records::{AddonUuid, ServiceUuid},
    },
};
use rand::{Rng, distributions::Alphanumeric};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateBookingArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Webhook URL for booking notifications
    #[arg(long, env = "BOOKING_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Acting staff member's UUID
    #[arg(long)]
    staff_uuid: Uuid,

    /// Customer the booking is for
    #[arg(long)]
    customer_uuid: Uuid,

    /// Vehicle being detailed
    #[arg(long)]
    vehicle_uuid: Uuid,

    /// Address the job runs at
    #[arg(long)]
    address_uuid: Uuid,

    /// Detailing service to book
    #[arg(long)]
    service_uuid: Uuid,

    /// Add-on UUIDs, repeatable
    #[arg(long = "addon-uuid")]
    addon_uuids: Vec<Uuid>,

    /// Start of the window, RFC 3339
    #[arg(long)]
    start: Timestamp,

    /// End of the window; defaults to start plus the service duration
    #[arg(long)]
    end: Option<Timestamp>,

    /// Idempotency reference, unique per tenant; generated when omitted
    #[arg(long)]
    reference: Option<String>,

    /// Travel distance in miles, overriding the address's stored distance
    #[arg(long)]
    distance_miles: Option<f64>,
}

fn generate_reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    format!("bk-{}", suffix.to_ascii_lowercase())
}

pub(crate) async fn run(args: CreateBookingArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, args.webhook_url)
        .await
        .map_err(|error| format!("failed to initialise services: {error}"))?;

    let actor = ActorRef::Staff(StaffUuid::from_uuid(args.staff_uuid));
    let service_uuid = ServiceUuid::from_uuid(args.service_uuid);

    let end_at = match args.end {
        Some(end) => end,
        None => {
            let resolved = context
                .accounts
                .resolve_actor(actor)
                .await
                .map_err(|error| format!("failed to resolve staff member: {error}"))?;

            let service = context
                .catalog
                .get_service(resolved.tenant, service_uuid)
                .await
                .map_err(|error| format!("failed to fetch service: {error}"))?;

            args.start
                .checked_add(i64::from(service.duration_minutes).minutes())
                .map_err(|error| format!("window end out of range: {error}"))?
        }
    };

    let booking = context
        .bookings
        .create_booking(
            actor,
            BookingRequest {
                uuid: BookingUuid::new(),
                customer_uuid: CustomerUuid::from_uuid(args.customer_uuid),
                vehicle_uuid: VehicleUuid::from_uuid(args.vehicle_uuid),
                address_uuid: AddressUuid::from_uuid(args.address_uuid),
                service_uuid,
                addon_uuids: args.addon_uuids.into_iter().map(AddonUuid::from_uuid).collect(),
                start_at: args.start,
                end_at,
                reference: args.reference.unwrap_or_else(generate_reference),
                distance_miles: args.distance_miles,
            },
        )
        .await
        .map_err(|error| format!("failed to create booking: {error}"))?;

    println!("booking_uuid: {}", booking.uuid);
    println!("reference: {}", booking.reference);
    println!("window: {} - {}", booking.start_at, booking.end_at);
    println!("status: {}", booking.status);
    println!("total: {}", booking.breakdown.total);

    Ok(())
}
