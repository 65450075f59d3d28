use clap::Args;
use lustre::pricing::PricingInputs;
use lustre_app::{
    context::AppContext,
    domain::{
        accounts::records::VehicleUuid,
        bookings::data::QuoteRequest,
        catalog::records::{AddonUuid, ServiceUuid},
        tenants::records::TenantUuid,
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant UUID to price against
    #[arg(long)]
    tenant_uuid: Uuid,

    /// Service providing the base price
    #[arg(long)]
    service_uuid: Option<Uuid>,

    /// Vehicle providing the size multiplier
    #[arg(long)]
    vehicle_uuid: Option<Uuid>,

    /// Add-on UUIDs, repeatable
    #[arg(long = "addon-uuid")]
    addon_uuids: Vec<Uuid>,

    /// Travel distance in miles
    #[arg(long)]
    distance_miles: Option<f64>,

    /// Override the base price
    #[arg(long)]
    base_price: Option<f64>,

    /// Override the vehicle multiplier
    #[arg(long)]
    vehicle_multiplier: Option<f64>,

    /// Override the add-ons total
    #[arg(long)]
    addons_total: Option<f64>,

    /// Override the distance surcharge
    #[arg(long)]
    distance_surcharge: Option<f64>,

    /// Override the tax rate, as a fraction
    #[arg(long)]
    tax_rate: Option<f64>,
}

pub(crate) async fn run(args: QuoteArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, None)
        .await
        .map_err(|error| format!("failed to initialise services: {error}"))?;

    let breakdown = context
        .bookings
        .quote(
            TenantUuid::from_uuid(args.tenant_uuid),
            QuoteRequest {
                service_uuid: args.service_uuid.map(ServiceUuid::from_uuid),
                vehicle_uuid: args.vehicle_uuid.map(VehicleUuid::from_uuid),
                addon_uuids: args.addon_uuids.into_iter().map(AddonUuid::from_uuid).collect(),
                distance_miles: args.distance_miles,
                overrides: PricingInputs {
                    base_price: args.base_price,
                    vehicle_multiplier: args.vehicle_multiplier,
                    addons_total: args.addons_total,
                    distance_surcharge: args.distance_surcharge,
                    tax_rate: args.tax_rate,
                },
            },
        )
        .await
        .map_err(|error| format!("failed to compute quote: {error}"))?;

    println!("base: {}", breakdown.base);
    println!("vehicle_multiplier: {}", breakdown.vehicle_multiplier);
    println!("addons: {}", breakdown.addons);
    println!("distance_surcharge: {}", breakdown.distance_surcharge);
    println!("subtotal: {}", breakdown.subtotal());
    println!("tax_rate: {}", breakdown.tax_rate);
    println!("tax: {}", breakdown.tax);
    println!("total: {}", breakdown.total);

    Ok(())
}
