use clap::Args;
use jiff::{Timestamp, civil::Date};
use lustre_app::{context::AppContext, domain::tenants::records::TenantUuid};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct AvailabilityArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant UUID to show availability for
    #[arg(long)]
    tenant_uuid: Uuid,

    /// First day to include; defaults to today in the tenant's timezone
    #[arg(long)]
    from: Option<Date>,

    /// Number of days to look ahead
    #[arg(long, default_value_t = 7)]
    days: u16,
}

pub(crate) async fn run(args: AvailabilityArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, None)
        .await
        .map_err(|error| format!("failed to initialise services: {error}"))?;

    let tenant_uuid = TenantUuid::from_uuid(args.tenant_uuid);

    let tenant = context
        .tenants
        .get_tenant(tenant_uuid)
        .await
        .map_err(|error| format!("failed to fetch tenant: {error}"))?;

    let tz = tenant
        .time_zone()
        .map_err(|error| format!("failed to resolve tenant timezone: {error}"))?;

    let from = args
        .from
        .unwrap_or_else(|| Timestamp::now().to_zoned(tz.clone()).date());

    let slots = context
        .scheduling
        .available_slots(tenant_uuid, from, args.days)
        .await
        .map_err(|error| format!("failed to compute availability: {error}"))?;

    if slots.is_empty() {
        println!("no open slots in the next {} days from {from}", args.days);
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Day", "Start", "End", "Open"]);

    for slot in &slots {
        let start = slot.start.to_zoned(tz.clone());
        let end = slot.end.to_zoned(tz.clone());

        builder.push_record([
            start.strftime("%a %Y-%m-%d").to_string(),
            start.strftime("%H:%M").to_string(),
            end.strftime("%H:%M").to_string(),
            slot.remaining_capacity.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::last(), Alignment::right());

    println!("{table}");

    Ok(())
}
