use clap::Args;
use jiff::civil::{Time, Weekday};
use lustre::schedule::{WorkPattern, pattern::weekday_name};
use lustre_app::{context::AppContext, domain::tenants::records::TenantUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetPatternArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant UUID the pattern belongs to
    #[arg(long)]
    tenant_uuid: Uuid,

    /// Weekday name or Sunday-zero index
    #[arg(long, value_parser = parse_weekday)]
    weekday: Weekday,

    /// Opening time, for example 09:00
    #[arg(long)]
    start: Time,

    /// Closing time, for example 17:00
    #[arg(long)]
    end: Time,

    /// Slot length in minutes
    #[arg(long, default_value_t = 60)]
    slot_minutes: i32,

    /// Concurrent jobs the day can hold; zero closes the day
    #[arg(long)]
    capacity: u32,
}

fn parse_weekday(raw: &str) -> Result<Weekday, String> {
    if let Ok(index) = raw.parse::<i8>() {
        return Weekday::from_sunday_zero_offset(index)
            .map_err(|_err| format!("weekday index out of range: {raw}"));
    }

    weekday_name::from_name(raw).ok_or_else(|| format!("unknown weekday {raw:?}"))
}

pub(crate) async fn run(args: SetPatternArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, None)
        .await
        .map_err(|error| format!("failed to initialise services: {error}"))?;

    let record = context
        .scheduling
        .set_work_pattern(
            TenantUuid::from_uuid(args.tenant_uuid),
            WorkPattern {
                weekday: args.weekday,
                start: args.start,
                end: args.end,
                slot_minutes: args.slot_minutes,
                capacity: args.capacity,
            },
        )
        .await
        .map_err(|error| format!("failed to set work pattern: {error}"))?;

    let pattern = &record.pattern;

    println!("pattern_uuid: {}", record.uuid);
    println!("weekday: {}", weekday_name::name(pattern.weekday));
    println!("window: {} - {}", pattern.start, pattern.end);
    println!("slot_minutes: {}", pattern.slot_minutes);
    println!("capacity: {}", pattern.capacity);

    Ok(())
}
