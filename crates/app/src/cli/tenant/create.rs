use clap::Args;
use lustre_app::{
    context::AppContext,
    domain::tenants::{data::NewTenant, records::TenantUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTenantArgs {
    /// Tenant display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Plan name, display-only
    #[arg(long, default_value = "starter")]
    plan: String,

    /// IANA timezone the tenant schedules in
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Monthly booking limit; omit for unlimited
    #[arg(long)]
    monthly_booking_limit: Option<i64>,

    /// Optional tenant UUID; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateTenantArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, None)
        .await
        .map_err(|error| format!("failed to initialise services: {error}"))?;

    let tenant_uuid = args
        .tenant_uuid
        .map_or_else(TenantUuid::new, TenantUuid::from_uuid);

    let tenant = context
        .tenants
        .create_tenant(NewTenant {
            uuid: tenant_uuid,
            name: args.name,
            plan: args.plan,
            timezone: args.timezone,
            monthly_booking_limit: args.monthly_booking_limit,
        })
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);
    println!("plan: {}", tenant.plan);
    println!("timezone: {}", tenant.timezone);
    println!(
        "monthly_booking_limit: {}",
        tenant
            .monthly_booking_limit
            .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string())
    );

    Ok(())
}
