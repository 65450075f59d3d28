use clap::{Parser, Subcommand};

mod availability;
mod booking;
mod pattern;
mod quote;
mod seed;
mod tenant;

#[derive(Debug, Parser)]
#[command(name = "lustre-app", about = "Lustre CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage tenants
    Tenant(tenant::TenantCommand),

    /// Manage weekly working patterns
    Pattern(pattern::PatternCommand),

    /// Show bookable slots for a tenant
    Availability(availability::AvailabilityArgs),

    /// Manage bookings
    Booking(booking::BookingCommand),

    /// Price a booking without creating it
    Quote(quote::QuoteArgs),

    /// Seed demo data
    Seed(seed::SeedCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Tenant(command) => tenant::run(command).await,
            Commands::Pattern(command) => pattern::run(command).await,
            Commands::Availability(args) => availability::run(args).await,
            Commands::Booking(command) => booking::run(command).await,
            Commands::Quote(args) => quote::run(args).await,
            Commands::Seed(command) => seed::run(command).await,
        }
    }
}
