use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct BookingCommand {
    #[command(subcommand)]
    command: BookingSubcommand,
}

#[derive(Debug, Subcommand)]
enum BookingSubcommand {
    Create(create::CreateBookingArgs),
}

pub(crate) async fn run(command: BookingCommand) -> Result<(), String> {
    match command.command {
        BookingSubcommand::Create(args) => create::run(args).await,
    }
}
