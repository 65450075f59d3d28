use clap::{Args, Subcommand};

mod demo;

#[derive(Debug, Args)]
pub(crate) struct SeedCommand {
    #[command(subcommand)]
    command: SeedSubcommand,
}

#[derive(Debug, Subcommand)]
enum SeedSubcommand {
    Demo(demo::SeedDemoArgs),
}

pub(crate) async fn run(command: SeedCommand) -> Result<(), String> {
    match command.command {
        SeedSubcommand::Demo(args) => demo::run(args).await,
    }
}
