use clap::{Args, Subcommand};

mod set;

#[derive(Debug, Args)]
pub(crate) struct PatternCommand {
    #[command(subcommand)]
    command: PatternSubcommand,
}

#[derive(Debug, Subcommand)]
enum PatternSubcommand {
    Set(set::SetPatternArgs),
}

pub(crate) async fn run(command: PatternCommand) -> Result<(), String> {
    match command.command {
        PatternSubcommand::Set(args) => set::run(args).await,
    }
}
