use clap::{Args, Subcommand};

mod assign;

#[derive(Debug, Args)]
pub(crate) struct RegionsCommand {
    #[command(subcommand)]
    command: RegionsSubcommand,
}

#[derive(Debug, Subcommand)]
enum RegionsSubcommand {
    Assign(assign::AssignRegionsArgs),
}

pub(crate) async fn run(command: RegionsCommand) -> Result<(), String> {
    match command.command {
        RegionsSubcommand::Assign(args) => assign::run(args).await,
    }
}
