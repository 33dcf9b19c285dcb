use clap::{Parser, Subcommand};

mod db;
mod regions;
mod users;

#[derive(Debug, Parser)]
#[command(name = "loyalty-app", about = "Partner Rewards CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Users(users::UsersCommand),
    Regions(regions::RegionsCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Users(command) => users::run(command).await,
            Commands::Regions(command) => regions::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
