use anyhow::Result;
use clap::Parser;

use crate::cli::subcommands::Subcommand;

pub mod args;
pub mod subcommands;

pub struct Application;

#[derive(Parser)]
#[command(version, about = "Administers the speakers of conferences")]
pub struct Cli {
    #[command(subcommand)]
    subcommand: Subcommand,
}

impl Application {
    pub async fn start() -> Result<()> {
        let cli = Cli::parse();

        match cli.subcommand {
            Subcommand::Migration(migration) => migration.run().await,
            Subcommand::Speaker(speaker) => speaker.run().await,
        }
    }
}
