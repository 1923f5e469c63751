use anyhow::Result;
use clap::Parser;
use database::migrations::{MigrationCommand, Migrator};

use crate::cli::args::database::DatabaseConfig;

#[derive(Debug, Parser)]
#[command(about = "Applies or reverts database migrations")]
pub struct Migration {
    #[command(flatten)]
    pub database_args: DatabaseConfig,

    #[command(flatten)]
    pub command: MigrationCommand,
}

impl Migration {
    pub async fn run(&self) -> Result<()> {
        let migrator = Migrator::new();
        let pgpool = self.database_args.connect().await?;
        self.command.run(&mut *pgpool.acquire().await?, migrator.into_boxed_inner()).await?;

        Ok(())
    }
}
