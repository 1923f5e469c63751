use anyhow::{Context as _, Result};
use clap::Parser;
use database::{PgPool, PgPoolOptions};

#[derive(Debug, Parser)]
pub struct DatabaseConfig {
    #[arg(long, env, hide_env_values = true)]
    pub database_url: String,

    #[arg(long, env, default_value_t = 5)]
    pub database_max_connections: u32,
}

impl DatabaseConfig {
    pub async fn connect(&self) -> Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.database_max_connections)
            .connect(&self.database_url)
            .await
            .context("failed to connect to database")
    }
}
