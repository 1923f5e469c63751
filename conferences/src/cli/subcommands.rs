use migration::Migration;
use speaker::Speaker;

mod migration;
mod speaker;

#[derive(clap::Subcommand)]
pub enum Subcommand {
    Migration(Migration),
    Speaker(Speaker),
}
