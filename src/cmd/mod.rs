use crate::{pkg::server::listen, prelude::Result};
use clap::{Parser, Subcommand};

mod cleanup;
mod migrate;

#[derive(Parser)]
#[command(about = "job listings cms")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Serve the api and the cms pages
    Listen,
    /// Apply pending schema migrations
    Migrate,
    /// Delete postings older than the retention window
    Cleanup {
        #[arg(long)]
        days: Option<i64>,
    },
    /// Log posting counts per category
    Stats,
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::Cleanup { days }) => {
            cleanup::sweep(days).await?;
        }
        Some(SubCommandType::Stats) => {
            cleanup::stats().await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
