mod cli;
mod commands;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands};
use crate::context::resolve_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    match cli.command {
        Commands::List { query, json } => {
            let config = resolve_config(std::env::vars(), cli.base_url, cli.auth_token)?;
            commands::run_list(config, query, json).await
        }
        Commands::Delete { id } => {
            let config = resolve_config(std::env::vars(), cli.base_url, cli.auth_token)?;
            commands::run_delete(config, &id).await
        }
        Commands::Completions { shell } => {
            commands::generate_completions(shell);
            Ok(())
        }
    }
}
