use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::types::TableKind;

mod cli;
mod core;
mod diff;
mod parsing;
mod report;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Progress is reported at info level; --verbose adds pipeline details
    let filter = if cli.verbose {
        EnvFilter::new("pvac_compare=debug,info")
    } else {
        EnvFilter::new("pvac_compare=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Run(args) => {
            cli::run::run(args, cli.format)?;
        }
        cli::Commands::Aggregated(args) => {
            cli::compare::run_table(TableKind::Aggregated, args, cli.format)?;
        }
        cli::Commands::Unaggregated(args) => {
            cli::compare::run_table(TableKind::Unaggregated, args, cli.format)?;
        }
        cli::Commands::ReferenceMatches(args) => {
            cli::compare::run_table(TableKind::ReferenceMatch, args, cli.format)?;
        }
        cli::Commands::Yml(args) => {
            cli::compare::run_yml(args, cli.format)?;
        }
        cli::Commands::Json(args) => {
            cli::compare::run_json(args, cli.format)?;
        }
    }

    Ok(())
}
