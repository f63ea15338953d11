use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "gworkspace_cli=info",
        1 => "gworkspace_cli=debug,gworkspace_core=info",
        _ => "gworkspace_cli=trace,gworkspace_core=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!cli.no_color),
        )
        .init();

    let result = match &cli.command {
        Commands::Setup { port, skip_test } => commands::setup::run(&cli, *port, *skip_test).await,
        Commands::Check => commands::check::run(&cli).await,
        Commands::Tools { service } => commands::tools::run(&cli, service.as_deref()).await,
        Commands::Call { tool, args, params } => {
            commands::call::run(&cli, tool, args.as_deref(), params).await
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
