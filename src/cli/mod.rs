pub mod city;
pub mod stats;

use std::path::PathBuf;

use anyhow::Result;
use city::{process_city_command, CityCommand};
use clap::{CommandFactory, Parser, Subcommand};
use stats::{process_stats_command, StatsCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    github::client::{GraphqlClient, DEFAULT_ENDPOINT},
    utils::logging::enable_logging,
};

#[derive(Parser, Debug)]
#[command(name = "readme-skyline", version, long_about = None)]
#[command(about = "Generates profile README images from GitHub data", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub token used for the GraphQL API. Can also be placed in a .env file"
    )]
    token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "GITHUB_GRAPHQL_URL",
        default_value = DEFAULT_ENDPOINT,
        help = "GraphQL endpoint. Only needs changing for GitHub Enterprise"
    )]
    endpoint: String,
    #[arg(long, global = true, help = "Enable verbose logging")]
    log: bool,
    #[arg(
        long = "log-filter",
        global = true,
        help = "Explicit log level, overrides --log and RUST_LOG"
    )]
    log_filter: Option<LevelFilter>,
    #[arg(
        long = "log-dir",
        global = true,
        help = "Additionally write logs into daily files in this directory"
    )]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Render a bar card of the languages used across your own repositories")]
    Stats {
        #[command(flatten)]
        command: StatsCommand,
    },
    #[command(about = "Render the contribution calendar of a year as an isometric city")]
    City {
        #[command(flatten)]
        command: CityCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let logging_level = args
        .log_filter
        .or_else(|| args.log.then_some(LevelFilter::DEBUG));
    enable_logging(logging_level, args.log_dir.as_deref())?;

    let token = require_token(args.token)?;
    debug!("Using endpoint {}", args.endpoint);
    let client = GraphqlClient::new(args.endpoint, token)?;

    match args.commands {
        Commands::Stats { command } => process_stats_command(command, &client).await,
        Commands::City { command } => process_city_command(command, &client).await,
    }
}

/// The token is checked before any other work so a misconfigured run fails without touching the
/// network.
fn require_token(token: Option<String>) -> Result<String> {
    match token.filter(|t| !t.trim().is_empty()) {
        Some(token) => Ok(token),
        None => Err(Args::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "A GitHub token is required. Pass --token or set GITHUB_TOKEN",
            )
            .into()),
    }
}
