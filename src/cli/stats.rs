use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use crate::{
    github::GithubSource,
    render::stat_bar::{render_stat_card, StatCardConfig, DEFAULT_TITLE},
    stats::{
        aggregate_languages, AggregateOptions, DEFAULT_IGNORED_LANGUAGES, DEFAULT_LANGUAGE_LIMIT,
    },
    utils::output::write_output,
};

#[derive(Debug, Parser)]
pub struct StatsCommand {
    #[arg(
        long,
        short,
        default_value = "assets/lang-stats.svg",
        help = "Where to write the card. Missing directories are created"
    )]
    out: PathBuf,
    #[arg(
        long,
        short,
        default_value_t = DEFAULT_LANGUAGE_LIMIT,
        help = "Number of languages shown. 0 shows every language"
    )]
    limit: usize,
    #[arg(
        long = "ignore",
        default_values_t = DEFAULT_IGNORED_LANGUAGES.map(String::from),
        help = "Language left out of the statistics. Case-sensitive, can be repeated"
    )]
    ignored: Vec<String>,
    #[arg(long, default_value = DEFAULT_TITLE, help = "Title printed on top of the card")]
    title: String,
    #[arg(long = "no-animation", help = "Draw final bar widths and percentages without animations")]
    no_animation: bool,
}

/// Fetches repository languages, aggregates them and writes the language card.
pub async fn process_stats_command(
    StatsCommand {
        out,
        limit,
        ignored,
        title,
        no_animation,
    }: StatsCommand,
    source: &impl GithubSource,
) -> Result<()> {
    info!("Fetching repository languages");
    let repositories = source.repository_languages().await?;
    info!("Aggregating languages of {} repositories", repositories.len());

    let options = AggregateOptions {
        limit: (limit > 0).then_some(limit),
        ignored,
    };
    let shares = aggregate_languages(&repositories, &options);
    if shares.is_empty() {
        warn!("No language data found, the card will be empty");
    }

    let config = StatCardConfig {
        title,
        animate: !no_animation,
        ..Default::default()
    };
    let svg = render_stat_card(&shares, &config);

    write_output(&out, &svg)?;
    info!("Language card written to {out:?}");
    Ok(())
}
