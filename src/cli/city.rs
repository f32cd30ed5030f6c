use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::{info, warn};

use crate::{
    github::{entities::flatten_weeks, GithubSource},
    render::{
        city::{render_city, CityConfig, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH},
        preset::{CityPreset, PresetName},
    },
    utils::{output::write_output, time::current_year},
};

use super::Args;

#[derive(Debug, Parser)]
pub struct CityCommand {
    #[arg(long, short, env = "GITHUB_ACTOR", help = "GitHub login whose calendar is rendered")]
    user: Option<String>,
    #[arg(long, short, help = "Calendar year. Defaults to the current year")]
    year: Option<i32>,
    #[arg(
        long,
        short,
        default_value = "assets/contrib-city.svg",
        help = "Where to write the image. Missing directories are created"
    )]
    out: PathBuf,
    #[arg(long, default_value_t = PresetName::Neon, help = "Look of the city")]
    preset: PresetName,
    #[arg(long = "tile-width", default_value_t = DEFAULT_TILE_WIDTH)]
    tile_width: f64,
    #[arg(long = "tile-height", default_value_t = DEFAULT_TILE_HEIGHT)]
    tile_height: f64,
    #[arg(
        long,
        help = "Exponent of the height curve. Must be above 1, larger values make busy days stand out more"
    )]
    exponent: Option<f64>,
}

struct CityParams {
    user: String,
    year: i32,
    out: PathBuf,
    config: CityConfig,
}

/// Fetches the contribution calendar of a single year and writes it as an isometric city.
pub async fn process_city_command(command: CityCommand, source: &impl GithubSource) -> Result<()> {
    let CityParams {
        user,
        year,
        out,
        config,
    } = parse_values(command)?;

    info!("Fetching contributions of {user} for {year}");
    let weeks = source.contribution_weeks(&user, year).await?;
    let days = flatten_weeks(&weeks);

    let total = days.iter().map(|d| d.count as u64).sum::<u64>();
    if total == 0 {
        warn!("{user} has no contributions in {year}, the city will be flat");
    }
    info!(
        "Building a city of {} days and {total} contributions with the {} preset",
        days.len(),
        config.preset.name
    );

    let svg = render_city(&days, &config);
    write_output(&out, &svg)?;
    info!("Contribution city written to {out:?}");
    Ok(())
}

fn validation_error(message: String) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message)
        .into()
}

/// Checks everything that can be checked before a request is made.
fn parse_values(
    CityCommand {
        user,
        year,
        out,
        preset,
        tile_width,
        tile_height,
        exponent,
    }: CityCommand,
) -> Result<CityParams> {
    let Some(user) = user.filter(|u| !u.trim().is_empty()) else {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "A GitHub user is required. Pass --user or set GITHUB_ACTOR",
            )
            .into());
    };

    let year = year.unwrap_or_else(current_year);
    if !(1970..=9999).contains(&year) {
        return Err(validation_error(format!("Year {year} is out of range")));
    }

    for (name, value) in [("tile width", tile_width), ("tile height", tile_height)] {
        if !(value.is_finite() && value > 0.) {
            return Err(validation_error(format!("The {name} must be positive, got {value}")));
        }
    }

    let preset = CityPreset::from(preset);
    let exponent = exponent.unwrap_or(preset.exponent);
    if !(exponent.is_finite() && exponent > 1.) {
        return Err(validation_error(format!(
            "The exponent must be greater than 1, got {exponent}"
        )));
    }

    let mut config = CityConfig::new(preset, year);
    config.tile_width = tile_width;
    config.tile_height = tile_height;
    config.curve = config.curve.with_exponent(exponent);

    Ok(CityParams {
        user,
        year,
        out,
        config,
    })
}
