//! The contribution city: an isometric skyline with one building per day.

use std::fmt::Write;

use tracing::{debug, instrument};

use crate::github::entities::ContributionDay;

use super::{
    color::Rgb,
    isometric::{
        build_cells, city_polygons, max_count, window_lights, FaceKind, HeightCurve,
        IsometricProjector, ScreenPoint,
    },
    preset::{CityPreset, Glow, GlowStyle},
    svg::{escape_text, points, FONT_STYLE, XML_PROLOG},
};

/// Days in a calendar column.
pub const GRID_ROWS: u32 = 7;

pub const DEFAULT_TILE_WIDTH: f64 = 42.;
pub const DEFAULT_TILE_HEIGHT: f64 = 26.;
pub const DEFAULT_WINDOW_SPACING: f64 = 22.;

const LEFT_WALL_SHADE: f64 = -45.;
const RIGHT_WALL_SHADE: f64 = -20.;
const ROOF_STROKE_SHADE: f64 = 40.;

#[derive(Debug, Clone)]
pub struct CityConfig {
    pub tile_width: f64,
    pub tile_height: f64,
    pub curve: HeightCurve,
    pub preset: CityPreset,
    pub window_spacing: f64,
    /// Only used for the caption.
    pub year: i32,
}

impl CityConfig {
    pub fn new(preset: CityPreset, year: i32) -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            curve: HeightCurve::default().with_exponent(preset.exponent),
            preset,
            window_spacing: DEFAULT_WINDOW_SPACING,
            year,
        }
    }
}

/// Canvas size and where the grid origin lands on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityLayout {
    pub width: f64,
    pub height: f64,
    pub origin: ScreenPoint,
}

impl CityLayout {
    /// The canvas leaves room on the left for the weekday axis running down-left. `headroom` is
    /// the tallest possible building, the grid is pushed down by it so no roof leaves the canvas.
    pub fn for_weeks(weeks: u32, tile_width: f64, tile_height: f64, headroom: f64) -> Self {
        let span = (weeks + GRID_ROWS) as f64;
        Self {
            width: span * tile_width / 2. + 120.,
            height: span * tile_height / 2. + 200. + headroom,
            origin: ScreenPoint::new(60. + GRID_ROWS as f64 * tile_width / 2., 100. + headroom),
        }
    }
}

fn week_count(days: &[ContributionDay]) -> u32 {
    days.iter().map(|d| d.week_index + 1).max().unwrap_or(0)
}

/// Renders the whole SVG document. The result depends only on `days` and `config`.
#[instrument(skip_all, fields(days = days.len(), preset = config.preset.name))]
pub fn render_city(days: &[ContributionDay], config: &CityConfig) -> String {
    let preset = &config.preset;
    let layout = CityLayout::for_weeks(
        week_count(days),
        config.tile_width,
        config.tile_height,
        config.curve.tallest(),
    );
    let projector = IsometricProjector::new(config.tile_width, config.tile_height, layout.origin);
    let max_count = max_count(days);

    let cells = build_cells(days, &projector, &config.curve);
    let polygons = city_polygons(&cells);
    debug!("Projected {} cells into {} polygons", cells.len(), polygons.len());

    let mut pieces = Vec::with_capacity(polygons.len());
    for polygon in &polygons {
        let cell = &cells[polygon.cell];
        let color = preset.color_for(cell.day.count, max_count);
        let coordinates = points(&polygon.points);
        match polygon.kind {
            FaceKind::Ground => pieces.push(format!(
                r#"<polygon points="{coordinates}" fill="none" stroke="{}" stroke-width="0.8" opacity="0.6"/>"#,
                preset.ground_stroke
            )),
            FaceKind::LeftWall => pieces.push(format!(
                r#"<polygon points="{coordinates}" fill="{}"/>"#,
                color.shade(LEFT_WALL_SHADE)
            )),
            FaceKind::RightWall => pieces.push(format!(
                r#"<polygon points="{coordinates}" fill="{}"/>"#,
                color.shade(RIGHT_WALL_SHADE)
            )),
            FaceKind::Roof => {
                let filter = preset
                    .glow_for(cell.day.count, max_count)
                    .map(|glow| format!(r#" filter="url(#{})""#, glow.filter_id()))
                    .unwrap_or_default();
                pieces.push(format!(
                    r#"<polygon points="{coordinates}" fill="{color}" stroke="{}" stroke-width="1"{filter}/>"#,
                    color.shade(ROOF_STROKE_SHADE)
                ));
                // Windows belong to this building, so they are drawn before anything in front
                // of it.
                if let Some(led) = preset.leds {
                    for light in window_lights(cell, &projector, config.window_spacing) {
                        pieces.push(format!(
                            r#"<circle cx="{:.1}" cy="{:.1}" r="2" fill="{led}" opacity="0.9"/>"#,
                            light.x, light.y
                        ));
                    }
                }
            }
        }
    }

    let mut svg = String::new();
    let _ = writeln!(svg, "{XML_PROLOG}");
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = layout.width,
        h = layout.height
    );
    write_defs(&mut svg, preset);
    let _ = writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="url(#bg-gradient)"/>"#
    );
    let _ = writeln!(svg, "  <g>");
    for piece in pieces {
        let _ = writeln!(svg, "    {piece}");
    }
    let _ = writeln!(svg, "  </g>");
    let _ = writeln!(
        svg,
        r#"  <text x="50" y="{}">Contribution City • {}</text>"#,
        layout.height - 50.,
        config.year
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="end" fill="{}" font-weight="bold">{}</text>"#,
        layout.width - 50.,
        layout.height - 50.,
        preset.accent,
        escape_text(preset.accent_label)
    );
    let _ = writeln!(svg, "</svg>");
    svg
}

fn write_defs(svg: &mut String, preset: &CityPreset) {
    let _ = writeln!(svg, "  <defs>");
    match preset.glow {
        GlowStyle::None => {}
        GlowStyle::Soft => write_glow_filter(svg, Glow::Soft, preset.soft_glow_color),
        GlowStyle::Neon => {
            write_glow_filter(svg, Glow::Strong, preset.strong_glow_color);
            write_glow_filter(svg, Glow::Soft, preset.soft_glow_color);
        }
    }
    let _ = writeln!(
        svg,
        "    <style>text {{ {FONT_STYLE} fill: {}; font-size: 15px; }}</style>",
        preset.text
    );
    let (from, to) = preset.background;
    let _ = writeln!(
        svg,
        r#"    <linearGradient id="bg-gradient" x1="0%" y1="0%" x2="0%" y2="100%">
      <stop offset="0%" stop-color="{from}"/>
      <stop offset="100%" stop-color="{to}"/>
    </linearGradient>"#
    );
    let _ = writeln!(svg, "  </defs>");
}

fn write_glow_filter(svg: &mut String, glow: Glow, color: Rgb) {
    let (deviation, opacity) = match glow {
        Glow::Strong => (5, 0.9),
        Glow::Soft => (8, 0.6),
    };
    let _ = writeln!(
        svg,
        r#"    <filter id="{id}" x="-100%" y="-100%" width="300%" height="300%">
      <feGaussianBlur stdDeviation="{deviation}" result="blur"/>
      <feFlood flood-color="{color}" flood-opacity="{opacity}"/>
      <feComposite in="SourceGraphic" in2="blur" operator="out"/>
      <feMerge>
        <feMergeNode/>
        <feMergeNode in="SourceGraphic"/>
      </feMerge>
    </filter>"#,
        id = glow.filter_id()
    );
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        github::entities::ContributionDay,
        render::{isometric::HeightCurve, preset::CityPreset},
        utils::logging::TEST_LOGGING,
    };

    use super::{render_city, CityConfig, CityLayout};

    fn days() -> Vec<ContributionDay> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        (0..3u32)
            .flat_map(|week| {
                (0..7u32).map(move |dow| ContributionDay {
                    week_index: week,
                    day_of_week: dow,
                    date: start + chrono::Duration::days((week * 7 + dow) as i64),
                    count: (week * 7 + dow) % 5 * 3,
                })
            })
            .collect()
    }

    #[test]
    fn layout_matches_grid_size() {
        let layout = CityLayout::for_weeks(53, 42., 26., HeightCurve::default().tallest());
        assert_eq!(layout.width, 1380.);
        assert_eq!(layout.height, 1160.);
        assert_eq!(layout.origin.x, 207.);
        assert_eq!(layout.origin.y, 280.);
    }

    #[test]
    fn tallest_buildings_stay_on_canvas() {
        let mut days = days();
        for day in days.iter_mut() {
            day.count = 12;
        }
        let mut config = CityConfig::new(CityPreset::classic(), 2025);
        config.curve = config.curve.with_exponent(2.);
        config.curve.max_height = 400.;
        let svg = render_city(&days, &config);

        let height = svg
            .split(r#"height=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap();
        let ys = svg
            .split(r#"points=""#)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .flat_map(|points| points.split(' '))
            .map(|pair| pair.split(',').nth(1).unwrap().parse::<f64>().unwrap())
            .collect::<Vec<_>>();

        assert!(!ys.is_empty());
        assert!(ys.iter().all(|y| *y >= 0. && *y <= height), "{ys:?}");
    }

    #[test]
    fn renders_a_complete_document() {
        *TEST_LOGGING;
        let days = days();
        let svg = render_city(&days, &CityConfig::new(CityPreset::neon(), 2025));

        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"width="330" height="510""#));
        assert!(svg.contains("Contribution City • 2025"));
        assert!(svg.contains(r#"id="neon-glow""#));
        assert!(svg.contains(r#"id="soft-glow""#));

        let empty = days.iter().filter(|d| d.count == 0).count();
        let buildings = days.len() - empty;
        assert_eq!(svg.matches("<polygon").count(), empty + buildings * 3);
        assert_eq!(svg.matches(r#"fill="none""#).count(), empty);
    }

    #[test]
    fn classic_preset_has_no_filters_or_windows() {
        let svg = render_city(&days(), &CityConfig::new(CityPreset::classic(), 2024));

        assert!(!svg.contains("<filter"));
        assert!(!svg.contains("filter=\"url"));
        assert!(!svg.contains("<circle"));
        assert!(svg.contains("Contribution Graph"));
    }

    #[test]
    fn busiest_roof_glows_in_neon() {
        let svg = render_city(&days(), &CityConfig::new(CityPreset::neon(), 2025));
        assert!(svg.contains(r#"filter="url(#neon-glow)""#));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn empty_calendar_renders_bare_canvas() {
        let svg = render_city(&[], &CityConfig::new(CityPreset::neon(), 2025));

        assert_eq!(svg.matches("<polygon").count(), 0);
        assert!(svg.contains(r#"width="267" height="471""#));
    }

    #[test]
    fn output_is_byte_identical_between_runs() {
        let config = CityConfig::new(CityPreset::mono(), 2025);
        let days = days();
        assert_eq!(render_city(&days, &config), render_city(&days, &config));
    }
}
