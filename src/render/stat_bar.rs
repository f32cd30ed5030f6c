//! Language bar card.

use std::fmt::Write;

use tracing::instrument;

use crate::stats::LanguageShare;

use super::{
    color::Rgb,
    svg::{escape_text, FONT_STYLE, XML_PROLOG},
};

pub const DEFAULT_TITLE: &str = "Tech Stack & Languages";

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: f64,
    pub min_height: f64,
    pub padding: f64,
    pub bar_height: f64,
    /// Vertical distance between rows.
    pub bar_gap: f64,
    /// Room reserved for language names left of the bars.
    pub label_width: f64,
    /// Spacing of the numbers in the rolling percent counter.
    pub counter_line_height: f64,
    pub animation_seconds: f64,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            width: 450.,
            min_height: 220.,
            padding: 20.,
            bar_height: 12.,
            bar_gap: 25.,
            label_width: 100.,
            counter_line_height: 10.,
            animation_seconds: 5.,
        }
    }
}

impl CardLayout {
    fn first_row(&self) -> f64 {
        self.padding + 40.
    }

    fn track_x(&self) -> f64 {
        self.padding + self.label_width
    }

    /// Width of a bar at 100%.
    fn track_width(&self) -> f64 {
        self.width - self.padding * 4. - self.label_width
    }

    fn height_for(&self, rows: usize) -> f64 {
        let last_row = self.first_row() + rows.saturating_sub(1) as f64 * self.bar_gap;
        (last_row + self.bar_height / 2. + self.padding).max(self.min_height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardTheme {
    pub background: (Rgb, Rgb),
    pub border: Rgb,
    pub title: Rgb,
    pub text_primary: Rgb,
    pub text_secondary: Rgb,
    pub track: Rgb,
    /// Cycled by row.
    pub bars: Vec<Rgb>,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            background: (Rgb::new(0x0d, 0x00, 0x19), Rgb::new(0x1a, 0x10, 0x3c)),
            border: Rgb::new(0x9e, 0x3d, 0xff),
            title: Rgb::new(0x9e, 0x3d, 0xff),
            text_primary: Rgb::new(0xe2, 0xe8, 0xf0),
            text_secondary: Rgb::new(0x94, 0xa3, 0xb8),
            track: Rgb::new(0x1e, 0x1b, 0x4b),
            bars: vec![
                Rgb::new(0x9e, 0x3d, 0xff),
                Rgb::new(0x8a, 0x2b, 0xe2),
                Rgb::new(0x7c, 0x3a, 0xed),
                Rgb::new(0x6d, 0x28, 0xd9),
                Rgb::new(0x4c, 0x1d, 0x95),
                Rgb::new(0x22, 0xd3, 0xee),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCardConfig {
    pub layout: CardLayout,
    pub theme: CardTheme,
    pub title: String,
    pub animate: bool,
}

impl Default for StatCardConfig {
    fn default() -> Self {
        Self {
            layout: CardLayout::default(),
            theme: CardTheme::default(),
            title: DEFAULT_TITLE.into(),
            animate: true,
        }
    }
}

/// Renders the language card. An empty `shares` slice produces a card saying there is nothing
/// to show.
#[instrument(skip_all, fields(languages = shares.len()))]
pub fn render_stat_card(shares: &[LanguageShare], config: &StatCardConfig) -> String {
    let layout = &config.layout;
    let theme = &config.theme;
    let height = layout.height_for(shares.len());

    let mut defs = String::new();
    let mut rows = String::new();

    if shares.is_empty() {
        let _ = writeln!(
            rows,
            r#"  <text x="{}" y="{}" fill="{}" font-size="14" dominant-baseline="middle">No language data</text>"#,
            layout.padding,
            layout.first_row(),
            theme.text_secondary
        );
    }

    for (index, share) in shares.iter().enumerate() {
        let y = layout.first_row() + index as f64 * layout.bar_gap;
        write_row(&mut rows, &mut defs, index, y, share, config);
    }

    let mut svg = String::new();
    let _ = writeln!(svg, "{XML_PROLOG}");
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = layout.width,
        h = height
    );
    let (from, to) = theme.background;
    let _ = writeln!(
        svg,
        r#"  <defs>
    <filter id="neon-glow" x="-600%" y="-100%" width="1000%" height="300%">
      <feGaussianBlur in="SourceGraphic" stdDeviation="5" result="blur"/>
      <feMerge>
        <feMergeNode in="blur"/>
        <feMergeNode in="SourceGraphic"/>
      </feMerge>
    </filter>
    <style>text {{ {FONT_STYLE} }}</style>
    <linearGradient id="card-bg" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="{from}"/>
      <stop offset="100%" stop-color="{to}"/>
    </linearGradient>
{defs}  </defs>"#
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="url(#card-bg)" rx="10" ry="10" stroke="{}" stroke-width="2" stroke-opacity="0.3"/>"#,
        theme.border
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" fill="{}" font-size="18" font-weight="bold">{}</text>"#,
        layout.padding,
        layout.padding + 15.,
        theme.title,
        escape_text(&config.title)
    );
    svg.push_str(&rows);
    let _ = writeln!(svg, "</svg>");
    svg
}

fn write_row(
    rows: &mut String,
    defs: &mut String,
    index: usize,
    y: f64,
    share: &LanguageShare,
    config: &StatCardConfig,
) {
    let layout = &config.layout;
    let theme = &config.theme;
    let label_color = share
        .color
        .as_deref()
        .and_then(|c| c.parse::<Rgb>().ok())
        .unwrap_or(theme.text_primary);
    let bar_color = theme
        .bars
        .get(index % theme.bars.len().max(1))
        .copied()
        .unwrap_or(theme.text_primary);
    let bar_width = layout.track_width() * share.percent.fraction();
    let bar_y = y - layout.bar_height / 2.;

    let _ = writeln!(
        rows,
        r#"  <text x="{}" y="{y}" fill="{label_color}" font-size="14" font-weight="600" dominant-baseline="middle">{}</text>"#,
        layout.padding,
        escape_text(&share.name)
    );
    let _ = writeln!(
        rows,
        r#"  <rect x="{}" y="{bar_y}" width="{}" height="{}" fill="{}" rx="4" ry="4"/>"#,
        layout.track_x(),
        layout.track_width(),
        layout.bar_height,
        theme.track
    );

    if !config.animate {
        let _ = writeln!(
            rows,
            r#"  <rect x="{}" y="{bar_y}" width="{bar_width:.2}" height="{}" fill="{bar_color}" rx="4" ry="4" filter="url(#neon-glow)"/>"#,
            layout.track_x(),
            layout.bar_height
        );
        let _ = writeln!(
            rows,
            r#"  <text x="{}" y="{y}" fill="{}" font-size="12" font-weight="bold" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            layout.width - layout.padding,
            theme.text_secondary,
            share.percent
        );
        return;
    }

    let easing = r#"calcMode="spline" keyTimes="0;1" keySplines="0.4 0 0.2 1""#;
    let seconds = layout.animation_seconds;
    let _ = writeln!(
        rows,
        r#"  <rect x="{}" y="{bar_y}" width="{bar_width:.2}" height="{}" fill="{bar_color}" rx="4" ry="4" filter="url(#neon-glow)">
    <animate attributeName="width" from="0" to="{bar_width:.2}" dur="{seconds}s" fill="freeze" {easing}/>
  </rect>"#,
        layout.track_x(),
        layout.bar_height
    );

    // The counter is a column of numbers sliding up behind a one-line window.
    let window_id = format!("lang-{index}-window");
    let line = layout.counter_line_height;
    let _ = writeln!(
        defs,
        r#"    <clipPath id="{window_id}">
      <rect x="{}" y="{}" width="29.5" height="{line}"/>
    </clipPath>"#,
        layout.width - layout.padding - 40.,
        y - 6.
    );

    let steps = counter_steps(*share.percent);
    let numbers = steps
        .iter()
        .enumerate()
        .map(|(i, value)| {
            format!(
                r#"<text x="0" y="{}" fill="{}" font-size="12" font-weight="bold" text-anchor="end" dominant-baseline="middle">{value:.1}</text>"#,
                i as f64 * line,
                theme.text_secondary
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");
    let travel = (steps.len() - 1) as f64 * line;

    let _ = writeln!(
        rows,
        r#"  <g clip-path="url(#{window_id})">
    <g transform="translate({}, {y})">
      <g>
        {numbers}
        <animateTransform attributeName="transform" type="translate" from="0 0" to="0 -{travel}" dur="{seconds}s" fill="freeze" {easing}/>
      </g>
    </g>
  </g>
  <text x="{}" y="{y}" fill="{}" font-size="12" font-weight="bold" text-anchor="end" dominant-baseline="middle">%</text>"#,
        layout.width - layout.padding - 10.,
        layout.width - layout.padding,
        theme.text_secondary
    );
}

/// Values shown by the rolling counter: every second whole percent below the final value,
/// then the final value itself. Never empty.
fn counter_steps(percent: f64) -> Vec<f64> {
    let mut steps = (0..percent.floor().max(0.) as u32)
        .step_by(2)
        .map(f64::from)
        .collect::<Vec<_>>();
    steps.push(percent);
    steps
}

#[cfg(test)]
mod tests {
    use crate::{stats::LanguageShare, utils::percentage::Percentage};

    use super::{counter_steps, render_stat_card, CardLayout, StatCardConfig};

    fn share(name: &str, bytes: u64, percent: f64, color: Option<&str>) -> LanguageShare {
        LanguageShare {
            name: name.into(),
            total_bytes: bytes,
            percent: Percentage::new_opt(percent).unwrap(),
            color: color.map(Into::into),
        }
    }

    fn shares() -> Vec<LanguageShare> {
        vec![
            share("Rust", 700, 70., Some("#dea584")),
            share("C++", 200, 20., None),
            share("<script>", 100, 10., Some("not a color")),
        ]
    }

    #[test]
    fn counter_counts_up_in_twos() {
        assert_eq!(counter_steps(5.5), vec![0., 2., 4., 5.5]);
        assert_eq!(counter_steps(0.4), vec![0.4]);
        let expected = (0..50)
            .map(|v| v as f64 * 2.)
            .chain([100.])
            .collect::<Vec<_>>();
        assert_eq!(counter_steps(100.), expected);
    }

    #[test]
    fn card_grows_with_rows() {
        let layout = CardLayout::default();
        assert_eq!(layout.height_for(0), 220.);
        assert_eq!(layout.height_for(6), 220.);
        assert_eq!(layout.height_for(10), 311.);
    }

    #[test]
    fn bars_scale_with_percent() {
        let svg = render_stat_card(&shares(), &StatCardConfig::default());

        // track is 270 wide, Rust holds 70%
        assert!(svg.contains(r#"width="189.00""#));
        assert!(svg.contains(r#"width="54.00""#));
        assert!(svg.contains(r##"fill="#dea584""##));
    }

    #[test]
    fn text_is_escaped() {
        let config = StatCardConfig::default();
        let svg = render_stat_card(&shares(), &config);

        assert!(svg.contains("Tech Stack &amp; Languages"));
        assert!(svg.contains("&lt;script&gt;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn animated_card_has_one_counter_per_language() {
        let svg = render_stat_card(&shares(), &StatCardConfig::default());

        assert_eq!(svg.matches("<clipPath").count(), 3);
        assert_eq!(svg.matches("<animate ").count(), 3);
        assert!(svg.contains(r#"id="lang-1-window""#));
    }

    #[test]
    fn static_card_prints_plain_percentages() {
        let config = StatCardConfig {
            animate: false,
            ..Default::default()
        };
        let svg = render_stat_card(&shares(), &config);

        assert!(!svg.contains("<animate"));
        assert!(!svg.contains("<clipPath"));
        assert!(svg.contains(">70.0%</text>"));
        assert!(svg.contains(">10.0%</text>"));
    }

    #[test]
    fn empty_shares_render_placeholder() {
        let svg = render_stat_card(&[], &StatCardConfig::default());

        assert!(svg.contains("No language data"));
        assert!(svg.contains(r#"height="220""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
