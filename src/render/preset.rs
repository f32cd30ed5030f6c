//! Named looks for the contribution city. A preset bundles every visual constant the city
//! renderer needs, so two renders with different presets never share state.

use std::fmt::Display;

use clap::ValueEnum;

use super::color::Rgb;

/// How strongly busy buildings glow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowStyle {
    /// No filters at all.
    None,
    /// Only the soft glow is used, for every building above the soft threshold.
    Soft,
    /// Soft glow for medium days, strong glow for the busiest ones.
    Neon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glow {
    Soft,
    Strong,
}

impl Glow {
    pub fn filter_id(&self) -> &'static str {
        match self {
            Glow::Soft => "soft-glow",
            Glow::Strong => "neon-glow",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityPreset {
    pub name: &'static str,
    /// Index 0 is the empty ground, 1..=5 are increasingly busy days.
    pub palette: [Rgb; 6],
    pub exponent: f64,
    pub glow: GlowStyle,
    pub strong_glow_color: Rgb,
    pub soft_glow_color: Rgb,
    pub background: (Rgb, Rgb),
    pub ground_stroke: Rgb,
    pub text: Rgb,
    pub accent: Rgb,
    pub accent_label: &'static str,
    /// Draws lit windows up the side of tall buildings.
    pub leds: Option<Rgb>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum PresetName {
    #[default]
    Neon,
    Classic,
    Mono,
}

impl Display for PresetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetName::Neon => write!(f, "neon"),
            PresetName::Classic => write!(f, "classic"),
            PresetName::Mono => write!(f, "mono"),
        }
    }
}

impl From<PresetName> for CityPreset {
    fn from(value: PresetName) -> Self {
        match value {
            PresetName::Neon => CityPreset::neon(),
            PresetName::Classic => CityPreset::classic(),
            PresetName::Mono => CityPreset::mono(),
        }
    }
}

impl CityPreset {
    pub fn neon() -> Self {
        Self {
            name: "neon",
            palette: [
                Rgb::new(0x16, 0x1b, 0x22),
                Rgb::new(0x2e, 0x10, 0x65),
                Rgb::new(0x7c, 0x3a, 0xed),
                Rgb::new(0xc0, 0x26, 0xd3),
                Rgb::new(0x22, 0xd3, 0xee),
                Rgb::new(0xff, 0xff, 0xff),
            ],
            exponent: 1.3,
            glow: GlowStyle::Neon,
            strong_glow_color: Rgb::new(0x22, 0xd3, 0xee),
            soft_glow_color: Rgb::new(0xc0, 0x26, 0xd3),
            background: (Rgb::new(0x0f, 0x17, 0x2a), Rgb::new(0x1e, 0x1b, 0x4b)),
            ground_stroke: Rgb::new(0x23, 0x2a, 0x3b),
            text: Rgb::new(0x94, 0xa3, 0xb8),
            accent: Rgb::new(0x7c, 0x3a, 0xed),
            accent_label: "Engineering Mode",
            leds: Some(Rgb::new(0x22, 0xd3, 0xee)),
        }
    }

    pub fn classic() -> Self {
        Self {
            name: "classic",
            palette: [
                Rgb::new(0xeb, 0xed, 0xf0),
                Rgb::new(0x9b, 0xe9, 0xa8),
                Rgb::new(0x40, 0xc4, 0x63),
                Rgb::new(0x30, 0xa1, 0x4e),
                Rgb::new(0x21, 0x6e, 0x39),
                Rgb::new(0x0e, 0x44, 0x29),
            ],
            exponent: 1.5,
            glow: GlowStyle::None,
            strong_glow_color: Rgb::new(0x40, 0xc4, 0x63),
            soft_glow_color: Rgb::new(0x9b, 0xe9, 0xa8),
            background: (Rgb::new(0xff, 0xff, 0xff), Rgb::new(0xf6, 0xf8, 0xfa)),
            ground_stroke: Rgb::new(0xd0, 0xd7, 0xde),
            text: Rgb::new(0x57, 0x60, 0x6a),
            accent: Rgb::new(0x21, 0x6e, 0x39),
            accent_label: "Contribution Graph",
            leds: None,
        }
    }

    pub fn mono() -> Self {
        Self {
            name: "mono",
            palette: [
                Rgb::new(0x1c, 0x1c, 0x1c),
                Rgb::new(0x3a, 0x3a, 0x3a),
                Rgb::new(0x5e, 0x5e, 0x5e),
                Rgb::new(0x8a, 0x8a, 0x8a),
                Rgb::new(0xbd, 0xbd, 0xbd),
                Rgb::new(0xf5, 0xf5, 0xf5),
            ],
            exponent: 1.3,
            glow: GlowStyle::Soft,
            strong_glow_color: Rgb::new(0xff, 0xff, 0xff),
            soft_glow_color: Rgb::new(0xdd, 0xdd, 0xdd),
            background: (Rgb::new(0x0a, 0x0a, 0x0a), Rgb::new(0x1f, 0x1f, 0x1f)),
            ground_stroke: Rgb::new(0x2e, 0x2e, 0x2e),
            text: Rgb::new(0x9e, 0x9e, 0x9e),
            accent: Rgb::new(0xf5, 0xf5, 0xf5),
            accent_label: "Monochrome",
            leds: None,
        }
    }

    /// Severity band of a day. `0` only for days without contributions, then bands by the share
    /// of the busiest day. Never decreases as `count` grows.
    pub fn band(&self, count: u32, max_count: u32) -> usize {
        if count == 0 {
            return 0;
        }
        let ratio = count as f64 / max_count.max(1) as f64;
        if ratio < 0.2 {
            1
        } else if ratio < 0.4 {
            2
        } else if ratio < 0.7 {
            3
        } else if ratio < 0.9 {
            4
        } else {
            5
        }
    }

    pub fn color_for(&self, count: u32, max_count: u32) -> Rgb {
        self.palette[self.band(count, max_count)]
    }

    pub fn glow_for(&self, count: u32, max_count: u32) -> Option<Glow> {
        let ratio = count as f64 / max_count.max(1) as f64;
        match self.glow {
            GlowStyle::None => None,
            GlowStyle::Neon if ratio > 0.6 => Some(Glow::Strong),
            GlowStyle::Neon | GlowStyle::Soft if ratio > 0.3 => Some(Glow::Soft),
            GlowStyle::Neon | GlowStyle::Soft => None,
        }
    }
}
