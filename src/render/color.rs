use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Result};

/// An opaque sRGB color as used in SVG attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales every channel by `(100 + percent) / 100`, rounding and clamping to a valid channel.
    /// Negative values darken, positive values brighten.
    pub fn shade(self, percent: f64) -> Self {
        let scale = |channel: u8| -> u8 {
            (channel as f64 * (100. + percent) / 100.)
                .round()
                .clamp(0., 255.) as u8
        };
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Accepts `#rrggbb` and `#rrggbbaa`. Alpha is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(anyhow!("Can't parse {s} into a color"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| anyhow!("Can't parse {s} into a color: {e}"))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::Rgb;

    #[test]
    fn parses_and_prints_lowercase_hex() -> Result<()> {
        let color: Rgb = "#7C3AED".parse()?;
        assert_eq!(color, Rgb::new(0x7c, 0x3a, 0xed));
        assert_eq!(color.to_string(), "#7c3aed");
        Ok(())
    }

    #[test]
    fn alpha_suffix_is_ignored() -> Result<()> {
        assert_eq!("#051900ff".parse::<Rgb>()?, Rgb::new(0x05, 0x19, 0x00));
        Ok(())
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn shade_darkens_and_brightens_with_clamping() {
        let color = Rgb::new(200, 100, 0);
        assert_eq!(color.shade(-45.), Rgb::new(110, 55, 0));
        assert_eq!(color.shade(40.), Rgb::new(255, 140, 0));
        assert_eq!(color.shade(0.), color);
        assert_eq!(color.shade(-200.), Rgb::new(0, 0, 0));
    }

    #[test]
    fn shade_matches_known_palette_values() -> Result<()> {
        // cyan wall shades used by the neon preset
        let cyan: Rgb = "#22d3ee".parse()?;
        assert_eq!(cyan.shade(-20.).to_string(), "#1ba9be");
        Ok(())
    }
}
