//! Explicit, immutable styling passed into every render call.
//!
//! Nothing here is global: a figure owns its `StyleConfig` and hands a
//! reference to the composition engine, which hands it to each renderer.

use serde::Serialize;

use crate::{Error, Result};

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || Error::ConfigError(format!("invalid hex color '{}'", hex));
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad());
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a,
        })
    }

    /// Same color with its alpha scaled by `alpha` in [0, 1].
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (self.a as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Weight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slant {
    Upright,
    Italic,
}

/// Style of one text run; `size` is in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f64,
    pub weight: Weight,
    pub slant: Slant,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            weight: Weight::Normal,
            slant: Slant::Upright,
            color: Color::BLACK,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = Weight::Bold;
        self
    }

    pub fn italic(mut self) -> Self {
        self.slant = Slant::Italic;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A text style resolved to pixels for one canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub px: f64,
    pub weight: Weight,
    pub slant: Slant,
    pub color: Color,
}

impl Font {
    pub fn is_bold(&self) -> bool {
        self.weight == Weight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.slant == Slant::Italic
    }
}

/// Structural edges of a plot frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Spine {
    Left,
    Bottom,
    Top,
    Right,
}

impl Spine {
    /// Every spine, in draw order.
    pub const ALL: [Spine; 4] = [Spine::Left, Spine::Bottom, Spine::Top, Spine::Right];
}

/// Style attributes applied to every spine in `spines`; spines outside the set are hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpineRule {
    pub spines: Vec<Spine>,
    pub width: f64,
    pub color: Color,
}

impl SpineRule {
    pub fn all(width: f64, color: Color) -> Self {
        Self {
            spines: Spine::ALL.to_vec(),
            width,
            color,
        }
    }

    /// Only the left and bottom spines.
    pub fn open(width: f64, color: Color) -> Self {
        Self {
            spines: vec![Spine::Left, Spine::Bottom],
            width,
            color,
        }
    }

    pub fn applies_to(&self, spine: Spine) -> bool {
        self.spines.contains(&spine)
    }
}

/// Per-figure styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleConfig {
    /// Name of the font family requested for the figure. Glyphs come from the
    /// built-in bitmap face; the name is carried for display lists and logs.
    pub font_family: String,
    /// Pixels per inch
    pub dpi: f64,
    pub background: Color,
    pub axes_background: Color,
    pub foreground: Color,
    pub grid_color: Color,
    pub spines: SpineRule,
    /// Outer padding around the row stack, in inches
    pub padding: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            dpi: 100.0,
            background: Color::WHITE,
            axes_background: Color::WHITE,
            foreground: Color::BLACK,
            grid_color: Color::LIGHT_GRAY,
            spines: SpineRule::all(1.0, Color::BLACK),
            padding: 0.2,
        }
    }
}

impl StyleConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::ConfigError(format!("dpi must be positive, got {}", self.dpi)));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(Error::ConfigError(format!(
                "padding must be non-negative, got {}",
                self.padding
            )));
        }
        if self.font_family.trim().is_empty() {
            return Err(Error::ConfigError("font family must not be empty".into()));
        }
        Ok(())
    }

    /// Convert a point size to pixels at this style's dpi.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    pub fn font(&self, text: &TextStyle) -> Font {
        Font {
            px: self.points_to_px(text.size),
            weight: text.weight,
            slant: text.slant,
            color: text.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(Color::from_hex("#800000").unwrap(), Color::rgb(128, 0, 0));
        assert_eq!(Color::from_hex("FFCCCC80").unwrap().a, 128);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn open_spine_rule_hides_top_and_right() {
        let rule = SpineRule::open(1.5, Color::BLACK);
        let shown: Vec<_> = Spine::ALL.iter().filter(|s| rule.applies_to(**s)).collect();
        assert_eq!(shown, vec![&Spine::Left, &Spine::Bottom]);
    }

    #[test]
    fn default_style_is_valid() {
        let s = StyleConfig::default();
        s.validate().unwrap();
        assert_eq!(s.points_to_px(72.0), 100.0);
        let bad = StyleConfig { dpi: 0.0, ..StyleConfig::default() };
        assert!(bad.validate().unwrap_err().is_config());
    }
}
