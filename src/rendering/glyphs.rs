/// Bitmap glyph service: text normalization, metrics, and coverage masks.
///
/// Glyphs come from the 8x8 `font8x8` face, stretched to a cell of
/// `ADVANCE * px` by `px` pixels. Bold dilates strokes horizontally, italic
/// shears each row.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use log::warn;

use crate::style::Font;

/// Horizontal advance as a fraction of the pixel size
pub const ADVANCE: f64 = 0.6;
const ITALIC_SHEAR: f64 = 0.2;

/// Replace characters the bitmap face lacks with close ASCII spellings.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2192}' => out.push_str("->"),
            '\u{2265}' => out.push_str(">="),
            '\u{2264}' => out.push_str("<="),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            _ => out.push(c),
        }
    }
    out
}

fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

/// Width and height in pixels of a single line of `text` at `font`.
pub fn measure(text: &str, font: &Font) -> (f64, f64) {
    let chars = normalize(text).chars().count() as f64;
    let mut w = chars * ADVANCE * font.px;
    if font.is_italic() {
        w += ITALIC_SHEAR * font.px;
    }
    (w, font.px)
}

/// Coverage mask of rendered text, row-major, `true` where ink is
#[derive(Debug, Clone)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub bits: Vec<bool>,
}

impl Mask {
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    pub fn ink(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

/// Rasterize one line of text into a coverage mask.
pub fn rasterize(text: &str, font: &Font) -> Mask {
    let text = normalize(text);
    let (w, h) = measure(&text, font);
    let width = w.ceil().max(1.0) as usize;
    let height = h.ceil().max(1.0) as usize;
    let mut bits = vec![false; width * height];

    let cell_w = ADVANCE * font.px;
    let cell_h = font.px;
    let bold = if font.is_bold() {
        (font.px / 12.0).round().max(1.0) as usize
    } else {
        0
    };

    for (i, c) in text.chars().enumerate() {
        let rows = match glyph(c) {
            Some(rows) => rows,
            None => {
                warn!("glyph for {:?} missing from bitmap face; substituting '?'", c);
                glyph('?').unwrap_or([0; 8])
            }
        };
        let x0 = i as f64 * cell_w;
        for py in 0..height {
            let row = ((py as f64 + 0.5) * 8.0 / cell_h) as usize;
            if row >= 8 {
                continue;
            }
            let shear = if font.is_italic() {
                (cell_h - py as f64) * ITALIC_SHEAR
            } else {
                0.0
            };
            let start = (x0 + shear).floor() as usize;
            let end = ((x0 + shear + cell_w).ceil() as usize).min(width);
            for px in start..end {
                let u = px as f64 + 0.5 - x0 - shear;
                if u < 0.0 {
                    continue;
                }
                let col = (u * 8.0 / cell_w) as usize;
                if col >= 8 || rows[row] & (1 << col) == 0 {
                    continue;
                }
                for dx in 0..=bold {
                    let x = px + dx;
                    if x < width {
                        bits[py * width + x] = true;
                    }
                }
            }
        }
    }

    Mask {
        width,
        height,
        bits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, Slant, Weight};

    fn font(px: f64) -> Font {
        Font {
            px,
            weight: Weight::Normal,
            slant: Slant::Upright,
            color: Color::BLACK,
        }
    }

    #[test]
    fn normalize_spells_out_missing_symbols() {
        assert_eq!(normalize("2010\u{2013}22"), "2010-22");
        assert_eq!(normalize("risk \u{2192} illness"), "risk -> illness");
        assert_eq!(normalize("\u{2265} 95 \u{b0}F"), ">= 95 \u{b0}F");
    }

    #[test]
    fn measure_scales_with_length() {
        let f = font(10.0);
        let (w1, h) = measure("ab", &f);
        let (w2, _) = measure("abcd", &f);
        assert_eq!(h, 10.0);
        assert!((w2 - 2.0 * w1).abs() < 1e-9);
    }

    #[test]
    fn bold_adds_ink() {
        let regular = rasterize("HVI", &font(16.0));
        let bold = rasterize(
            "HVI",
            &Font {
                weight: Weight::Bold,
                ..font(16.0)
            },
        );
        assert!(regular.ink() > 0);
        assert!(bold.ink() > regular.ink());
        assert_eq!(rasterize("   ", &font(16.0)).ink(), 0);
    }
}
