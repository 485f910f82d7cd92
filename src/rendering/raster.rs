/// Raster canvas implementing the drawing backend on a `tiny_skia` pixmap

use tiny_skia as sk;

use crate::rendering::glyphs::{self, Mask as GlyphMask};
use crate::rendering::layout::{Point, Rect, RectF};
use crate::rendering::paint::{anchored_origin, Anchor, Backend, CellStyle, Stroke};
use crate::style::{Color, Font};
use crate::{Error, Result};

/// Pixel surface for one figure. Every row is drawn through an optional clip mask.
#[derive(Debug)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pixmap: sk::Pixmap,
    blank: sk::PremultipliedColorU8,
    clip: Option<sk::Mask>,
}

fn paint(color: Color, anti_alias: bool) -> sk::Paint<'static> {
    let mut p = sk::Paint::default();
    p.set_color_rgba8(color.r, color.g, color.b, color.a);
    p.anti_alias = anti_alias;
    p
}

fn straight(p: sk::PremultipliedColorU8) -> Color {
    let c = p.demultiply();
    Color {
        r: c.red(),
        g: c.green(),
        b: c.blue(),
        a: c.alpha(),
    }
}

/// Path covering the ink of `mask`, one rectangle per horizontal run.
fn glyph_path(mask: &GlyphMask) -> Option<sk::Path> {
    let mut pb = sk::PathBuilder::new();
    for y in 0..mask.height {
        let mut x = 0;
        while x < mask.width {
            if !mask.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < mask.width && mask.get(x, y) {
                x += 1;
            }
            if let Some(r) = sk::Rect::from_xywh(start as f32, y as f32, (x - start) as f32, 1.0) {
                pb.push_rect(r);
            }
        }
    }
    pb.finish()
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        let mut pixmap = sk::Pixmap::new(width, height)
            .ok_or_else(|| Error::RenderError(format!("cannot allocate a {}x{} canvas", width, height)))?;
        pixmap.fill(sk::Color::from_rgba8(background.r, background.g, background.b, background.a));
        let blank = pixmap.pixels()[0];
        Ok(Self {
            width,
            height,
            background,
            pixmap,
            blank,
            clip: None,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap.pixel(x, y).map(straight)
    }

    /// Smallest rectangle containing every pixel that differs from the background.
    pub fn content_bounds(&self) -> Option<Rect> {
        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
        let mut any = false;
        for (i, p) in self.pixmap.pixels().iter().enumerate() {
            if *p == self.blank {
                continue;
            }
            let (x, y) = (i as u32 % self.width, i as u32 / self.width);
            any = true;
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        any.then(|| Rect {
            x: x0 as i32,
            y: y0 as i32,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }

    /// Straight RGBA copy of the pixels inside `rect`, clamped to the canvas.
    pub fn crop(&self, rect: Rect) -> Result<(u32, u32, Vec<u8>)> {
        let full = Rect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        };
        let area = rect
            .intersect(&full)
            .ok_or_else(|| Error::RenderError(format!("crop {:?} misses the canvas", rect)))?;
        let cropped = sk::IntRect::from_xywh(area.x, area.y, area.width, area.height)
            .and_then(|r| self.pixmap.clone_rect(r))
            .ok_or_else(|| Error::RenderError(format!("cannot crop canvas to {:?}", area)))?;
        let mut rgba = Vec::with_capacity(cropped.pixels().len() * 4);
        for p in cropped.pixels() {
            let c = straight(*p);
            rgba.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        Ok((cropped.width(), cropped.height(), rgba))
    }

    fn bounds(&self) -> RectF {
        RectF {
            x: 0.0,
            y: 0.0,
            w: self.width as f64,
            h: self.height as f64,
        }
    }
}

impl Backend for Canvas {
    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip.and_then(|r| {
            let mut mask = sk::Mask::new(self.width, self.height)?;
            let rect = sk::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32)?;
            mask.fill_path(
                &sk::PathBuilder::from_rect(rect),
                sk::FillRule::Winding,
                false,
                sk::Transform::identity(),
            );
            Some(mask)
        });
    }

    fn fill_rect(&mut self, rect: RectF, color: Color) {
        // only the part on the canvas is ever painted
        let Some(visible) = rect.intersect(&self.bounds()) else {
            return;
        };
        let x0 = visible.x.round();
        let y0 = visible.y.round();
        let w = visible.right().round() - x0;
        let h = visible.bottom().round() - y0;
        if let Some(r) = sk::Rect::from_xywh(x0 as f32, y0 as f32, w as f32, h as f32) {
            self.pixmap
                .fill_rect(r, &paint(color, false), sk::Transform::identity(), self.clip.as_ref());
        }
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let mut pb = sk::PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };
        let mut style = sk::Stroke {
            width: stroke.width.max(1.0) as f32,
            ..sk::Stroke::default()
        };
        if let Some((on, off)) = stroke.dash {
            style.dash = sk::StrokeDash::new(vec![on as f32, off as f32], 0.0);
        }
        self.pixmap.stroke_path(
            &path,
            &paint(stroke.color, true),
            &style,
            sk::Transform::identity(),
            self.clip.as_ref(),
        );
    }

    fn marker(&mut self, center: Point, radius: f64, fill: Color, edge: Option<&Stroke>) {
        let Some(circle) = sk::PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) else {
            return;
        };
        self.pixmap.fill_path(
            &circle,
            &paint(fill, true),
            sk::FillRule::Winding,
            sk::Transform::identity(),
            self.clip.as_ref(),
        );
        if let Some(e) = edge {
            let style = sk::Stroke {
                width: e.width as f32,
                ..sk::Stroke::default()
            };
            self.pixmap.stroke_path(
                &circle,
                &paint(e.color, true),
                &style,
                sk::Transform::identity(),
                self.clip.as_ref(),
            );
        }
    }

    fn text(&mut self, at: Point, text: &str, font: &Font, anchor: Anchor, rotation: f64) {
        let mask = glyphs::rasterize(text, font);
        let Some(path) = glyph_path(&mask) else {
            return;
        };
        let origin = anchored_origin(Point::new(0.0, 0.0), mask.width as f64, mask.height as f64, anchor);

        // Screen y points down, so a counter-clockwise turn is a negative angle.
        let (transform, anti_alias) = if rotation == 0.0 {
            let x = (at.x + origin.x).round() as f32;
            let y = (at.y + origin.y).round() as f32;
            (sk::Transform::from_translate(x, y), false)
        } else {
            let t = sk::Transform::from_translate(at.x as f32, at.y as f32)
                .pre_concat(sk::Transform::from_rotate(-rotation as f32))
                .pre_concat(sk::Transform::from_translate(origin.x as f32, origin.y as f32));
            (t, true)
        };
        self.pixmap.fill_path(
            &path,
            &paint(font.color, anti_alias),
            sk::FillRule::Winding,
            transform,
            self.clip.as_ref(),
        );
    }

    fn cell(&mut self, rect: RectF, text: &str, style: &CellStyle) {
        self.fill_rect(rect, style.fill);
        if let Some(edge) = &style.edge {
            self.stroke_rect(rect, edge);
        }
        self.text(rect.center(), text, &style.font, Anchor::CENTER, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Slant, Weight};

    fn dark(c: Option<Color>) -> bool {
        c.map(|c| (c.r as u32 + c.g as u32 + c.b as u32) < 200).unwrap_or(false)
    }

    #[test]
    fn clip_confines_drawing() {
        let mut c = Canvas::new(20, 20, Color::WHITE).unwrap();
        c.set_clip(Some(Rect { x: 0, y: 0, width: 10, height: 10 }));
        c.fill_rect(RectF { x: 0.0, y: 0.0, w: 20.0, h: 20.0 }, Color::BLACK);
        c.set_clip(None);
        assert_eq!(c.pixel(5, 5), Some(Color::BLACK));
        assert_eq!(c.pixel(15, 15), Some(Color::WHITE));
        assert_eq!(
            c.content_bounds(),
            Some(Rect { x: 0, y: 0, width: 10, height: 10 })
        );
    }

    #[test]
    fn alpha_blends_over_background() {
        let mut c = Canvas::new(4, 4, Color::WHITE).unwrap();
        c.fill_rect(RectF { x: 0.0, y: 0.0, w: 4.0, h: 4.0 }, Color::RED.with_alpha(0.5));
        let p = c.pixel(1, 1).unwrap();
        assert_eq!(p.r, 255);
        assert!(p.g > 120 && p.g < 135);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn huge_rect_only_paints_the_canvas() {
        let mut c = Canvas::new(30, 30, Color::WHITE).unwrap();
        c.fill_rect(RectF { x: 10.0, y: -1.0e12, w: 5.0, h: 2.0e12 }, Color::BLACK);
        assert_eq!(c.pixel(12, 0), Some(Color::BLACK));
        assert_eq!(c.pixel(12, 29), Some(Color::BLACK));
        assert_eq!(c.pixel(20, 15), Some(Color::WHITE));
    }

    #[test]
    fn marker_edge_and_fill() {
        let mut c = Canvas::new(40, 40, Color::WHITE).unwrap();
        let edge = Stroke::solid(Color::BLACK, 2.0);
        c.marker(Point::new(20.0, 20.0), 10.0, Color::RED, Some(&edge));
        assert_eq!(c.pixel(20, 20), Some(Color::RED));
        assert!(dark(c.pixel(29, 20)));
        assert_eq!(c.pixel(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn dashed_lines_leave_gaps() {
        let mut c = Canvas::new(60, 5, Color::WHITE).unwrap();
        c.line(
            Point::new(0.0, 2.5),
            Point::new(60.0, 2.5),
            &Stroke::dashed(Color::BLACK, 1.0),
        );
        let row: Vec<_> = (0..60).map(|x| c.pixel(x, 2)).collect();
        assert!(row.iter().any(|p| dark(*p)));
        assert!(row.contains(&Some(Color::WHITE)));
    }

    #[test]
    fn rotated_text_is_taller_than_wide() {
        let font = Font { px: 14.0, weight: Weight::Normal, slant: Slant::Upright, color: Color::BLACK };
        let mut c = Canvas::new(100, 100, Color::WHITE).unwrap();
        c.text(Point::new(50.0, 50.0), "Events", &font, Anchor::CENTER, 90.0);
        let b = c.content_bounds().unwrap();
        assert!(b.height > b.width);
    }

    #[test]
    fn crop_returns_straight_rgba() {
        let mut c = Canvas::new(10, 10, Color::WHITE).unwrap();
        c.fill_rect(RectF { x: 2.0, y: 2.0, w: 2.0, h: 2.0 }, Color::RED);
        let (w, h, rgba) = c.crop(Rect { x: 2, y: 2, width: 4, height: 3 }).unwrap();
        assert_eq!((w, h), (4, 3));
        assert_eq!(&rgba[0..4], &[255, 0, 0, 255]);
        assert_eq!(&rgba[8..12], &[255, 255, 255, 255]);
    }
}
