/// Drawing primitives shared by every backend, and a recording backend
///
/// Region renderers only ever talk to a `Backend`. The raster canvas paints
/// pixels; `DisplayList` records the same calls as `PaintCommand`s so tests
/// and `--display-list` can inspect exactly what was drawn, in order.

use serde::Serialize;

use crate::rendering::glyphs;
use crate::rendering::layout::{Point, Rect, RectF};
use crate::style::{Color, Font};

/// Line styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// `(on, off)` dash lengths in pixels
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((4.0 * width.max(1.0), 2.0 * width.max(1.0))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Which point of the text's box sits on the anchor coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub h: HAlign,
    pub v: VAlign,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor {
        h: HAlign::Center,
        v: VAlign::Middle,
    };

    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }
}

/// A table cell: background, optional edge, centered text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellStyle {
    pub fill: Color,
    pub font: Font,
    pub edge: Option<Stroke>,
}

/// Primitive drawing contract implemented by every rendering backend.
///
/// Coordinates are canvas pixels, origin top-left, y down. A backend must
/// discard anything outside the active clip.
pub trait Backend {
    /// Restrict subsequent drawing to `clip` (or lift the restriction).
    fn set_clip(&mut self, clip: Option<Rect>);

    fn fill_rect(&mut self, rect: RectF, color: Color);

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// A filled circle with an optional edge.
    fn marker(&mut self, center: Point, radius: f64, fill: Color, edge: Option<&Stroke>);

    /// One line of text, anchored at `at`, rotated counter-clockwise by `rotation` degrees.
    fn text(&mut self, at: Point, text: &str, font: &Font, anchor: Anchor, rotation: f64);

    fn cell(&mut self, rect: RectF, text: &str, style: &CellStyle);

    /// Font metrics service: width and height of `text` set in `font`.
    fn measure_text(&self, text: &str, font: &Font) -> (f64, f64) {
        glyphs::measure(text, font)
    }

    /// Outline of a rectangle, drawn as four lines.
    fn stroke_rect(&mut self, rect: RectF, stroke: &Stroke) {
        let tl = Point::new(rect.x, rect.y);
        let tr = Point::new(rect.right(), rect.y);
        let br = Point::new(rect.right(), rect.bottom());
        let bl = Point::new(rect.x, rect.bottom());
        for (a, b) in [(tl, tr), (tr, br), (br, bl), (bl, tl)] {
            self.line(a, b, stroke);
        }
    }
}

/// Top-left corner of a `w`x`h` box placed at `at` with `anchor`.
pub fn anchored_origin(at: Point, w: f64, h: f64, anchor: Anchor) -> Point {
    let x = match anchor.h {
        HAlign::Left => at.x,
        HAlign::Center => at.x - w / 2.0,
        HAlign::Right => at.x - w,
    };
    let y = match anchor.v {
        VAlign::Top => at.y,
        VAlign::Middle => at.y - h / 2.0,
        VAlign::Bottom => at.y - h,
    };
    Point::new(x, y)
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintCommand {
    Clip {
        rect: Option<Rect>,
    },
    SolidRect {
        rect: RectF,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Marker {
        center: Point,
        radius: f64,
        fill: Color,
        edge: Option<Stroke>,
    },
    Text {
        at: Point,
        text: String,
        font: Font,
        anchor: Anchor,
        rotation: f64,
    },
    Cell {
        rect: RectF,
        text: String,
        style: CellStyle,
    },
}

/// Backend that records every call instead of painting
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    pub commands: Vec<PaintCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands issued while `clip` was active, in order.
    pub fn within(&self, clip: Rect) -> Vec<&PaintCommand> {
        let mut active = None;
        let mut out = Vec::new();
        for cmd in &self.commands {
            match cmd {
                PaintCommand::Clip { rect } => active = *rect,
                other if active == Some(clip) => out.push(other),
                _ => {}
            }
        }
        out
    }

    pub fn cells(&self) -> Vec<(&str, &CellStyle)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Cell { text, style, .. } => Some((text.as_str(), style)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Text { text, .. } => Some(text.as_str()),
                PaintCommand::Cell { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Backend for DisplayList {
    fn set_clip(&mut self, clip: Option<Rect>) {
        self.commands.push(PaintCommand::Clip { rect: clip });
    }

    fn fill_rect(&mut self, rect: RectF, color: Color) {
        self.commands.push(PaintCommand::SolidRect { rect, color });
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.commands.push(PaintCommand::Line {
            from,
            to,
            stroke: stroke.clone(),
        });
    }

    fn marker(&mut self, center: Point, radius: f64, fill: Color, edge: Option<&Stroke>) {
        self.commands.push(PaintCommand::Marker {
            center,
            radius,
            fill,
            edge: edge.cloned(),
        });
    }

    fn text(&mut self, at: Point, text: &str, font: &Font, anchor: Anchor, rotation: f64) {
        self.commands.push(PaintCommand::Text {
            at,
            text: text.to_string(),
            font: font.clone(),
            anchor,
            rotation,
        });
    }

    fn cell(&mut self, rect: RectF, text: &str, style: &CellStyle) {
        self.commands.push(PaintCommand::Cell {
            rect,
            text: text.to_string(),
            style: style.clone(),
        });
    }
}
