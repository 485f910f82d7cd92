//! Plot regions: scatter/bubble and grouped-bar charts on one set of axes.
//!
//! A plot is drawn back to front in a fixed order:
//! 1. axes background, threshold band, grid, reference lines
//! 2. marks (markers or bars), then point labels, then annotations
//! 3. spines, ticks, tick labels, axis labels
//! 4. legend
//!
//! Later steps therefore always layer above earlier ones.

use serde::Serialize;

use crate::rendering::layout::{Point, Rect, RectF};
use crate::rendering::paint::{anchored_origin, Anchor, Backend, HAlign, Stroke, VAlign};
use crate::style::{Color, Font, Spine, SpineRule, StyleConfig, TextStyle};
use crate::{Error, Result};

const TICK_LEN_PT: f64 = 3.5;
const GAP_PT: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Ticks {
    /// Evenly spaced round numbers
    Auto,
    /// Explicit numeric positions
    Values(Vec<f64>),
    /// Category names at positions 0, 1, 2, ...
    Categories(Vec<String>),
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub range: (f64, f64),
    pub label: Option<String>,
    pub ticks: Ticks,
    /// Tick label rotation in degrees, counter-clockwise
    pub tick_rotation: f64,
    pub bold_ticks: bool,
}

impl Axis {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self {
            range: (lo, hi),
            label: None,
            ticks: Ticks::Auto,
            tick_rotation: 0.0,
            bold_ticks: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn ticks(mut self, ticks: Ticks) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.tick_rotation = degrees;
        self
    }

    pub fn bold_ticks(mut self) -> Self {
        self.bold_ticks = true;
        self
    }

    /// Tick positions with their labels.
    fn tick_marks(&self) -> Vec<(f64, String)> {
        match &self.ticks {
            Ticks::Hidden => Vec::new(),
            Ticks::Categories(names) => names
                .iter()
                .enumerate()
                .map(|(i, n)| (i as f64, n.clone()))
                .collect(),
            Ticks::Values(values) => {
                let step = values
                    .windows(2)
                    .map(|w| (w[1] - w[0]).abs())
                    .fold(f64::INFINITY, f64::min);
                let step = if step.is_finite() { step } else { 1.0 };
                values.iter().map(|v| (*v, format_tick(*v, step))).collect()
            }
            Ticks::Auto => {
                let (lo, hi) = self.range;
                let step = nice_step(hi - lo);
                let first = (lo / step - 1e-9).ceil() as i64;
                let last = (hi / step + 1e-9).floor() as i64;
                (first..=last)
                    .map(|k| {
                        let v = k as f64 * step;
                        (v, format_tick(v, step))
                    })
                    .collect()
            }
        }
    }
}

/// Round step giving roughly five intervals over `span`.
pub fn nice_step(span: f64) -> f64 {
    let raw = span / 5.0;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm < 1.5 {
        1.0
    } else if norm < 3.0 {
        2.0
    } else if norm < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

fn format_tick(v: f64, step: f64) -> String {
    if step >= 1.0 || step <= 0.0 {
        format!("{:.0}", v)
    } else {
        let decimals = (-step.log10().floor()).max(0.0) as usize;
        format!("{:.*}", decimals, v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    /// Marker area in square points
    pub size: f64,
    pub color_key: String,
    pub label: Option<String>,
    /// Overrides the width of the plot's marker edge for this point
    pub edge_width: Option<f64>,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64, size: f64, color_key: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            color_key: color_key.into(),
            label: None,
            edge_width: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn edge_width(mut self, width: f64) -> Self {
        self.edge_width = Some(width);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub color_key: String,
}

/// Bars grouped per category; series sit side by side within each group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroups {
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    /// Bar width in category units
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Marks {
    Scatter(Vec<PlotPoint>),
    Bars(BarGroups),
}

/// Where a point's label goes relative to its marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LabelPlacement {
    /// Centered above the marker center by this many points
    Above(f64),
    /// Left-aligned to the right of the point by this many data units
    Right(f64),
}

/// Shaded vertical span between two x values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadedBand {
    pub x0: f64,
    pub x1: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RefLine {
    Vertical { x: f64, stroke: Stroke },
    Horizontal { y: f64, stroke: Stroke },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Coord {
    Data(f64, f64),
    /// Fractions of the axes box, origin bottom-left
    Axes(f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub at: Coord,
    pub style: TextStyle,
    pub anchor: Anchor,
    pub boxed: bool,
    /// Draw an arrow from the text to this data point
    pub arrow_to: Option<(f64, f64)>,
}

impl Annotation {
    pub fn new(text: impl Into<String>, at: Coord, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            at,
            style,
            anchor: Anchor::new(HAlign::Left, VAlign::Bottom),
            boxed: false,
            arrow_to: None,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn boxed(mut self) -> Self {
        self.boxed = true;
        self
    }

    pub fn arrow_to(mut self, x: f64, y: f64) -> Self {
        self.arrow_to = Some((x, y));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegendPlacement {
    UpperLeft,
    UpperRight,
    /// Beside the axes, to the right
    OutsideRight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Option<String>,
    /// `(color_key, display name)` in display order
    pub entries: Vec<(String, String)>,
    pub placement: LegendPlacement,
    pub framed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPayload {
    pub x: Axis,
    pub y: Axis,
    pub y_grid: bool,
    pub grid_dashed: bool,
    pub marks: Marks,
    /// `color_key -> color`
    pub palette: Vec<(String, Color)>,
    pub marker_alpha: f64,
    pub marker_edge: Option<Stroke>,
    pub label_placement: LabelPlacement,
    pub label_style: TextStyle,
    pub band: Option<ShadedBand>,
    pub ref_lines: Vec<RefLine>,
    pub annotations: Vec<Annotation>,
    pub legend: Option<Legend>,
    pub tick_style: TextStyle,
    pub axis_label_style: TextStyle,
    /// Overrides the figure's spine rule
    pub spines: Option<SpineRule>,
}

impl PlotPayload {
    pub fn new(x: Axis, y: Axis, marks: Marks) -> Self {
        Self {
            x,
            y,
            y_grid: false,
            grid_dashed: false,
            marks,
            palette: Vec::new(),
            marker_alpha: 1.0,
            marker_edge: Some(Stroke::solid(Color::BLACK, 1.0)),
            label_placement: LabelPlacement::Above(10.0),
            label_style: TextStyle::new(9.0),
            band: None,
            ref_lines: Vec::new(),
            annotations: Vec::new(),
            legend: None,
            tick_style: TextStyle::new(10.0),
            axis_label_style: TextStyle::new(11.0),
            spines: None,
        }
    }

    pub fn color(&self, key: &str) -> Option<Color> {
        self.palette.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    fn require_color(&self, key: &str, what: &str) -> Result<Color> {
        self.color(key).ok_or_else(|| {
            Error::DataShapeError(format!("{} uses color key '{}' missing from the palette", what, key))
        })
    }

    pub fn validate(&self) -> Result<()> {
        for (name, axis) in [("x", &self.x), ("y", &self.y)] {
            let (lo, hi) = axis.range;
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(Error::DataShapeError(format!(
                    "{} axis range {:?} is empty",
                    name, axis.range
                )));
            }
            match &axis.ticks {
                Ticks::Values(v) if v.iter().any(|t| !t.is_finite()) => {
                    return Err(Error::DataShapeError(format!("{} axis has a non-finite tick", name)));
                }
                Ticks::Categories(c) if c.is_empty() => {
                    return Err(Error::DataShapeError(format!("{} axis has no categories", name)));
                }
                _ => {}
            }
        }

        match &self.marks {
            Marks::Scatter(points) => {
                for (i, p) in points.iter().enumerate() {
                    if !(p.x.is_finite() && p.y.is_finite()) {
                        return Err(Error::DataShapeError(format!("point {} is not finite", i)));
                    }
                    if !(p.size.is_finite() && p.size > 0.0) {
                        return Err(Error::DataShapeError(format!(
                            "point {} has non-positive size {}",
                            i, p.size
                        )));
                    }
                    self.require_color(&p.color_key, &format!("point {}", i))?;
                }
            }
            Marks::Bars(bars) => {
                if bars.categories.is_empty() || bars.series.is_empty() {
                    return Err(Error::DataShapeError("bar chart needs categories and series".into()));
                }
                if !(bars.width > 0.0 && bars.width.is_finite()) {
                    return Err(Error::DataShapeError(format!("bar width {} is not positive", bars.width)));
                }
                for s in &bars.series {
                    if s.values.len() != bars.categories.len() {
                        return Err(Error::DataShapeError(format!(
                            "bar series '{}' has {} values for {} categories",
                            s.name,
                            s.values.len(),
                            bars.categories.len()
                        )));
                    }
                    if s.values.iter().any(|v| !v.is_finite()) {
                        return Err(Error::DataShapeError(format!(
                            "bar series '{}' has a non-finite value",
                            s.name
                        )));
                    }
                    self.require_color(&s.color_key, &format!("bar series '{}'", s.name))?;
                }
            }
        }

        if let Some(legend) = &self.legend {
            for (key, _) in &legend.entries {
                self.require_color(key, "legend entry")?;
            }
        }
        if let Some(band) = &self.band {
            if !(band.x0.is_finite() && band.x1.is_finite() && band.x0 < band.x1) {
                return Err(Error::DataShapeError(format!(
                    "shaded band [{}, {}] is empty",
                    band.x0, band.x1
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.marker_alpha) {
            return Err(Error::DataShapeError(format!(
                "marker alpha {} outside [0, 1]",
                self.marker_alpha
            )));
        }
        Ok(())
    }

    pub fn render<B: Backend>(&self, bounds: Rect, style: &StyleConfig, backend: &mut B) -> Result<()> {
        let fonts = PlotFonts::resolve(self, style);
        let area = self.axes_area(bounds.to_f(), style, &fonts, backend)?;
        let frame = Frame {
            area,
            x: self.x.range,
            y: self.y.range,
        };

        backend.fill_rect(area, style.axes_background);
        self.draw_underlay(&frame, style, backend);
        // marks stay inside the axes box, everything else only inside the region
        backend.set_clip(Some(area.outer_rect().intersect(&bounds).unwrap_or(bounds)));
        let marks = self.draw_marks(&frame, style, backend);
        backend.set_clip(Some(bounds));
        marks?;
        self.draw_labels(&frame, style, &fonts, backend);
        self.draw_annotations(&frame, style, backend);
        self.draw_axes(&frame, style, &fonts, backend);
        self.draw_legend(&frame, style, &fonts, backend)?;
        Ok(())
    }

    /// Axes box left after reserving room for tick labels, axis labels and an outside legend.
    fn axes_area<B: Backend>(
        &self,
        region: RectF,
        style: &StyleConfig,
        fonts: &PlotFonts,
        backend: &B,
    ) -> Result<RectF> {
        let pad = style.points_to_px(GAP_PT);
        let tick = style.points_to_px(TICK_LEN_PT);

        let y_labels = self.y.tick_marks();
        let ytick_w = y_labels
            .iter()
            .map(|(_, l)| backend.measure_text(l, &fonts.y_tick).0)
            .fold(0.0, f64::max);
        let mut left = pad + ytick_w + tick + pad;
        if let Some(label) = &self.y.label {
            left += backend.measure_text(label, &fonts.axis_label).1 + pad;
        }

        let x_labels = self.x.tick_marks();
        let sin = self.x.tick_rotation.to_radians().sin().abs();
        let cos = self.x.tick_rotation.to_radians().cos().abs();
        let xtick_h = x_labels
            .iter()
            .map(|(_, l)| {
                let (w, h) = backend.measure_text(l, &fonts.x_tick);
                w * sin + h * cos
            })
            .fold(0.0, f64::max);
        let mut bottom = pad + xtick_h + tick + pad;
        if let Some(label) = &self.x.label {
            bottom += backend.measure_text(label, &fonts.axis_label).1 + pad;
        }

        let top = pad + fonts.y_tick.px / 2.0;
        let mut right = pad;
        if self.x.tick_rotation == 0.0 {
            if let Some((_, last)) = x_labels.last() {
                right += backend.measure_text(last, &fonts.x_tick).0 / 2.0;
            }
        }
        if let Some(legend) = &self.legend {
            if legend.placement == LegendPlacement::OutsideRight {
                right += self.legend_size(legend, fonts, backend).0 + pad;
            }
        }

        let area = region.inset(left, top, right, bottom);
        if area.w < 20.0 || area.h < 20.0 {
            return Err(Error::RenderError(format!(
                "plot region {:.0}x{:.0}px leaves no room for axes",
                region.w, region.h
            )));
        }
        Ok(area)
    }

    fn draw_underlay<B: Backend>(&self, frame: &Frame, style: &StyleConfig, backend: &mut B) {
        let area = frame.area;
        if let Some(band) = &self.band {
            let x0 = frame.px_x(band.x0).max(area.x);
            let x1 = frame.px_x(band.x1).min(area.right());
            if x1 > x0 {
                backend.fill_rect(
                    RectF {
                        x: x0,
                        y: area.y,
                        w: x1 - x0,
                        h: area.h,
                    },
                    band.color,
                );
            }
        }

        if self.y_grid {
            let grid = if self.grid_dashed {
                Stroke::dashed(style.grid_color, 1.0)
            } else {
                Stroke::solid(style.grid_color, 1.0)
            };
            for (v, _) in self.y.tick_marks() {
                let y = frame.px_y(v);
                if y >= area.y && y <= area.bottom() {
                    backend.line(Point::new(area.x, y), Point::new(area.right(), y), &grid);
                }
            }
        }

        for line in &self.ref_lines {
            match line {
                RefLine::Vertical { x, stroke } => {
                    let px = frame.px_x(*x);
                    backend.line(Point::new(px, area.y), Point::new(px, area.bottom()), stroke);
                }
                RefLine::Horizontal { y, stroke } => {
                    let py = frame.px_y(*y);
                    backend.line(Point::new(area.x, py), Point::new(area.right(), py), stroke);
                }
            }
        }
    }

    fn draw_marks<B: Backend>(&self, frame: &Frame, style: &StyleConfig, backend: &mut B) -> Result<()> {
        match &self.marks {
            Marks::Scatter(points) => {
                for p in points {
                    let fill = self.require_color(&p.color_key, "point")?.with_alpha(self.marker_alpha);
                    let center = frame.px(p.x, p.y);
                    let radius = style.points_to_px(p.size.sqrt() / 2.0);
                    let edge = self.marker_edge.clone().map(|e| Stroke {
                        width: p.edge_width.unwrap_or(e.width),
                        ..e
                    });
                    backend.marker(center, radius, fill, edge.as_ref());
                }
            }
            Marks::Bars(bars) => {
                let m = bars.series.len() as f64;
                let base = frame.px_y(0.0_f64.clamp(frame.y.0, frame.y.1));
                for (j, s) in bars.series.iter().enumerate() {
                    let fill = self.require_color(&s.color_key, "bar series")?;
                    let offset = (j as f64 - (m - 1.0) / 2.0) * bars.width;
                    for (i, v) in s.values.iter().enumerate() {
                        let center = i as f64 + offset;
                        let x0 = frame.px_x(center - bars.width / 2.0);
                        let x1 = frame.px_x(center + bars.width / 2.0);
                        let top = frame.px_y(*v);
                        let bar = RectF {
                            x: x0,
                            y: top.min(base),
                            w: x1 - x0,
                            h: (base - top).abs(),
                        };
                        if let Some(bar) = bar.intersect(&frame.area) {
                            backend.fill_rect(bar, fill);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn draw_labels<B: Backend>(&self, frame: &Frame, style: &StyleConfig, fonts: &PlotFonts, backend: &mut B) {
        let Marks::Scatter(points) = &self.marks else {
            return;
        };
        for p in points {
            let Some(label) = &p.label else {
                continue;
            };
            if !frame.shows(p.x, p.y) {
                continue;
            }
            match self.label_placement {
                LabelPlacement::Above(offset) => {
                    let c = frame.px(p.x, p.y);
                    let at = Point::new(c.x, c.y - style.points_to_px(offset));
                    backend.text(at, label, &fonts.point_label, Anchor::new(HAlign::Center, VAlign::Bottom), 0.0);
                }
                LabelPlacement::Right(dx) => {
                    let at = frame.px(p.x + dx, p.y);
                    backend.text(at, label, &fonts.point_label, Anchor::new(HAlign::Left, VAlign::Middle), 0.0);
                }
            }
        }
    }

    fn draw_annotations<B: Backend>(&self, frame: &Frame, style: &StyleConfig, backend: &mut B) {
        for note in &self.annotations {
            let font = style.font(&note.style);
            let at = match note.at {
                Coord::Data(x, y) => frame.px(x, y),
                Coord::Axes(fx, fy) => Point::new(
                    frame.area.x + fx * frame.area.w,
                    frame.area.bottom() - fy * frame.area.h,
                ),
            };
            if let Some((tx, ty)) = note.arrow_to {
                let tip = frame.px(tx, ty);
                let stroke = Stroke::solid(style.foreground, 1.0);
                backend.line(at, tip, &stroke);
                let (dx, dy) = (at.x - tip.x, at.y - tip.y);
                let len = (dx * dx + dy * dy).sqrt().max(1e-9);
                let (ux, uy) = (dx / len, dy / len);
                let head = style.points_to_px(5.0);
                for side in [-1.0, 1.0] {
                    // barbs 25 degrees either side of the shaft
                    let (s, c) = (25f64.to_radians().sin() * side, 25f64.to_radians().cos());
                    let bx = ux * c - uy * s;
                    let by = ux * s + uy * c;
                    backend.line(tip, Point::new(tip.x + bx * head, tip.y + by * head), &stroke);
                }
            }
            if note.boxed {
                let (w, h) = backend.measure_text(&note.text, &font);
                let origin = anchored_origin(at, w, h, note.anchor);
                let pad = font.px * 0.4;
                let rect = RectF {
                    x: origin.x - pad,
                    y: origin.y - pad,
                    w: w + 2.0 * pad,
                    h: h + 2.0 * pad,
                };
                backend.fill_rect(rect, Color::WHITE);
                backend.stroke_rect(rect, &Stroke::solid(Color::GRAY, 1.0));
            }
            backend.text(at, &note.text, &font, note.anchor, 0.0);
        }
    }

    fn draw_axes<B: Backend>(&self, frame: &Frame, style: &StyleConfig, fonts: &PlotFonts, backend: &mut B) {
        let area = frame.area;
        let rule = self.spines.as_ref().unwrap_or(&style.spines);
        let stroke = Stroke::solid(rule.color, rule.width);
        for spine in Spine::ALL {
            if !rule.applies_to(spine) {
                continue;
            }
            let (a, b) = match spine {
                Spine::Left => (Point::new(area.x, area.y), Point::new(area.x, area.bottom())),
                Spine::Bottom => (Point::new(area.x, area.bottom()), Point::new(area.right(), area.bottom())),
                Spine::Top => (Point::new(area.x, area.y), Point::new(area.right(), area.y)),
                Spine::Right => (Point::new(area.right(), area.y), Point::new(area.right(), area.bottom())),
            };
            backend.line(a, b, &stroke);
        }

        let tick = style.points_to_px(TICK_LEN_PT);
        let gap = style.points_to_px(GAP_PT) / 2.0;
        let tick_stroke = Stroke::solid(style.foreground, 1.0);

        for (v, label) in self.x.tick_marks() {
            let x = frame.px_x(v);
            if x < area.x - 0.5 || x > area.right() + 0.5 {
                continue;
            }
            backend.line(Point::new(x, area.bottom()), Point::new(x, area.bottom() + tick), &tick_stroke);
            let at = Point::new(x, area.bottom() + tick + gap);
            if self.x.tick_rotation == 0.0 {
                backend.text(at, &label, &fonts.x_tick, Anchor::new(HAlign::Center, VAlign::Top), 0.0);
            } else {
                backend.text(at, &label, &fonts.x_tick, Anchor::new(HAlign::Right, VAlign::Middle), self.x.tick_rotation);
            }
        }

        let mut ytick_w: f64 = 0.0;
        for (v, label) in self.y.tick_marks() {
            let y = frame.px_y(v);
            if y < area.y - 0.5 || y > area.bottom() + 0.5 {
                continue;
            }
            ytick_w = ytick_w.max(backend.measure_text(&label, &fonts.y_tick).0);
            backend.line(Point::new(area.x - tick, y), Point::new(area.x, y), &tick_stroke);
            backend.text(
                Point::new(area.x - tick - gap, y),
                &label,
                &fonts.y_tick,
                Anchor::new(HAlign::Right, VAlign::Middle),
                0.0,
            );
        }

        if let Some(label) = &self.x.label {
            let sin = self.x.tick_rotation.to_radians().sin().abs();
            let cos = self.x.tick_rotation.to_radians().cos().abs();
            let xtick_h = self
                .x
                .tick_marks()
                .iter()
                .map(|(_, l)| {
                    let (w, h) = backend.measure_text(l, &fonts.x_tick);
                    w * sin + h * cos
                })
                .fold(0.0, f64::max);
            let at = Point::new(area.x + area.w / 2.0, area.bottom() + tick + gap + xtick_h + gap * 2.0);
            backend.text(at, label, &fonts.axis_label, Anchor::new(HAlign::Center, VAlign::Top), 0.0);
        }
        if let Some(label) = &self.y.label {
            let at = Point::new(area.x - tick - gap * 3.0 - ytick_w, area.y + area.h / 2.0);
            backend.text(at, label, &fonts.axis_label, Anchor::new(HAlign::Center, VAlign::Bottom), 90.0);
        }
    }

    fn legend_size<B: Backend>(&self, legend: &Legend, fonts: &PlotFonts, backend: &B) -> (f64, f64) {
        let row_h = fonts.legend.px * 1.5;
        let swatch = fonts.legend.px;
        let pad = fonts.legend.px * 0.5;
        let labels_w = legend
            .entries
            .iter()
            .map(|(_, l)| backend.measure_text(l, &fonts.legend).0)
            .fold(0.0, f64::max);
        let title_w = legend
            .title
            .as_ref()
            .map(|t| backend.measure_text(t, &fonts.legend).0)
            .unwrap_or(0.0);
        let w = (swatch + pad + labels_w).max(title_w) + 2.0 * pad;
        let rows = legend.entries.len() + usize::from(legend.title.is_some());
        (w, rows as f64 * row_h + 2.0 * pad)
    }

    fn draw_legend<B: Backend>(&self, frame: &Frame, style: &StyleConfig, fonts: &PlotFonts, backend: &mut B) -> Result<()> {
        let Some(legend) = &self.legend else {
            return Ok(());
        };
        let (w, h) = self.legend_size(legend, fonts, backend);
        let area = frame.area;
        let inset = style.points_to_px(GAP_PT);
        let origin = match legend.placement {
            LegendPlacement::UpperLeft => Point::new(area.x + inset, area.y + inset),
            LegendPlacement::UpperRight => Point::new(area.right() - w - inset, area.y + inset),
            LegendPlacement::OutsideRight => Point::new(area.right() + inset, area.y),
        };
        let rect = RectF { x: origin.x, y: origin.y, w, h };
        if legend.framed {
            backend.fill_rect(rect, Color::WHITE.with_alpha(0.8));
            backend.stroke_rect(rect, &Stroke::solid(style.grid_color, 1.0));
        }

        let row_h = fonts.legend.px * 1.5;
        let pad = fonts.legend.px * 0.5;
        let swatch = fonts.legend.px;
        let mut y = origin.y + pad;
        if let Some(title) = &legend.title {
            backend.text(
                Point::new(origin.x + w / 2.0, y + row_h / 2.0),
                title,
                &fonts.legend,
                Anchor::CENTER,
                0.0,
            );
            y += row_h;
        }
        for (key, label) in &legend.entries {
            let color = self.require_color(key, "legend entry")?;
            let cy = y + row_h / 2.0;
            let sx = origin.x + pad;
            match self.marks {
                Marks::Scatter(_) => {
                    backend.marker(Point::new(sx + swatch / 2.0, cy), swatch / 2.0, color, None);
                }
                Marks::Bars(_) => backend.fill_rect(
                    RectF {
                        x: sx,
                        y: cy - swatch / 2.0,
                        w: swatch,
                        h: swatch,
                    },
                    color,
                ),
            }
            backend.text(
                Point::new(sx + swatch + pad, cy),
                label,
                &fonts.legend,
                Anchor::new(HAlign::Left, VAlign::Middle),
                0.0,
            );
            y += row_h;
        }
        Ok(())
    }
}

struct PlotFonts {
    x_tick: Font,
    y_tick: Font,
    axis_label: Font,
    point_label: Font,
    legend: Font,
}

impl PlotFonts {
    fn resolve(plot: &PlotPayload, style: &StyleConfig) -> Self {
        let tick = |bold: bool| {
            let t = plot.tick_style.clone();
            style.font(&if bold { t.bold() } else { t })
        };
        Self {
            x_tick: tick(plot.x.bold_ticks),
            y_tick: tick(plot.y.bold_ticks),
            axis_label: style.font(&plot.axis_label_style),
            point_label: style.font(&plot.label_style),
            legend: style.font(&plot.tick_style),
        }
    }
}

/// Mapping from data coordinates to canvas pixels
struct Frame {
    area: RectF,
    x: (f64, f64),
    y: (f64, f64),
}

impl Frame {
    fn px_x(&self, x: f64) -> f64 {
        self.area.x + (x - self.x.0) / (self.x.1 - self.x.0) * self.area.w
    }

    fn px_y(&self, y: f64) -> f64 {
        self.area.bottom() - (y - self.y.0) / (self.y.1 - self.y.0) * self.area.h
    }

    fn px(&self, x: f64, y: f64) -> Point {
        Point::new(self.px_x(x), self.px_y(y))
    }

    /// True when the data point lies within both axis ranges.
    fn shows(&self, x: f64, y: f64) -> bool {
        let within = |v: f64, (a, b): (f64, f64)| v >= a.min(b) && v <= a.max(b);
        within(x, self.x) && within(y, self.y)
    }
}
