/// Row planning and the layout model of a composite figure

use log::debug;
use serde::Serialize;

use crate::rendering::plot::PlotPayload;
use crate::rendering::table::TablePayload;
use crate::rendering::text::TextBlock;
use crate::style::StyleConfig;
use crate::{Error, Result};

/// Integer pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn to_f(self) -> RectF {
        RectF {
            x: self.x as f64,
            y: self.y as f64,
            w: self.width as f64,
            h: self.height as f64,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True when the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlap of the two rectangles, `None` when they share no pixel.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| Rect {
            x,
            y,
            width: (right - x) as u32,
            height: (bottom - y) as u32,
        })
    }
}

/// Floating-point rectangle used by renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }

    pub fn inset(&self, left: f64, top: f64, right: f64, bottom: f64) -> RectF {
        RectF {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }

    pub fn intersect(&self, other: &RectF) -> Option<RectF> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| RectF {
            x,
            y,
            w: right - x,
            h: bottom - y,
        })
    }

    /// Smallest integer rectangle covering this one.
    pub fn outer_rect(&self) -> Rect {
        let x = self.x.floor();
        let y = self.y.floor();
        Rect {
            x: x as i32,
            y: y as i32,
            width: (self.right().ceil() - x).max(0.0) as u32,
            height: (self.bottom().ceil() - y).max(0.0) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One planned row: `[start, end)` along the stacking axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub start: f64,
    pub end: f64,
}

impl Band {
    pub fn extent(&self) -> f64 {
        self.end - self.start
    }
}

/// Gap between adjacent rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Spacing {
    /// Fixed number of pixels
    Absolute(f64),
    /// Fraction of the total extent
    FractionOfExtent(f64),
    /// Fraction of the mean row height, as grid-spec `hspace` does
    FractionOfMeanRow(f64),
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::Absolute(0.0)
    }
}

impl Spacing {
    /// Absolute gap for `rows` rows sharing `extent`.
    pub fn resolve(self, extent: f64, rows: usize) -> Result<f64> {
        let v = match self {
            Spacing::Absolute(v) | Spacing::FractionOfExtent(v) | Spacing::FractionOfMeanRow(v) => v,
        };
        if !(v.is_finite() && v >= 0.0) {
            return Err(Error::ConfigError(format!(
                "spacing must be finite and non-negative, got {:?}",
                self
            )));
        }
        Ok(match self {
            Spacing::Absolute(px) => px,
            Spacing::FractionOfExtent(f) => f * extent,
            Spacing::FractionOfMeanRow(h) => {
                if rows < 2 {
                    0.0
                } else {
                    let n = rows as f64;
                    h * extent / (n + h * (n - 1.0))
                }
            }
        })
    }
}

/// Split `total` into rows proportional to `ratios`, separated by `spacing`.
///
/// The first row starts at 0 and the last ends at `total`. Fails when there
/// are no ratios, when a ratio is not strictly positive, or when the gaps
/// alone exceed `total`.
pub fn plan(ratios: &[f64], spacing: f64, total: f64) -> Result<Vec<Band>> {
    if ratios.is_empty() {
        return Err(Error::ConfigError("layout has no rows".into()));
    }
    if let Some((i, r)) = ratios
        .iter()
        .enumerate()
        .find(|(_, r)| !(r.is_finite() && **r > 0.0))
    {
        return Err(Error::ConfigError(format!(
            "row {} has non-positive height ratio {}",
            i, r
        )));
    }
    if !(spacing.is_finite() && spacing >= 0.0) {
        return Err(Error::ConfigError(format!(
            "spacing must be finite and non-negative, got {}",
            spacing
        )));
    }
    if !(total.is_finite() && total > 0.0) {
        return Err(Error::ConfigError(format!(
            "total extent must be positive, got {}",
            total
        )));
    }

    let gaps = spacing * (ratios.len() - 1) as f64;
    if gaps > total {
        return Err(Error::ConfigError(format!(
            "spacing reserves {} of {} available",
            gaps, total
        )));
    }

    let available = total - gaps;
    let sum: f64 = ratios.iter().sum();
    let last = ratios.len() - 1;
    let mut cursor = 0.0;
    let mut bands = Vec::with_capacity(ratios.len());
    for (i, r) in ratios.iter().enumerate() {
        let end = if i == last {
            total
        } else {
            cursor + available * r / sum
        };
        bands.push(Band { start: cursor, end });
        cursor = end + spacing;
    }
    Ok(bands)
}

/// Closed set of region kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionKind {
    Title,
    Subtitle,
    Caption,
    Plot,
    Table,
    Spacer,
}

/// Kind-specific region payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Content {
    Title(TextBlock),
    Subtitle(TextBlock),
    Caption(TextBlock),
    Plot(Box<PlotPayload>),
    Table(TablePayload),
    Spacer,
}

impl Content {
    pub fn kind(&self) -> RegionKind {
        match self {
            Content::Title(_) => RegionKind::Title,
            Content::Subtitle(_) => RegionKind::Subtitle,
            Content::Caption(_) => RegionKind::Caption,
            Content::Plot(_) => RegionKind::Plot,
            Content::Table(_) => RegionKind::Table,
            Content::Spacer => RegionKind::Spacer,
        }
    }

    /// Check the payload's shape without drawing anything.
    pub fn validate(&self) -> Result<()> {
        match self {
            Content::Title(t) | Content::Subtitle(t) | Content::Caption(t) => t.validate(),
            Content::Plot(p) => p.validate(),
            Content::Table(t) => t.validate(),
            Content::Spacer => Ok(()),
        }
    }
}

/// One horizontal band of a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub height_ratio: f64,
    pub content: Content,
}

impl Region {
    pub fn new(height_ratio: f64, content: Content) -> Self {
        Self {
            height_ratio,
            content,
        }
    }

    pub fn title(height_ratio: f64, block: TextBlock) -> Self {
        Self::new(height_ratio, Content::Title(block))
    }

    pub fn subtitle(height_ratio: f64, block: TextBlock) -> Self {
        Self::new(height_ratio, Content::Subtitle(block))
    }

    pub fn caption(height_ratio: f64, block: TextBlock) -> Self {
        Self::new(height_ratio, Content::Caption(block))
    }

    pub fn plot(height_ratio: f64, plot: PlotPayload) -> Self {
        Self::new(height_ratio, Content::Plot(Box::new(plot)))
    }

    pub fn table(height_ratio: f64, table: TablePayload) -> Self {
        Self::new(height_ratio, Content::Table(table))
    }

    pub fn spacer(height_ratio: f64) -> Self {
        Self::new(height_ratio, Content::Spacer)
    }

    pub fn kind(&self) -> RegionKind {
        self.content.kind()
    }
}

/// Ordered regions plus canvas size and row spacing for one figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    /// Canvas width in inches
    pub width: f64,
    /// Canvas height in inches
    pub height: f64,
    pub spacing: Spacing,
    pub regions: Vec<Region>,
}

impl LayoutSpec {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            spacing: Spacing::default(),
            regions: Vec::new(),
        }
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.regions.iter().map(|r| r.height_ratio).collect()
    }

    /// Canvas size in pixels for the given style.
    pub fn canvas_size(&self, style: &StyleConfig) -> Result<(u32, u32)> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(Error::ConfigError(format!(
                "canvas must have positive size, got {}x{} in",
                self.width, self.height
            )));
        }
        let w = (self.width * style.dpi).round();
        let h = (self.height * style.dpi).round();
        if w < 1.0 || h < 1.0 {
            return Err(Error::ConfigError("canvas rounds to zero pixels".into()));
        }
        Ok((w as u32, h as u32))
    }

    /// Pixel rectangle of every region, top to bottom, inside the padded canvas.
    ///
    /// Both edges of each band are rounded independently; since rounding is
    /// monotone, rows that do not overlap as bands do not overlap as pixels.
    pub fn row_rects(&self, style: &StyleConfig) -> Result<Vec<Rect>> {
        let (w, h) = self.canvas_size(style)?;
        let pad = (style.padding * style.dpi).round();
        let content_w = w as f64 - 2.0 * pad;
        let content_h = h as f64 - 2.0 * pad;
        if content_w <= 0.0 || content_h <= 0.0 {
            return Err(Error::ConfigError(format!(
                "padding of {} px leaves no room on a {}x{} canvas",
                pad, w, h
            )));
        }
        let gap = self.spacing.resolve(content_h, self.regions.len())?;
        let bands = plan(&self.ratios(), gap, content_h)?;
        debug!("planned {} rows over {} px (gap {:.2})", bands.len(), content_h, gap);

        Ok(bands
            .iter()
            .map(|b| {
                let top = (pad + b.start).round() as i32;
                let bottom = (pad + b.end).round() as i32;
                Rect {
                    x: pad as i32,
                    y: top,
                    width: content_w as u32,
                    height: (bottom - top).max(0) as u32,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_fills_extent_exactly() {
        let bands = plan(&[1.0, 4.0, 1.0], 60.0, 600.0).unwrap();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].start, 0.0);
        assert!((bands[0].end - 80.0).abs() < 1e-9);
        assert!((bands[1].start - 140.0).abs() < 1e-9);
        assert!((bands[1].end - 460.0).abs() < 1e-9);
        assert!((bands[2].start - 520.0).abs() < 1e-9);
        assert_eq!(bands[2].end, 600.0);
    }

    #[test]
    fn plan_rejects_bad_input() {
        assert!(plan(&[], 0.0, 100.0).unwrap_err().is_config());
        assert!(plan(&[1.0, 0.0], 0.0, 100.0).unwrap_err().is_config());
        assert!(plan(&[1.0, -2.0], 0.0, 100.0).unwrap_err().is_config());
        assert!(plan(&[1.0, 1.0, 1.0], 60.0, 100.0).unwrap_err().is_config());
    }

    #[test]
    fn single_row_ignores_spacing() {
        let bands = plan(&[3.0], 1000.0, 50.0).unwrap();
        assert_eq!(bands, vec![Band { start: 0.0, end: 50.0 }]);
    }

    #[test]
    fn mean_row_spacing_matches_hspace() {
        // two equal rows with hspace 1.0: gap equals each row's height
        let gap = Spacing::FractionOfMeanRow(1.0).resolve(300.0, 2).unwrap();
        assert!((gap - 100.0).abs() < 1e-9);
        assert!(Spacing::Absolute(-1.0).resolve(10.0, 2).is_err());
        assert_eq!(Spacing::FractionOfExtent(0.1).resolve(600.0, 3).unwrap(), 60.0);
    }

    #[test]
    fn row_rects_do_not_overlap() {
        let spec = LayoutSpec::new(10.0, 6.0)
            .spacing(Spacing::FractionOfMeanRow(0.5))
            .region(Region::spacer(0.6))
            .region(Region::spacer(4.0))
            .region(Region::spacer(0.3))
            .region(Region::spacer(0.3))
            .region(Region::spacer(1.0))
            .region(Region::spacer(0.7));
        let rects = spec.row_rects(&StyleConfig::default()).unwrap();
        assert_eq!(rects.len(), 6);
        for pair in rects.windows(2) {
            assert!(pair[0].bottom() <= pair[1].y);
            assert!(!pair[0].overlaps(&pair[1]));
        }
        assert_eq!(rects[0].y, 20);
        assert_eq!(rects[5].bottom(), 580);
    }

    #[test]
    fn intersections_clip_to_the_shared_area() {
        let a = Rect { x: 0, y: 0, width: 100, height: 50 };
        let b = Rect { x: 80, y: -10, width: 40, height: 30 };
        assert_eq!(a.intersect(&b), Some(Rect { x: 80, y: 0, width: 20, height: 20 }));
        assert_eq!(a.intersect(&Rect { x: 100, y: 0, width: 5, height: 5 }), None);

        let tall = RectF { x: 10.0, y: -1e9, w: 20.0, h: 2e9 };
        let area = RectF { x: 0.0, y: 0.0, w: 50.0, h: 40.0 };
        assert_eq!(tall.intersect(&area), Some(RectF { x: 10.0, y: 0.0, w: 20.0, h: 40.0 }));
        assert_eq!(RectF { x: 0.5, y: 1.2, w: 2.0, h: 2.0 }.outer_rect(), Rect { x: 0, y: 1, width: 3, height: 3 });
    }
}
