/// Composition engine: plan rows, then render each region into its row

use log::debug;

use crate::rendering::layout::{Content, LayoutSpec, Rect, RegionKind};
use crate::rendering::paint::{Backend, DisplayList};
use crate::rendering::raster::Canvas;
use crate::style::StyleConfig;
use crate::{Error, Result};

/// Canvas size and row rectangles for one figure, computed before any drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub width: u32,
    pub height: u32,
    pub rows: Vec<Rect>,
}

fn in_region(err: Error, index: usize, kind: RegionKind) -> Error {
    let ctx = |msg: String| format!("region {} ({:?}): {}", index, kind, msg);
    match err {
        Error::ConfigError(m) => Error::ConfigError(ctx(m)),
        Error::DataShapeError(m) => Error::DataShapeError(ctx(m)),
        Error::RenderError(m) => Error::RenderError(ctx(m)),
        other => other,
    }
}

/// Validate the style and every payload, and plan the rows.
///
/// Nothing is drawn here, so a configuration or data-shape error surfaces
/// before a canvas exists.
pub fn prepare(spec: &LayoutSpec, style: &StyleConfig) -> Result<Plan> {
    style.validate()?;
    let (width, height) = spec.canvas_size(style)?;
    let rows = spec.row_rects(style)?;
    for (i, region) in spec.regions.iter().enumerate() {
        region
            .content
            .validate()
            .map_err(|e| in_region(e, i, region.kind()))?;
    }
    Ok(Plan { width, height, rows })
}

/// Render every region in declared order, each confined to its row.
pub fn draw<B: Backend>(spec: &LayoutSpec, plan: &Plan, style: &StyleConfig, backend: &mut B) -> Result<()> {
    for (i, (region, bounds)) in spec.regions.iter().zip(&plan.rows).enumerate() {
        debug!("region {} {:?} -> {:?}", i, region.kind(), bounds);
        backend.set_clip(Some(*bounds));
        let res = match &region.content {
            Content::Title(t) | Content::Subtitle(t) | Content::Caption(t) => t.render(*bounds, style, backend),
            Content::Plot(p) => p.render(*bounds, style, backend),
            Content::Table(t) => t.render(*bounds, style, backend),
            Content::Spacer => Ok(()),
        };
        backend.set_clip(None);
        res.map_err(|e| in_region(e, i, region.kind()))?;
    }
    Ok(())
}

/// Compose a figure onto a fresh raster canvas.
///
/// On error the partially drawn canvas is dropped and never returned.
pub fn compose(spec: &LayoutSpec, style: &StyleConfig) -> Result<Canvas> {
    let plan = prepare(spec, style)?;
    let mut canvas = Canvas::new(plan.width, plan.height, style.background)?;
    draw(spec, &plan, style, &mut canvas)?;
    Ok(canvas)
}

/// Compose a figure into a display list instead of pixels.
pub fn record(spec: &LayoutSpec, style: &StyleConfig) -> Result<(Plan, DisplayList)> {
    let plan = prepare(spec, style)?;
    let mut list = DisplayList::new();
    draw(spec, &plan, style, &mut list)?;
    Ok((plan, list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::Region;
    use crate::rendering::paint::PaintCommand;
    use crate::rendering::table::TablePayload;
    use crate::rendering::text::TextBlock;
    use crate::style::TextStyle;

    fn spec() -> LayoutSpec {
        LayoutSpec::new(6.0, 4.0)
            .region(Region::title(1.0, TextBlock::new("Title", TextStyle::new(16.0).bold())))
            .region(Region::spacer(0.5))
            .region(Region::caption(1.0, TextBlock::new("Caption", TextStyle::new(10.0))))
    }

    #[test]
    fn regions_draw_in_declared_order() {
        let (plan, list) = record(&spec(), &StyleConfig::default()).unwrap();
        assert_eq!(plan.rows.len(), 3);
        assert_eq!(list.texts(), vec!["Title", "Caption"]);
        let clips: Vec<_> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Clip { rect: Some(r) } => Some(*r),
                _ => None,
            })
            .collect();
        assert_eq!(clips, plan.rows);
    }

    #[test]
    fn shape_errors_surface_before_drawing() {
        let bad = TablePayload::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        );
        let spec = spec().region(Region::table(1.0, bad));
        let err = prepare(&spec, &StyleConfig::default()).unwrap_err();
        assert!(err.is_data_shape());
        assert!(err.to_string().contains("region 3 (Table)"));
    }

    #[test]
    fn empty_layout_is_a_config_error() {
        let err = compose(&LayoutSpec::new(6.0, 4.0), &StyleConfig::default()).unwrap_err();
        assert!(err.is_config());
    }
}
