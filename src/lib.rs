//! Heatfig: deterministic report figures for neighborhood heat vulnerability
//!
//! A figure is a vertical stack of regions (title, plot, table, caption, ...)
//! described by a [`LayoutSpec`]. The composition engine plans the rows,
//! renders each region into its own rectangle on a raster canvas, and the
//! exporter writes a tightly cropped PNG.
//!
//! # Example
//!
//! ```no_run
//! use heatfig::rendering::layout::{LayoutSpec, Region};
//! use heatfig::rendering::text::TextBlock;
//! use heatfig::style::{StyleConfig, TextStyle};
//! use heatfig::FigureSpec;
//!
//! # fn main() -> heatfig::Result<()> {
//! let figure = FigureSpec {
//!     name: "hello".to_string(),
//!     file_name: "hello.png".to_string(),
//!     style: StyleConfig::default(),
//!     layout: LayoutSpec::new(4.0, 1.0)
//!         .region(Region::title(1.0, TextBlock::new("Hello", TextStyle::new(16.0).bold()))),
//! };
//! let rendered = heatfig::render_figure(&figure, std::path::Path::new("."))?;
//! println!("{}x{}", rendered.width, rendered.height);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use log::info;

pub mod error;
pub use error::{Error, Result};

pub mod dataset;
pub mod figures;
pub mod rendering;
pub mod style;

pub use dataset::{Dataset, Value};
pub use rendering::layout::{LayoutSpec, Region, Spacing};
pub use rendering::RenderedFigure;
pub use style::StyleConfig;

/// Padding kept around the content when cropping, in inches
pub const EXPORT_PAD_INCHES: f64 = 0.1;

/// Everything needed to produce one output file
#[derive(Debug, Clone)]
pub struct FigureSpec {
    /// Short identifier used on the command line
    pub name: String,
    /// Output file name, relative to the output directory
    pub file_name: String,
    pub style: StyleConfig,
    pub layout: LayoutSpec,
}

impl FigureSpec {
    fn export_pad(&self) -> u32 {
        (EXPORT_PAD_INCHES * self.style.dpi).round().max(0.0) as u32
    }
}

/// Compose a figure and return the encoded PNG without touching the filesystem.
pub fn encode_figure(figure: &FigureSpec) -> Result<RenderedFigure> {
    let canvas = rendering::compose::compose(&figure.layout, &figure.style)
        .map_err(|e| e.in_figure(&figure.name))?;
    rendering::export::encode(&canvas, figure.export_pad()).map_err(|e| e.in_figure(&figure.name))
}

/// Compose a figure and write it to `out_dir/file_name`.
pub fn render_figure(figure: &FigureSpec, out_dir: &Path) -> Result<RenderedFigure> {
    let canvas = rendering::compose::compose(&figure.layout, &figure.style)
        .map_err(|e| e.in_figure(&figure.name))?;
    let path = out_dir.join(&figure.file_name);
    let rendered = rendering::export::export(&canvas, &path, figure.export_pad())
        .map_err(|e| e.in_figure(&figure.name))?;
    info!(
        "figure '{}' -> {} ({}x{}, font family {})",
        figure.name,
        path.display(),
        rendered.width,
        rendered.height,
        figure.style.font_family
    );
    Ok(rendered)
}

/// Record a figure's plan and drawing commands as a JSON document.
pub fn display_list(figure: &FigureSpec) -> Result<serde_json::Value> {
    let (plan, list) = rendering::compose::record(&figure.layout, &figure.style)
        .map_err(|e| e.in_figure(&figure.name))?;
    Ok(serde_json::json!({
        "figure": figure.name,
        "width": plan.width,
        "height": plan.height,
        "rows": plan.rows,
        "commands": list.commands,
    }))
}

/// Render independent figures, up to `jobs` at a time.
///
/// Each figure is rendered by one sequential pass; parallelism is only ever
/// across figures. A failing figure does not stop the others. Results come
/// back in input order.
pub fn render_all(figures: &[FigureSpec], out_dir: &Path, jobs: usize) -> Vec<Result<RenderedFigure>> {
    let jobs = jobs.max(1);
    if jobs == 1 || figures.len() < 2 {
        return figures.iter().map(|f| render_figure(f, out_dir)).collect();
    }

    let mut results: Vec<Option<Result<RenderedFigure>>> = figures.iter().map(|_| None).collect();
    let chunk = figures.len().div_ceil(jobs);
    std::thread::scope(|scope| {
        for (figs, slots) in figures.chunks(chunk).zip(results.chunks_mut(chunk)) {
            scope.spawn(move || {
                for (f, slot) in figs.iter().zip(slots.iter_mut()) {
                    *slot = Some(render_figure(f, out_dir));
                }
            });
        }
    });
    results
        .into_iter()
        .map(|r| r.unwrap_or_else(|| Err(Error::RenderError("figure worker did not run".into()))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::text::TextBlock;
    use crate::style::TextStyle;

    fn tiny(name: &str) -> FigureSpec {
        FigureSpec {
            name: name.to_string(),
            file_name: format!("{name}.png"),
            style: StyleConfig::default(),
            layout: LayoutSpec::new(2.0, 1.0)
                .region(Region::title(1.0, TextBlock::new(name, TextStyle::new(12.0)))),
        }
    }

    #[test]
    fn export_pad_follows_dpi() {
        let mut f = tiny("a");
        assert_eq!(f.export_pad(), 10);
        f.style.dpi = 200.0;
        assert_eq!(f.export_pad(), 20);
    }

    #[test]
    fn encode_attributes_errors_to_the_figure() {
        let mut f = tiny("broken");
        f.layout.regions.clear();
        match encode_figure(&f).unwrap_err() {
            Error::FigureError { name, source } => {
                assert_eq!(name, "broken");
                assert!(source.is_config());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn encode_is_repeatable() {
        let f = tiny("same");
        assert_eq!(encode_figure(&f).unwrap().png_data, encode_figure(&f).unwrap().png_data);
    }

    #[test]
    fn display_list_reports_each_figure_on_its_own() {
        let mut broken = tiny("broken");
        broken.layout.regions.clear();
        let results: Vec<_> = [broken, tiny("fine")].iter().map(display_list).collect();

        assert!(matches!(&results[0], Err(Error::FigureError { name, .. }) if name == "broken"));
        let doc = results[1].as_ref().unwrap();
        assert_eq!(doc["figure"], "fine");
        assert_eq!(doc["rows"].as_array().map(Vec::len), Some(1));
        assert!(!doc["commands"].as_array().unwrap().is_empty());
    }
}
