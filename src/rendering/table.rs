/// Table regions: one styled header row followed by body rows

use serde::Serialize;

use crate::dataset::Dataset;
use crate::rendering::layout::{Rect, RectF};
use crate::rendering::paint::{Backend, CellStyle, Stroke};
use crate::style::{Color, StyleConfig, TextStyle, Weight};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePayload {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Font size in points for every cell
    pub font_size: f64,
    pub header_fill: Color,
    pub header_bold: bool,
    pub body_fill: Color,
    /// Cell edges; `None` draws no grid lines
    pub grid: Option<Stroke>,
    /// Row height multiplier
    pub row_scale: f64,
    /// Share of the region width the table spans
    pub width_fraction: f64,
}

impl TablePayload {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            font_size: 10.0,
            header_fill: Color::rgb(0xE6, 0xE6, 0xE6),
            header_bold: true,
            body_fill: Color::WHITE,
            grid: None,
            row_scale: 1.2,
            width_fraction: 0.8,
        }
    }

    /// Table over `columns` of `data`, shown under `headers`.
    pub fn from_dataset(data: &Dataset, columns: &[&str], headers: &[&str]) -> Result<Self> {
        if columns.len() != headers.len() {
            return Err(Error::DataShapeError(format!(
                "table over '{}' selects {} columns but names {} headers",
                data.name,
                columns.len(),
                headers.len()
            )));
        }
        let rows = data
            .select(columns)?
            .into_iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect();
        Ok(Self::new(headers.iter().map(|h| h.to_string()).collect(), rows))
    }

    pub fn grid(mut self, stroke: Stroke) -> Self {
        self.grid = Some(stroke);
        self
    }

    pub fn plain_header(mut self) -> Self {
        self.header_bold = false;
        self.header_fill = self.body_fill;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.headers.is_empty() {
            return Err(Error::DataShapeError("table has no columns".into()));
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.headers.len() {
                return Err(Error::DataShapeError(format!(
                    "table row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    self.headers.len()
                )));
            }
        }
        if !(self.font_size > 0.0 && self.row_scale > 0.0) {
            return Err(Error::DataShapeError("table font size and row scale must be positive".into()));
        }
        if !(self.width_fraction > 0.0 && self.width_fraction <= 1.0) {
            return Err(Error::DataShapeError(format!(
                "table width fraction must be in (0, 1], got {}",
                self.width_fraction
            )));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.headers.len() * (self.rows.len() + 1)
    }

    pub fn render<B: Backend>(&self, bounds: Rect, style: &StyleConfig, backend: &mut B) -> Result<()> {
        let body_font = style.font(&TextStyle::new(self.font_size).color(style.foreground));
        let header_font = if self.header_bold {
            style.font(&TextStyle {
                weight: Weight::Bold,
                ..TextStyle::new(self.font_size).color(style.foreground)
            })
        } else {
            body_font.clone()
        };

        // Columns share the table width in proportion to their widest cell.
        let pad = body_font.px * 0.8;
        let natural: Vec<f64> = (0..self.headers.len())
            .map(|c| {
                let header = backend.measure_text(&self.headers[c], &header_font).0;
                self.rows
                    .iter()
                    .map(|r| backend.measure_text(&r[c], &body_font).0)
                    .fold(header, f64::max)
                    + 2.0 * pad
            })
            .collect();
        let total: f64 = natural.iter().sum();
        let area = bounds.to_f();
        let table_w = area.w * self.width_fraction;
        let widths: Vec<f64> = natural.iter().map(|w| w / total * table_w).collect();

        let row_h = body_font.px * 1.6 * self.row_scale;
        let table_h = row_h * (self.rows.len() + 1) as f64;
        if table_h > area.h {
            log::warn!(
                "table needs {:.0}px but its region is {:.0}px tall; rows are clipped",
                table_h,
                area.h
            );
        }
        let x0 = area.x + (area.w - table_w) / 2.0;
        let y0 = area.y + ((area.h - table_h) / 2.0).max(0.0);

        let header_style = CellStyle {
            fill: self.header_fill,
            font: header_font,
            edge: self.grid.clone(),
        };
        let body_style = CellStyle {
            fill: self.body_fill,
            font: body_font,
            edge: self.grid.clone(),
        };

        let all_rows = std::iter::once(&self.headers).chain(self.rows.iter());
        for (r, row) in all_rows.enumerate() {
            let cell_style = if r == 0 { &header_style } else { &body_style };
            let mut x = x0;
            for (c, text) in row.iter().enumerate() {
                let rect = RectF {
                    x,
                    y: y0 + r as f64 * row_h,
                    w: widths[c],
                    h: row_h,
                };
                backend.cell(rect, text, cell_style);
                x += widths[c];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::DisplayList;

    fn payload() -> TablePayload {
        TablePayload::new(
            vec!["Neighborhood".into(), "% Without AC".into(), "Median Income".into()],
            vec![
                vec!["Morrisania".into(), "24.2".into(), "$25k".into()],
                vec!["Hunts Point".into(), "15.7".into(), "$24k".into()],
                vec!["Upper East Side".into(), "3.1".into(), "$101k".into()],
            ],
        )
    }

    #[test]
    fn renders_columns_times_rows_plus_header() {
        let t = payload();
        let mut dl = DisplayList::new();
        t.render(Rect { x: 0, y: 0, width: 900, height: 120 }, &StyleConfig::default(), &mut dl)
            .unwrap();
        let cells = dl.cells();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells.len(), t.cell_count());
        for (i, (_, style)) in cells.iter().enumerate() {
            assert_eq!(style.font.is_bold(), i < 3, "cell {i}");
        }
        assert_eq!(cells[0].0, "Neighborhood");
        assert_eq!(cells[11].0, "$101k");
    }

    #[test]
    fn ragged_rows_are_a_shape_error() {
        let mut t = payload();
        t.rows[1].pop();
        assert!(t.validate().unwrap_err().is_data_shape());
    }

    #[test]
    fn from_dataset_formats_numbers() {
        let ds = Dataset::from_columns(
            "t",
            vec![
                ("Name", vec!["A".into()]),
                ("Pct", vec![24.24.into()]),
            ],
        )
        .unwrap();
        let t = TablePayload::from_dataset(&ds, &["Name", "Pct"], &["Name", "% AC"]).unwrap();
        assert_eq!(t.rows, vec![vec!["A".to_string(), "24.2".to_string()]]);
        assert!(TablePayload::from_dataset(&ds, &["Name"], &["a", "b"]).is_err());
    }
}
