/// Title, subtitle and caption regions: one centered line of text

use serde::Serialize;

use crate::rendering::layout::{Rect, RectF};
use crate::rendering::paint::{Anchor, Backend, Stroke};
use crate::style::{Color, StyleConfig, TextStyle};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub style: TextStyle,
    /// Draw a white box with a gray border behind the text
    pub boxed: bool,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            boxed: false,
        }
    }

    pub fn boxed(mut self) -> Self {
        self.boxed = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.contains('\n') {
            return Err(Error::DataShapeError(
                "text blocks hold a single line".into(),
            ));
        }
        if !(self.style.size.is_finite() && self.style.size > 0.0) {
            return Err(Error::DataShapeError(format!(
                "text size must be positive, got {}",
                self.style.size
            )));
        }
        Ok(())
    }

    pub fn render<B: Backend>(&self, bounds: Rect, style: &StyleConfig, backend: &mut B) -> Result<()> {
        let font = style.font(&self.style);
        let area = bounds.to_f();
        let center = area.center();

        let (w, h) = backend.measure_text(&self.text, &font);
        if w > area.w {
            log::warn!(
                "text {:?} is {:.0}px wide in a {:.0}px region; overflow is clipped",
                self.text,
                w,
                area.w
            );
        }

        if self.boxed {
            let pad = font.px * 0.5;
            let rect = RectF {
                x: center.x - w / 2.0 - pad,
                y: center.y - h / 2.0 - pad,
                w: w + 2.0 * pad,
                h: h + 2.0 * pad,
            };
            backend.fill_rect(rect, Color::WHITE);
            backend.stroke_rect(rect, &Stroke::solid(Color::GRAY, 1.0));
        }
        backend.text(center, &self.text, &font, Anchor::CENTER, 0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::{DisplayList, PaintCommand};

    #[test]
    fn text_is_centered_in_bounds() {
        let block = TextBlock::new("3-day HI Trigger", TextStyle::new(18.0).bold());
        let bounds = Rect { x: 0, y: 100, width: 400, height: 60 };
        let mut dl = DisplayList::new();
        block.render(bounds, &StyleConfig::default(), &mut dl).unwrap();
        match &dl.commands[..] {
            [PaintCommand::Text { at, anchor, .. }] => {
                assert_eq!(at.x, 200.0);
                assert_eq!(at.y, 130.0);
                assert_eq!(*anchor, Anchor::CENTER);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn boxed_text_draws_frame_first() {
        let block = TextBlock::new("HVI 5 = Brownsville", TextStyle::new(9.0)).boxed();
        let mut dl = DisplayList::new();
        block
            .render(Rect { x: 0, y: 0, width: 300, height: 40 }, &StyleConfig::default(), &mut dl)
            .unwrap();
        assert!(matches!(dl.commands[0], PaintCommand::SolidRect { .. }));
        assert!(matches!(dl.commands.last(), Some(PaintCommand::Text { .. })));
    }

    #[test]
    fn multi_line_text_is_rejected() {
        let block = TextBlock::new("a\nb", TextStyle::new(10.0));
        assert!(block.validate().unwrap_err().is_data_shape());
    }
}
