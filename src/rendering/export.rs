/// PNG export with tight cropping

use std::path::Path;

use png::{BitDepth, ColorType, Encoder};

use crate::rendering::layout::Rect;
use crate::rendering::raster::Canvas;
use crate::rendering::RenderedFigure;
use crate::Result;

/// Bounding box of the canvas content grown by `pad` pixels, clamped to the canvas.
///
/// A canvas with nothing drawn on it keeps its full extent.
pub fn tight_bounds(canvas: &Canvas, pad: u32) -> Rect {
    let full = Rect {
        x: 0,
        y: 0,
        width: canvas.width,
        height: canvas.height,
    };
    let Some(content) = canvas.content_bounds() else {
        return full;
    };
    let pad = pad as i32;
    let x0 = (content.x - pad).max(0);
    let y0 = (content.y - pad).max(0);
    let x1 = (content.right() + pad).min(canvas.width as i32);
    let y1 = (content.bottom() + pad).min(canvas.height as i32);
    Rect {
        x: x0,
        y: y0,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    }
}

/// RGBA8 pixels to PNG bytes. The encoder writes no time chunk, so equal
/// pixels always produce equal bytes.
pub fn encode_rgba_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
        writer.finish()?;
    }
    Ok(buf)
}

/// Crop `canvas` to its content plus `pad` pixels and encode it.
pub fn encode(canvas: &Canvas, pad: u32) -> Result<RenderedFigure> {
    let bbox = tight_bounds(canvas, pad);
    let (width, height, rgba) = canvas.crop(bbox)?;
    let png_data = encode_rgba_png(width, height, &rgba)?;
    Ok(RenderedFigure {
        width,
        height,
        bbox,
        png_data,
    })
}

/// Encode `canvas` and write it to `path`.
pub fn export(canvas: &Canvas, path: &Path, pad: u32) -> Result<RenderedFigure> {
    let figure = encode(canvas, pad)?;
    std::fs::write(path, &figure.png_data)?;
    log::debug!("wrote {} ({}x{}, {} bytes)", path.display(), figure.width, figure.height, figure.png_data.len());
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::RectF;
    use crate::rendering::paint::Backend;
    use crate::style::Color;

    #[test]
    fn crops_to_content_with_padding() {
        let mut c = Canvas::new(100, 80, Color::WHITE).unwrap();
        c.fill_rect(RectF { x: 40.0, y: 30.0, w: 10.0, h: 5.0 }, Color::BLACK);
        let b = tight_bounds(&c, 4);
        assert_eq!(b, Rect { x: 36, y: 26, width: 18, height: 13 });

        let fig = encode(&c, 4).unwrap();
        assert_eq!((fig.width, fig.height), (18, 13));
        assert_eq!(&fig.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn blank_canvas_keeps_full_extent() {
        let c = Canvas::new(30, 20, Color::WHITE).unwrap();
        assert_eq!(tight_bounds(&c, 5), Rect { x: 0, y: 0, width: 30, height: 20 });
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut c = Canvas::new(50, 50, Color::WHITE).unwrap();
        c.marker(crate::rendering::layout::Point::new(25.0, 25.0), 10.0, Color::RED, None);
        let a = encode(&c, 2).unwrap();
        let b = encode(&c, 2).unwrap();
        assert_eq!(a.png_data, b.png_data);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let c = Canvas::new(10, 10, Color::WHITE).unwrap();
        let path = std::env::temp_dir()
            .join("heatfig-missing-dir-for-export-test")
            .join("nested")
            .join("out.png");
        let err = export(&c, &path, 0).unwrap_err();
        assert!(matches!(err, crate::Error::IoError(_)));
    }
}
