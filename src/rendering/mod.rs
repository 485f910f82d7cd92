//! Rendering pipeline: layout planning, region renderers, composition, export

pub mod compose;
pub mod export;
pub mod glyphs;
pub mod layout;
pub mod paint;
pub mod plot;
pub mod raster;
pub mod table;
pub mod text;

use sha2::{Digest, Sha256};

use layout::Rect;

/// A finished figure: PNG bytes plus where they came from on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFigure {
    pub width: u32,
    pub height: u32,
    /// Cropped area within the composed canvas
    pub bbox: Rect,
    pub png_data: Vec<u8>,
}

impl RenderedFigure {
    /// Hex SHA-256 of the PNG bytes
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}
