//! Rendering pipeline: layout -> paint commands -> raster
//!
//! The contract is determinism: an equal draft, theme, face, and scale
//! always rasterize to identical bytes.

pub mod font;
pub mod layout;
pub mod paint;
pub mod raster;

use crate::theme::Color;
use paint::PaintCommand;

/// A laid-out certificate in logical coordinates, ready to rasterize.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Logical canvas size (pre-scale).
    pub width: u32,
    pub height: u32,
    /// Backdrop fill; `None` rasterizes onto transparency.
    pub background: Option<Color>,
    pub commands: Vec<PaintCommand>,
}
