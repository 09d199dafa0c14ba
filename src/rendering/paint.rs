//! Paint command set for the certificate scene
//!
//! The layout stage lowers the draft + theme into a flat list of these
//! commands in logical (unscaled) coordinates; the rasterizer multiplies by
//! the export scale when executing them.

use image::RgbaImage;

use crate::qr::QrMatrix;
use crate::theme::Color;

/// Horizontal anchoring of a text command relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone)]
pub enum PaintCommand {
    /// Axis-aligned filled rectangle.
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    /// Rectangle outline of the given stroke thickness, drawn inward.
    Frame {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness: f32,
        color: Color,
    },
    /// Straight stroked segment.
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        thickness: f32,
        color: Color,
    },
    /// Stroked segment broken into dashes (the signature placeholder).
    DashedLine {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        thickness: f32,
        dash: f32,
        gap: f32,
        color: Color,
    },
    /// A single run of text. `y` is the top of the em box, `px` its height.
    Text {
        x: f32,
        y: f32,
        px: f32,
        tracking: f32,
        align: TextAlign,
        color: Color,
        text: String,
    },
    /// Filled simple polygon (ribbon tails, divider star), even-odd rule.
    Polygon {
        points: Vec<(f32, f32)>,
        color: Color,
    },
    /// An RGBA bitmap resized into the given box (the signature image).
    Bitmap {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: RgbaImage,
    },
    /// QR symbol drawn dark-on-transparent inside a square of `size` logical
    /// pixels; the quiet zone is part of the square.
    QrModules {
        x: f32,
        y: f32,
        size: f32,
        quiet: u32,
        color: Color,
        matrix: QrMatrix,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_carry_logical_geometry() {
        let cmd = PaintCommand::Fill {
            x: 1.0,
            y: 2.0,
            width: 10.0,
            height: 20.0,
            color: Color::rgb(255, 0, 0),
        };
        match cmd {
            PaintCommand::Fill { width, height, .. } => {
                assert_eq!(width, 10.0);
                assert_eq!(height, 20.0);
            }
            _ => panic!("unexpected"),
        }
    }
}
