//! Signature capture: freehand ink surface and uploaded-image decoding
//!
//! Both capture modes normalize to the same [`SignatureImage`]: an RGBA
//! bitmap plus its PNG encoding, replaced wholesale on each new capture.
//! The modes are feature-gated (`freehand`, `upload`); building with exactly
//! one reproduces the single-mode product variants.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{Rgba, RgbaImage};
use log::debug;

use crate::error::{Error, Result};
use crate::rendering::raster::encode_png;

/// A captured signature in embeddable form.
///
/// Holds the decoded RGBA pixels (what the render stage composites into the
/// certificate footer) alongside the PNG encoding (what `data_url` exposes).
#[derive(Debug, Clone)]
pub struct SignatureImage {
    bitmap: RgbaImage,
    png_data: Vec<u8>,
}

impl SignatureImage {
    /// Wrap an already-decoded RGBA bitmap, encoding it as PNG.
    pub fn from_rgba(bitmap: RgbaImage) -> Result<Self> {
        let png_data = encode_png(&bitmap)?;
        Ok(Self { bitmap, png_data })
    }

    /// Decode arbitrary uploaded image bytes (any format the codec backend
    /// understands). Undecodable input yields `Error::SignatureDecode` and
    /// leaves the caller's prior signature state untouched.
    #[cfg(feature = "upload")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::SignatureDecode(format!("not a decodable image: {}", e)))?;
        debug!(
            "decoded uploaded signature: {}x{}",
            decoded.width(),
            decoded.height()
        );
        Self::from_rgba(decoded.to_rgba8())
    }

    /// Decode a `data:` URL of the form `data:<mime>;base64,<payload>`.
    #[cfg(feature = "upload")]
    pub fn from_data_url(url: &str) -> Result<Self> {
        let payload = url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| Error::SignatureDecode("not a base64 data URL".to_string()))?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| Error::SignatureDecode(format!("invalid base64 payload: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// The signature as a base64 PNG data URL, the embeddable form capture
    /// surfaces exchange.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png_data))
    }

    pub fn png_data(&self) -> &[u8] {
        &self.png_data
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// A small opaque mark for unit tests.
    #[cfg(test)]
    pub fn test_mark(width: u32, height: u32) -> Self {
        let bitmap = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        Self::from_rgba(bitmap).expect("test mark encodes")
    }
}

/// A freehand signature drawing surface.
///
/// Pointer events accumulate ink on a fixed-size mask; lifting the pen
/// exports the tight bounding box of the ink as a [`SignatureImage`] with a
/// transparent background. Ending a stroke on an empty surface is a no-op so
/// an accidental tap never overwrites a captured signature.
#[cfg(feature = "freehand")]
pub struct SignaturePad {
    width: u32,
    height: u32,
    pen_width: f32,
    ink: Vec<bool>,
    last_point: Option<(f32, f32)>,
}

/// Upper bound on ink surface pixels; a drawing surface never approaches
/// canvas size.
#[cfg(feature = "freehand")]
const MAX_PAD_PIXELS: u64 = 16_000_000;

#[cfg(feature = "freehand")]
impl SignaturePad {
    /// Create an empty ink surface. Zero and oversized dimensions are
    /// rejected.
    pub fn new(width: u32, height: u32, pen_width: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "signature pad dimensions must be nonzero, got {}x{}",
                width, height
            )));
        }
        let pixels = width as u64 * height as u64;
        if pixels > MAX_PAD_PIXELS {
            return Err(Error::InvalidInput(format!(
                "signature pad {}x{} exceeds the ink surface budget",
                width, height
            )));
        }
        if !pen_width.is_finite() || pen_width <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "pen width must be positive, got {}",
                pen_width
            )));
        }
        Ok(Self {
            width,
            height,
            pen_width,
            ink: vec![false; pixels as usize],
            last_point: None,
        })
    }

    /// Begin a stroke at the given surface coordinate.
    pub fn pen_down(&mut self, x: f32, y: f32) {
        self.stamp(x, y);
        self.last_point = Some((x, y));
    }

    /// Continue the current stroke to the given coordinate.
    pub fn pen_move(&mut self, x: f32, y: f32) {
        if let Some((px, py)) = self.last_point {
            self.line(px, py, x, y);
        } else {
            self.stamp(x, y);
        }
        self.last_point = Some((x, y));
    }

    /// End the current stroke and export the trimmed ink region.
    ///
    /// Returns `Ok(None)` when the surface holds no ink: the caller must not
    /// replace a previously captured signature in that case.
    pub fn end_stroke(&mut self) -> Result<Option<SignatureImage>> {
        self.last_point = None;
        let Some((min_x, min_y, max_x, max_y)) = self.ink_bounds() else {
            return Ok(None);
        };
        let w = max_x - min_x + 1;
        let h = max_y - min_y + 1;
        let mut out = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]));
        for y in 0..h {
            for x in 0..w {
                if self.ink_at(min_x + x, min_y + y) {
                    out.put_pixel(x, y, Rgba([0, 0, 0, 255]));
                }
            }
        }
        debug!("captured trimmed signature: {}x{}", w, h);
        Ok(Some(SignatureImage::from_rgba(out)?))
    }

    /// Erase all ink. The caller clears the draft's signature alongside.
    pub fn clear(&mut self) {
        self.ink.iter_mut().for_each(|p| *p = false);
        self.last_point = None;
    }

    /// Whether the surface holds any ink.
    pub fn is_empty(&self) -> bool {
        !self.ink.iter().any(|&p| p)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn ink_at(&self, x: u32, y: u32) -> bool {
        self.ink[(y * self.width + x) as usize]
    }

    /// Tight bounding box of the ink as (min_x, min_y, max_x, max_y).
    fn ink_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.ink_at(x, y) {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => {
                            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
                        }
                    });
                }
            }
        }
        bounds
    }

    /// Stamp a pen-width disc at the given point.
    fn stamp(&mut self, x: f32, y: f32) {
        let r = self.pen_width / 2.0;
        let r2 = (r * r).max(0.25);
        let x0 = (x - r).floor() as i64;
        let x1 = (x + r).ceil() as i64;
        let y0 = (y - r).floor() as i64;
        let y1 = (y + r).ceil() as i64;
        for py in y0..=y1 {
            for px in x0..=x1 {
                if px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
                    continue;
                }
                let dx = px as f32 - x;
                let dy = py as f32 - y;
                if dx * dx + dy * dy <= r2 {
                    self.ink[(py as u32 * self.width + px as u32) as usize] = true;
                }
            }
        }
    }

    /// Stamp along the segment from (x0, y0) to (x1, y1).
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        let steps = (len * 2.0).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(x0 + dx * t, y0 + dy * t);
        }
    }
}
