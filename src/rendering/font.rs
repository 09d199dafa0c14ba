//! Typefaces for the raster stage
//!
//! Two faces are supported. The built-in face is a small-caps stroke
//! typeface encoded as compact polyline glyphs, so rendering needs no font
//! assets and is byte-deterministic across machines. A TrueType face can be
//! loaded explicitly (or discovered from well-known system paths) for
//! richer output; glyph coverage then comes from the font file.

use std::path::{Path, PathBuf};

use rusttype::{point, Font, Scale};

use crate::error::{Error, Result};

/// One point of a glyph polyline. `pen` false moves the pen, true draws.
#[derive(Debug, Copy, Clone)]
pub struct PackedPoint {
    pub x: i8,
    pub y: i8,
    pub pen: bool,
}

/// A stroke glyph on a 12-unit cap-height grid (y grows downward, baseline
/// at 12, descenders below it).
#[derive(Debug, Copy, Clone)]
pub struct Glyph {
    pub left: i8,
    pub right: i8,
    pub strokes: &'static [PackedPoint],
}

/// Grid units per em: a `px`-sized glyph scales by `px / UNITS`.
pub const UNITS: f32 = 12.0;
/// Inter-glyph gap in grid units.
pub const GAP: f32 = 3.0;
/// Lowercase input renders as reduced capitals at this ratio.
pub const SMALL_CAPS_RATIO: f32 = 0.78;

macro_rules! strokes {
    ($(($x:expr, $y:expr, $p:expr)),* $(,)?) => {
        &[$(PackedPoint { x: $x, y: $y, pen: $p }),*]
    };
}

const M: bool = false; // move
const D: bool = true; // draw

static GLYPH_A: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,12,M),(4,0,D),(8,12,D),(2,8,M),(6,8,D)] };
static GLYPH_B: Glyph = Glyph { left: 0, right: 7, strokes: strokes![(0,12,M),(0,0,D),(5,0,D),(7,2,D),(7,4,D),(5,6,D),(0,6,D),(5,6,M),(7,8,D),(7,10,D),(5,12,D),(0,12,D)] };
static GLYPH_C: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,2,M),(6,0,D),(2,0,D),(0,2,D),(0,10,D),(2,12,D),(6,12,D),(8,10,D)] };
static GLYPH_D: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(0,12,D),(5,12,D),(8,9,D),(8,3,D),(5,0,D),(0,0,D)] };
static GLYPH_E: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,0,M),(0,0,D),(0,12,D),(8,12,D),(0,6,M),(6,6,D)] };
static GLYPH_F: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,0,M),(0,0,D),(0,12,D),(0,6,M),(6,6,D)] };
static GLYPH_G: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,2,M),(6,0,D),(2,0,D),(0,2,D),(0,10,D),(2,12,D),(6,12,D),(8,10,D),(8,7,D),(5,7,D)] };
static GLYPH_H: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(0,12,D),(8,0,M),(8,12,D),(0,6,M),(8,6,D)] };
static GLYPH_I: Glyph = Glyph { left: 0, right: 6, strokes: strokes![(1,0,M),(5,0,D),(3,0,M),(3,12,D),(1,12,M),(5,12,D)] };
static GLYPH_J: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,0,M),(8,10,D),(6,12,D),(2,12,D),(0,10,D)] };
static GLYPH_K: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(0,12,D),(8,0,M),(0,6,D),(3,4,M),(8,12,D)] };
static GLYPH_L: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(0,12,D),(8,12,D)] };
static GLYPH_M: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,12,M),(0,0,D),(4,6,D),(8,0,D),(8,12,D)] };
static GLYPH_N: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,12,M),(0,0,D),(8,12,D),(8,0,D)] };
static GLYPH_O: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(2,0,M),(6,0,D),(8,2,D),(8,10,D),(6,12,D),(2,12,D),(0,10,D),(0,2,D),(2,0,D)] };
static GLYPH_P: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,12,M),(0,0,D),(6,0,D),(8,2,D),(8,5,D),(6,7,D),(0,7,D)] };
static GLYPH_Q: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(2,0,M),(6,0,D),(8,2,D),(8,10,D),(6,12,D),(2,12,D),(0,10,D),(0,2,D),(2,0,D),(5,9,M),(8,12,D)] };
static GLYPH_R: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,12,M),(0,0,D),(6,0,D),(8,2,D),(8,5,D),(6,7,D),(0,7,D),(3,7,M),(8,12,D)] };
static GLYPH_S: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,2,M),(6,0,D),(2,0,D),(0,2,D),(0,4,D),(2,6,D),(6,6,D),(8,8,D),(8,10,D),(6,12,D),(2,12,D),(0,10,D)] };
static GLYPH_T: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(8,0,D),(4,0,M),(4,12,D)] };
static GLYPH_U: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(0,10,D),(2,12,D),(6,12,D),(8,10,D),(8,0,D)] };
static GLYPH_V: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(4,12,D),(8,0,D)] };
static GLYPH_W: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(2,12,D),(4,4,D),(6,12,D),(8,0,D)] };
static GLYPH_X: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(8,12,D),(8,0,M),(0,12,D)] };
static GLYPH_Y: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(4,6,D),(8,0,D),(4,6,M),(4,12,D)] };
static GLYPH_Z: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(8,0,D),(0,12,D),(8,12,D)] };

static GLYPH_0: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(2,0,M),(6,0,D),(8,2,D),(8,10,D),(6,12,D),(2,12,D),(0,10,D),(0,2,D),(2,0,D),(2,9,M),(6,3,D)] };
static GLYPH_1: Glyph = Glyph { left: 0, right: 6, strokes: strokes![(1,2,M),(3,0,D),(3,12,D),(1,12,M),(5,12,D)] };
static GLYPH_2: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,2,M),(2,0,D),(6,0,D),(8,2,D),(8,4,D),(0,12,D),(8,12,D)] };
static GLYPH_3: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,2,M),(2,0,D),(6,0,D),(8,2,D),(8,4,D),(6,6,D),(3,6,D),(6,6,M),(8,8,D),(8,10,D),(6,12,D),(2,12,D),(0,10,D)] };
static GLYPH_4: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(6,12,M),(6,0,D),(0,8,D),(8,8,D)] };
static GLYPH_5: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,0,M),(0,0,D),(0,6,D),(6,6,D),(8,8,D),(8,10,D),(6,12,D),(2,12,D),(0,10,D)] };
static GLYPH_6: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,2,M),(6,0,D),(2,0,D),(0,2,D),(0,10,D),(2,12,D),(6,12,D),(8,10,D),(8,8,D),(6,6,D),(0,6,D)] };
static GLYPH_7: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,0,M),(8,0,D),(3,12,D)] };
static GLYPH_8: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(2,0,M),(6,0,D),(8,2,D),(8,4,D),(6,6,D),(2,6,D),(0,4,D),(0,2,D),(2,0,D),(2,6,M),(0,8,D),(0,10,D),(2,12,D),(6,12,D),(8,10,D),(8,8,D),(6,6,D)] };
static GLYPH_9: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,10,M),(2,12,D),(6,12,D),(8,10,D),(8,2,D),(6,0,D),(2,0,D),(0,2,D),(0,4,D),(2,6,D),(8,6,D)] };

static GLYPH_HYPHEN: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(1,6,M),(7,6,D)] };
static GLYPH_PERIOD: Glyph = Glyph { left: 0, right: 4, strokes: strokes![(1,11,M),(3,11,D),(3,12,D),(1,12,D),(1,11,D)] };
static GLYPH_COMMA: Glyph = Glyph { left: 0, right: 4, strokes: strokes![(3,11,M),(1,14,D)] };
static GLYPH_COLON: Glyph = Glyph { left: 0, right: 4, strokes: strokes![(2,4,M),(2,5,D),(2,10,M),(2,11,D)] };
static GLYPH_SLASH: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,12,M),(8,0,D)] };
static GLYPH_APOS: Glyph = Glyph { left: 0, right: 3, strokes: strokes![(2,0,M),(1,3,D)] };
static GLYPH_AMP: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(8,12,M),(0,4,D),(0,2,D),(2,0,D),(4,0,D),(6,2,D),(6,4,D),(0,8,D),(0,10,D),(2,12,D),(5,12,D),(8,8,D)] };
static GLYPH_QUESTION: Glyph = Glyph { left: 0, right: 8, strokes: strokes![(0,2,M),(2,0,D),(6,0,D),(8,2,D),(8,4,D),(4,7,D),(4,9,D),(4,11,M),(4,12,D)] };
static GLYPH_EXCLAIM: Glyph = Glyph { left: 0, right: 4, strokes: strokes![(2,0,M),(2,8,D),(2,11,M),(2,12,D)] };
/// Unknown characters advance without marking the canvas.
static GLYPH_FALLBACK: Glyph = Glyph { left: 0, right: 6, strokes: strokes![] };
static GLYPH_SPACE: Glyph = Glyph { left: 0, right: 5, strokes: strokes![] };

/// Look up the stroke glyph for a capital (or digit/punctuation) character.
pub fn glyph(c: char) -> &'static Glyph {
    match c {
        'A' => &GLYPH_A, 'B' => &GLYPH_B, 'C' => &GLYPH_C, 'D' => &GLYPH_D,
        'E' => &GLYPH_E, 'F' => &GLYPH_F, 'G' => &GLYPH_G, 'H' => &GLYPH_H,
        'I' => &GLYPH_I, 'J' => &GLYPH_J, 'K' => &GLYPH_K, 'L' => &GLYPH_L,
        'M' => &GLYPH_M, 'N' => &GLYPH_N, 'O' => &GLYPH_O, 'P' => &GLYPH_P,
        'Q' => &GLYPH_Q, 'R' => &GLYPH_R, 'S' => &GLYPH_S, 'T' => &GLYPH_T,
        'U' => &GLYPH_U, 'V' => &GLYPH_V, 'W' => &GLYPH_W, 'X' => &GLYPH_X,
        'Y' => &GLYPH_Y, 'Z' => &GLYPH_Z,
        '0' => &GLYPH_0, '1' => &GLYPH_1, '2' => &GLYPH_2, '3' => &GLYPH_3,
        '4' => &GLYPH_4, '5' => &GLYPH_5, '6' => &GLYPH_6, '7' => &GLYPH_7,
        '8' => &GLYPH_8, '9' => &GLYPH_9,
        '-' => &GLYPH_HYPHEN, '.' => &GLYPH_PERIOD, ',' => &GLYPH_COMMA,
        ':' => &GLYPH_COLON, '/' => &GLYPH_SLASH, '\'' => &GLYPH_APOS,
        '&' => &GLYPH_AMP, '?' => &GLYPH_QUESTION, '!' => &GLYPH_EXCLAIM,
        ' ' => &GLYPH_SPACE,
        _ => &GLYPH_FALLBACK,
    }
}

/// Per-character metrics for the built-in face: the glyph to draw and
/// whether it renders at small-caps size.
pub fn char_glyph(c: char) -> (&'static Glyph, bool) {
    if c.is_lowercase() {
        let upper = c.to_uppercase().next().unwrap_or(c);
        (glyph(upper), true)
    } else {
        (glyph(c), false)
    }
}

/// Advance width of one built-in glyph at size `px`, excluding tracking.
pub fn builtin_advance(c: char, px: f32) -> f32 {
    let (g, small) = char_glyph(c);
    let scale = px / UNITS * if small { SMALL_CAPS_RATIO } else { 1.0 };
    ((g.right - g.left) as f32 + GAP) * scale
}

/// The glyph face used by the raster stage.
pub enum TypeFace {
    /// The built-in small-caps stroke face; fully deterministic.
    Builtin,
    /// A loaded TrueType font.
    TrueType(Font<'static>),
}

impl TypeFace {
    /// Load a TrueType face from a font file.
    pub fn load_truetype(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::RenderCapture(format!("cannot read font {}: {}", path.display(), e)))?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            Error::RenderCapture(format!("unusable font file: {}", path.display()))
        })?;
        Ok(TypeFace::TrueType(font))
    }

    /// Probe well-known system font locations and return the first hit.
    pub fn find_system_font() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
    }

    /// Width of `text` at size `px` with per-character `tracking`.
    pub fn measure(&self, text: &str, px: f32, tracking: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match self {
            TypeFace::Builtin => {
                let mut w = 0.0;
                for c in text.chars() {
                    w += builtin_advance(c, px) + tracking;
                }
                w - tracking
            }
            TypeFace::TrueType(font) => {
                let scale = Scale::uniform(px);
                let v = font.v_metrics(scale);
                let mut w = 0.0;
                for g in font.layout(text, scale, point(0.0, v.ascent)) {
                    w += g.unpositioned().h_metrics().advance_width + tracking;
                }
                w - tracking
            }
        }
    }
}
