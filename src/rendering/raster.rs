//! Paint command execution onto an RGBA bitmap
//!
//! Everything draws through one source-over blend so transparent-background
//! themes composite correctly. Geometry arrives in logical coordinates and
//! is multiplied by the export scale here.

use image::codecs::png::PngEncoder;
use image::{imageops, ColorType, ImageEncoder, Rgba, RgbaImage};
use log::debug;
use rusttype::{point, Scale as RtScale};

use crate::error::{Error, Result};
use crate::qr::QrMatrix;
use crate::rendering::font::{self, TypeFace};
use crate::rendering::paint::{PaintCommand, TextAlign};
use crate::rendering::Scene;
use crate::theme::Color;

/// Upper bound on output pixels; larger canvases fail with `RenderCapture`
/// instead of exhausting memory.
const MAX_PIXELS: u64 = 64_000_000;

/// Rasterize the scene at the given integer scale.
pub fn rasterize(scene: &Scene, scale: u32, face: &TypeFace) -> Result<RgbaImage> {
    if scale == 0 {
        return Err(Error::InvalidInput("scale must be at least 1".to_string()));
    }
    let w = scene.width as u64 * scale as u64;
    let h = scene.height as u64 * scale as u64;
    if w == 0 || h == 0 {
        return Err(Error::RenderCapture(format!(
            "degenerate canvas {}x{}",
            w, h
        )));
    }
    if w * h > MAX_PIXELS {
        return Err(Error::RenderCapture(format!(
            "canvas {}x{} at scale {} exceeds the raster pixel budget",
            scene.width, scene.height, scale
        )));
    }
    debug!("rasterizing {}x{} at {}x scale", scene.width, scene.height, scale);

    let mut img = match scene.background {
        Some(c) => RgbaImage::from_pixel(w as u32, h as u32, Rgba([c.r, c.g, c.b, 255])),
        None => RgbaImage::from_pixel(w as u32, h as u32, Rgba([0, 0, 0, 0])),
    };
    let s = scale as f32;
    for cmd in &scene.commands {
        draw_command(&mut img, cmd, s, face);
    }
    Ok(img)
}

/// Encode an RGBA bitmap as PNG bytes.
pub(crate) fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(buf)
}

fn draw_command(img: &mut RgbaImage, cmd: &PaintCommand, s: f32, face: &TypeFace) {
    match cmd {
        PaintCommand::Fill { x, y, width, height, color } => {
            fill_rect(img, x * s, y * s, width * s, height * s, *color);
        }
        PaintCommand::Frame { x, y, width, height, thickness, color } => {
            let t = (thickness * s).max(1.0);
            let (x, y, w, h) = (x * s, y * s, width * s, height * s);
            fill_rect(img, x, y, w, t, *color);
            fill_rect(img, x, y + h - t, w, t, *color);
            fill_rect(img, x, y + t, t, h - 2.0 * t, *color);
            fill_rect(img, x + w - t, y + t, t, h - 2.0 * t, *color);
        }
        PaintCommand::Line { x0, y0, x1, y1, thickness, color } => {
            draw_segment(img, x0 * s, y0 * s, x1 * s, y1 * s, thickness * s, *color);
        }
        PaintCommand::DashedLine { x0, y0, x1, y1, thickness, dash, gap, color } => {
            draw_dashed(
                img,
                x0 * s,
                y0 * s,
                x1 * s,
                y1 * s,
                thickness * s,
                dash * s,
                gap * s,
                *color,
            );
        }
        PaintCommand::Text { x, y, px, tracking, align, color, text } => {
            draw_text(img, face, text, x * s, y * s, px * s, tracking * s, *align, *color);
        }
        PaintCommand::Polygon { points, color } => {
            let scaled: Vec<(f32, f32)> = points.iter().map(|(px, py)| (px * s, py * s)).collect();
            fill_polygon(img, &scaled, *color);
        }
        PaintCommand::Bitmap { x, y, width, height, image } => {
            draw_bitmap(img, image, x * s, y * s, width * s, height * s);
        }
        PaintCommand::QrModules { x, y, size, quiet, color, matrix } => {
            draw_qr(img, matrix, x * s, y * s, size * s, *quiet, *color);
        }
    }
}

/// Source-over blend of `color` at `coverage` into one pixel.
fn blend(img: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let sa = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let da = dst.0[3] as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 {
        return;
    }
    let mix = |sc: u8, dc: u8| -> u8 {
        let c = (sc as f32 * sa + dc as f32 * da * (1.0 - sa)) / oa;
        c.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(color.r, dst.0[0]),
        mix(color.g, dst.0[1]),
        mix(color.b, dst.0[2]),
        (oa * 255.0).round() as u8,
    ]);
}

fn fill_rect(img: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, color: Color) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let x0 = x.round() as i64;
    let y0 = y.round() as i64;
    let x1 = (x + w).round() as i64;
    let y1 = (y + h).round() as i64;
    for py in y0..y1 {
        for px in x0..x1 {
            blend(img, px, py, color, 1.0);
        }
    }
}

fn dist_to_segment(px: f32, py: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len2 = dx * dx + dy * dy;
    let t = if len2 <= f32::EPSILON {
        0.0
    } else {
        (((px - x0) * dx + (py - y0) * dy) / len2).clamp(0.0, 1.0)
    };
    let cx = x0 + t * dx;
    let cy = y0 + t * dy;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Anti-aliased stroked segment.
fn draw_segment(img: &mut RgbaImage, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, color: Color) {
    let r = (thickness / 2.0).max(0.5);
    let min_x = (x0.min(x1) - r - 1.0).floor() as i64;
    let max_x = (x0.max(x1) + r + 1.0).ceil() as i64;
    let min_y = (y0.min(y1) - r - 1.0).floor() as i64;
    let max_y = (y0.max(y1) + r + 1.0).ceil() as i64;
    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let d = dist_to_segment(px as f32 + 0.5, py as f32 + 0.5, x0, y0, x1, y1);
            let cov = (r + 0.5 - d).clamp(0.0, 1.0);
            if cov > 0.0 {
                blend(img, px, py, color, cov);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_dashed(
    img: &mut RgbaImage,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    thickness: f32,
    dash: f32,
    gap: f32,
    color: Color,
) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 0.0 || dash <= 0.0 {
        return;
    }
    let ux = dx / len;
    let uy = dy / len;
    let mut t = 0.0;
    while t < len {
        let end = (t + dash).min(len);
        draw_segment(
            img,
            x0 + ux * t,
            y0 + uy * t,
            x0 + ux * end,
            y0 + uy * end,
            thickness,
            color,
        );
        t = end + gap;
    }
}

/// Even-odd scanline fill of a simple polygon.
fn fill_polygon(img: &mut RgbaImage, points: &[(f32, f32)], color: Color) {
    if points.len() < 3 {
        return;
    }
    let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor() as i64;
    let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
    for py in min_y..=max_y {
        let yc = py as f32 + 0.5;
        let mut xs = Vec::new();
        for i in 0..points.len() {
            let (ax, ay) = points[i];
            let (bx, by) = points[(i + 1) % points.len()];
            if (ay <= yc && by > yc) || (by <= yc && ay > yc) {
                xs.push(ax + (yc - ay) / (by - ay) * (bx - ax));
            }
        }
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        for pair in xs.chunks(2) {
            if pair.len() < 2 {
                continue;
            }
            let start = (pair[0] - 0.5).ceil() as i64;
            let end = (pair[1] - 0.5).floor() as i64;
            for px in start..=end {
                blend(img, px, py, color, 1.0);
            }
        }
    }
}

fn draw_qr(img: &mut RgbaImage, matrix: &QrMatrix, x: f32, y: f32, size: f32, quiet: u32, color: Color) {
    let total = matrix.width() as f32 + 2.0 * quiet as f32;
    let module = size / total;
    for my in 0..matrix.width() {
        for mx in 0..matrix.width() {
            if !matrix.is_dark(mx, my) {
                continue;
            }
            let px = x + (mx as f32 + quiet as f32) * module;
            let py = y + (my as f32 + quiet as f32) * module;
            fill_rect(img, px, py, module, module, color);
        }
    }
}

fn draw_bitmap(img: &mut RgbaImage, src: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
    let tw = w.round().max(1.0) as u32;
    let th = h.round().max(1.0) as u32;
    let resized = if (tw, th) == (src.width(), src.height()) {
        src.clone()
    } else {
        imageops::resize(src, tw, th, imageops::FilterType::Triangle)
    };
    let ox = x.round() as i64;
    let oy = y.round() as i64;
    for (sx, sy, p) in resized.enumerate_pixels() {
        if p.0[3] == 0 {
            continue;
        }
        blend(
            img,
            ox + sx as i64,
            oy + sy as i64,
            Color::rgba(p.0[0], p.0[1], p.0[2], p.0[3]),
            1.0,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    img: &mut RgbaImage,
    face: &TypeFace,
    text: &str,
    x: f32,
    y: f32,
    px: f32,
    tracking: f32,
    align: TextAlign,
    color: Color,
) {
    if text.is_empty() {
        return;
    }
    let width = face.measure(text, px, tracking);
    let start_x = match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    };
    match face {
        TypeFace::Builtin => draw_builtin_text(img, text, start_x, y, px, tracking, color),
        TypeFace::TrueType(fnt) => {
            let scale = RtScale::uniform(px);
            let v = fnt.v_metrics(scale);
            let mut caret = start_x;
            for ch in text.chars() {
                let glyph = fnt.glyph(ch).scaled(scale).positioned(point(caret, y + v.ascent));
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, v| {
                        blend(
                            img,
                            gx as i64 + bb.min.x as i64,
                            gy as i64 + bb.min.y as i64,
                            color,
                            v,
                        );
                    });
                }
                caret += glyph.unpositioned().h_metrics().advance_width + tracking;
            }
        }
    }
}

/// Draw one run with the built-in stroke face. `y` is the top of the em box,
/// glyph baselines sit at `y + px`; small-caps glyphs align to the baseline.
fn draw_builtin_text(
    img: &mut RgbaImage,
    text: &str,
    x: f32,
    y: f32,
    px: f32,
    tracking: f32,
    color: Color,
) {
    let baseline = y + px;
    let stroke_w = (px / 9.0).max(1.0);
    let mut caret = x;
    for ch in text.chars() {
        let (glyph, small) = font::char_glyph(ch);
        let unit = px / font::UNITS * if small { font::SMALL_CAPS_RATIO } else { 1.0 };
        let mut last: Option<(f32, f32)> = None;
        for p in glyph.strokes {
            let gx = caret + (p.x - glyph.left) as f32 * unit;
            let gy = baseline + (p.y as f32 - font::UNITS) * unit;
            if p.pen {
                if let Some((lx, ly)) = last {
                    draw_segment(img, lx, ly, gx, gy, stroke_w, color);
                }
            }
            last = Some((gx, gy));
        }
        caret += font::builtin_advance(ch, px) + tracking;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    fn ink_count(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[0] < 128 && p.0[3] > 0).count()
    }

    #[test]
    fn fill_rect_marks_the_expected_area() {
        let mut img = blank(20, 20);
        fill_rect(&mut img, 5.0, 5.0, 10.0, 10.0, Color::rgb(0, 0, 0));
        assert_eq!(ink_count(&img), 100);
    }

    #[test]
    fn blend_composites_alpha_over_transparency() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        blend(&mut img, 0, 0, Color::rgba(255, 0, 0, 255), 0.5);
        let p = img.get_pixel(0, 0);
        assert_eq!(p.0[0], 255);
        assert!(p.0[3] > 100 && p.0[3] < 160);
    }

    #[test]
    fn out_of_bounds_blend_is_ignored() {
        let mut img = blank(4, 4);
        blend(&mut img, -1, 0, Color::rgb(0, 0, 0), 1.0);
        blend(&mut img, 0, 99, Color::rgb(0, 0, 0), 1.0);
        assert_eq!(ink_count(&img), 0);
    }

    #[test]
    fn builtin_text_leaves_ink() {
        let mut img = blank(200, 40);
        draw_text(
            &mut img,
            &TypeFace::Builtin,
            "HELLO",
            4.0,
            8.0,
            20.0,
            1.0,
            TextAlign::Left,
            Color::rgb(0, 0, 0),
        );
        assert!(ink_count(&img) > 50);
    }

    #[test]
    fn centered_text_straddles_the_anchor() {
        let mut img = blank(200, 40);
        draw_text(
            &mut img,
            &TypeFace::Builtin,
            "MM",
            100.0,
            8.0,
            20.0,
            1.0,
            TextAlign::Center,
            Color::rgb(0, 0, 0),
        );
        let left: usize = (0..100)
            .map(|x| (0..40).filter(|&y| img.get_pixel(x, y).0[0] < 128).count())
            .sum();
        let right: usize = (100..200)
            .map(|x| (0..40).filter(|&y| img.get_pixel(x, y).0[0] < 128).count())
            .sum();
        assert!(left > 0 && right > 0);
    }

    #[test]
    fn polygon_fill_covers_a_triangle() {
        let mut img = blank(20, 20);
        fill_polygon(
            &mut img,
            &[(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)],
            Color::rgb(0, 0, 0),
        );
        let count = ink_count(&img);
        // Roughly half the square
        assert!(count > 150 && count < 250, "got {}", count);
    }

    #[test]
    fn qr_draw_places_dark_modules() {
        let matrix = QrMatrix::encode("https://example.org/verify/x").unwrap();
        let mut img = blank(100, 100);
        draw_qr(&mut img, &matrix, 10.0, 10.0, 80.0, 2, Color::rgb(0, 0, 0));
        assert!(ink_count(&img) > 100);
    }

    #[test]
    fn rasterize_rejects_oversized_output() {
        let scene = Scene {
            width: 10_000,
            height: 10_000,
            background: None,
            commands: Vec::new(),
        };
        let err = rasterize(&scene, 4, &TypeFace::Builtin).unwrap_err();
        assert!(matches!(err, Error::RenderCapture(_)));
    }

    #[test]
    fn rasterize_applies_background_and_scale() {
        let scene = Scene {
            width: 10,
            height: 8,
            background: Some(Color::rgb(1, 2, 3)),
            commands: Vec::new(),
        };
        let img = rasterize(&scene, 3, &TypeFace::Builtin).unwrap();
        assert_eq!((img.width(), img.height()), (30, 24));
        assert_eq!(img.get_pixel(0, 0).0, [1, 2, 3, 255]);

        let transparent = Scene { background: None, ..scene };
        let img = rasterize(&transparent, 1, &TypeFace::Builtin).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn png_encoding_round_trips() {
        let img = blank(6, 4);
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
    }
}
