//! Scene construction: draft + theme -> paint commands
//!
//! All geometry here is in logical theme pixels; the rasterizer applies the
//! export scale. The arrangement mirrors the certificate regions: framed
//! canvas, brand header, optional ribbon badge, centered body block, and the
//! footer's issuer column and verification panel.

use std::f32::consts::PI;

use crate::draft::CertificateDraft;
use crate::error::Result;
use crate::qr::{verify_url, QrMatrix};
use crate::rendering::font::TypeFace;
use crate::rendering::paint::{PaintCommand, TextAlign};
use crate::rendering::Scene;
use crate::theme::{Color, Theme};

const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
const NEAR_BLACK: Color = Color::rgb(0x02, 0x06, 0x17);

fn text(
    x: f32,
    y: f32,
    px: f32,
    tracking: f32,
    align: TextAlign,
    color: Color,
    s: impl Into<String>,
) -> PaintCommand {
    PaintCommand::Text {
        x,
        y,
        px,
        tracking,
        align,
        color,
        text: s.into(),
    }
}

fn darken(c: Color, factor: f32) -> Color {
    Color::rgba(
        (c.r as f32 * factor) as u8,
        (c.g as f32 * factor) as u8,
        (c.b as f32 * factor) as u8,
        c.a,
    )
}

/// Vertices of a five-pointed star centered at (cx, cy).
fn star_points(cx: f32, cy: f32, r: f32) -> Vec<(f32, f32)> {
    (0..10)
        .map(|i| {
            let angle = -PI / 2.0 + i as f32 * PI / 5.0;
            let rad = if i % 2 == 0 { r } else { r * 0.45 };
            (cx + rad * angle.cos(), cy + rad * angle.sin())
        })
        .collect()
}

/// Lay out the full certificate scene for the given draft and theme.
///
/// Deterministic: two calls with equal drafts, themes, and faces produce
/// identical command lists, which is what makes exports reproducible.
pub fn compose_scene(draft: &CertificateDraft, theme: &Theme, face: &TypeFace) -> Result<Scene> {
    theme.validate()?;

    let w = theme.width as f32;
    let h = theme.height as f32;
    let margin = theme.frame_width as f32 + 32.0;
    let center_x = w / 2.0;
    let mut cmds = Vec::new();

    // Frames: outer border plus the 1px inner decorative inset.
    cmds.push(PaintCommand::Frame {
        x: 0.0,
        y: 0.0,
        width: w,
        height: h,
        thickness: theme.frame_width as f32,
        color: theme.frame_color,
    });
    let inset = theme.inner_inset as f32;
    cmds.push(PaintCommand::Frame {
        x: inset,
        y: inset,
        width: w - 2.0 * inset,
        height: h - 2.0 * inset,
        thickness: 1.0,
        color: theme.inner_frame_color,
    });

    // Header: brand wordmark with accent half, tagline underneath.
    let brand_px = 40.0;
    let brand_y = margin;
    cmds.push(text(
        margin,
        brand_y,
        brand_px,
        1.0,
        TextAlign::Left,
        theme.ink,
        theme.brand_primary.clone(),
    ));
    let primary_w = face.measure(&theme.brand_primary, brand_px, 1.0);
    cmds.push(text(
        margin + primary_w + 2.0,
        brand_y,
        brand_px,
        1.0,
        TextAlign::Left,
        theme.accent,
        theme.brand_accent.clone(),
    ));
    cmds.push(text(
        margin,
        brand_y + brand_px + 10.0,
        10.0,
        4.0,
        TextAlign::Left,
        theme.muted,
        theme.tagline.clone(),
    ));

    // Ribbon badge hanging over the right edge of the header.
    if let Some(badge) = &theme.badge {
        ribbon(&mut cmds, theme, badge, w);
    }

    // Centered body block.
    let caption_y = h * 0.24;
    cmds.push(text(
        center_x,
        caption_y,
        11.0,
        6.0,
        TextAlign::Center,
        theme.muted,
        theme.caption.clone(),
    ));
    cmds.push(text(
        center_x,
        caption_y + 26.0,
        12.0,
        0.5,
        TextAlign::Center,
        theme.muted,
        theme.presented_line.clone(),
    ));

    let name_px = 52.0;
    let name_y = caption_y + 56.0;
    let display_name = draft.display_name(&theme.placeholder_name);
    cmds.push(text(
        center_x,
        name_y,
        name_px,
        1.5,
        TextAlign::Center,
        theme.ink,
        display_name,
    ));

    // Divider: two rules flanking a star.
    let divider_y = name_y + name_px + 28.0;
    let rule_w = 80.0;
    let rule_gap = 22.0;
    let rule_color = theme.muted.with_alpha(90);
    cmds.push(PaintCommand::Line {
        x0: center_x - rule_gap - rule_w,
        y0: divider_y,
        x1: center_x - rule_gap,
        y1: divider_y,
        thickness: 2.0,
        color: rule_color,
    });
    cmds.push(PaintCommand::Line {
        x0: center_x + rule_gap,
        y0: divider_y,
        x1: center_x + rule_gap + rule_w,
        y1: divider_y,
        thickness: 2.0,
        color: rule_color,
    });
    cmds.push(PaintCommand::Polygon {
        points: star_points(center_x, divider_y, 9.0),
        color: theme.accent,
    });

    // Body copy with the emphasized middle line underlined.
    let body_y = divider_y + 24.0;
    cmds.push(text(
        center_x,
        body_y,
        13.0,
        0.5,
        TextAlign::Center,
        theme.muted,
        theme.body_intro.clone(),
    ));
    let emphasis_px = 15.0;
    let emphasis_y = body_y + 24.0;
    cmds.push(text(
        center_x,
        emphasis_y,
        emphasis_px,
        1.0,
        TextAlign::Center,
        theme.ink,
        theme.body_emphasis.clone(),
    ));
    let emphasis_w = face.measure(&theme.body_emphasis, emphasis_px, 1.0);
    cmds.push(PaintCommand::Fill {
        x: center_x - emphasis_w / 2.0,
        y: emphasis_y + emphasis_px + 4.0,
        width: emphasis_w,
        height: 3.0,
        color: theme.accent,
    });
    cmds.push(text(
        center_x,
        emphasis_y + 28.0,
        13.0,
        0.5,
        TextAlign::Center,
        theme.muted,
        theme.body_outro.clone(),
    ));

    // Footer left: signature over the issuer block.
    let foot_top = h - margin - 150.0;
    let sig_box_h = 80.0;
    let sig_box_w = 240.0;
    if let Some(sig) = draft.signature() {
        // Fit the trimmed bitmap into the box, bottom-aligned, keeping aspect.
        let sw = sig.width() as f32;
        let sh = sig.height() as f32;
        let fit = (sig_box_h / sh).min(sig_box_w / sw);
        let draw_w = sw * fit;
        let draw_h = sh * fit;
        cmds.push(PaintCommand::Bitmap {
            x: margin,
            y: foot_top + sig_box_h - draw_h,
            width: draw_w,
            height: draw_h,
            image: sig.bitmap().clone(),
        });
    } else {
        cmds.push(PaintCommand::DashedLine {
            x0: margin,
            y0: foot_top + sig_box_h - 14.0,
            x1: margin + 160.0,
            y1: foot_top + sig_box_h - 14.0,
            thickness: 1.5,
            dash: 6.0,
            gap: 5.0,
            color: theme.muted,
        });
    }
    cmds.push(PaintCommand::Line {
        x0: margin,
        y0: foot_top + sig_box_h + 12.0,
        x1: margin + 220.0,
        y1: foot_top + sig_box_h + 12.0,
        thickness: 2.0,
        color: theme.ink,
    });
    cmds.push(text(
        margin,
        foot_top + sig_box_h + 22.0,
        15.0,
        0.5,
        TextAlign::Left,
        theme.ink,
        draft.issuer_name().to_uppercase(),
    ));
    cmds.push(text(
        margin,
        foot_top + sig_box_h + 44.0,
        8.0,
        2.0,
        TextAlign::Left,
        theme.accent,
        theme.issuer_role.to_uppercase(),
    ));
    cmds.push(text(
        margin,
        foot_top + sig_box_h + 60.0,
        8.0,
        1.0,
        TextAlign::Left,
        theme.muted,
        format!("{} {}", theme.date_label, draft.issue_date_display()).to_uppercase(),
    ));

    // Footer right: verification panel with token pill and QR card.
    let panel_w = 260.0;
    let panel_h = 118.0;
    let panel_x = w - margin - panel_w;
    let panel_y = h - margin - panel_h;
    let panel_fill = if theme.background.is_some() {
        Color::rgb(0xf8, 0xfa, 0xfc)
    } else {
        WHITE.with_alpha(18)
    };
    cmds.push(PaintCommand::Fill {
        x: panel_x,
        y: panel_y,
        width: panel_w,
        height: panel_h,
        color: panel_fill,
    });

    let qr_card = 86.0;
    let qr_x = panel_x + panel_w - 16.0 - qr_card;
    let qr_y = panel_y + (panel_h - qr_card) / 2.0;
    cmds.push(PaintCommand::Fill {
        x: qr_x,
        y: qr_y,
        width: qr_card,
        height: qr_card,
        color: WHITE,
    });
    let qr = QrMatrix::encode(&verify_url(&theme.verify_domain, draft.recipient_name()))?;
    cmds.push(PaintCommand::QrModules {
        x: qr_x + 8.0,
        y: qr_y + 8.0,
        size: 70.0,
        quiet: 2,
        color: NEAR_BLACK,
        matrix: qr,
    });

    let label_x = qr_x - 14.0;
    cmds.push(text(
        label_x,
        panel_y + 18.0,
        8.0,
        2.0,
        TextAlign::Right,
        theme.muted,
        theme.verify_caption.clone(),
    ));
    cmds.push(text(
        label_x,
        panel_y + 34.0,
        8.0,
        0.5,
        TextAlign::Right,
        theme.muted,
        theme.verify_domain.clone(),
    ));
    let pill_text = format!("ID: {}", draft.verification());
    let pill_px = 8.0;
    let pill_text_w = face.measure(&pill_text, pill_px, 0.5);
    let pill_w = pill_text_w + 20.0;
    let pill_h = 18.0;
    let pill_x = label_x - pill_w;
    let pill_y = panel_y + 50.0;
    cmds.push(PaintCommand::Fill {
        x: pill_x,
        y: pill_y,
        width: pill_w,
        height: pill_h,
        color: NEAR_BLACK,
    });
    cmds.push(text(
        pill_x + pill_w / 2.0,
        pill_y + (pill_h - pill_px) / 2.0,
        pill_px,
        0.5,
        TextAlign::Center,
        WHITE,
        pill_text,
    ));

    Ok(Scene {
        width: theme.width,
        height: theme.height,
        background: theme.background,
        commands: cmds,
    })
}

/// The hanging ribbon badge in the top-right corner.
fn ribbon(cmds: &mut Vec<PaintCommand>, theme: &Theme, badge: &str, w: f32) {
    let rw = 100.0;
    let rh = 150.0;
    let rx = w - 160.0;
    let ry = theme.frame_width as f32;
    let cx = rx + rw / 2.0;
    let body = darken(theme.accent, 0.78);
    let tail = darken(theme.accent, 0.62);

    cmds.push(PaintCommand::Fill {
        x: rx,
        y: ry,
        width: rw,
        height: rh,
        color: body,
    });
    cmds.push(text(cx, ry + 12.0, 7.0, 1.5, TextAlign::Center, WHITE, "CERTIFICATE"));
    cmds.push(text(
        cx,
        ry + 24.0,
        9.0,
        1.5,
        TextAlign::Center,
        WHITE,
        badge.to_uppercase(),
    ));
    cmds.push(PaintCommand::Fill {
        x: cx - 24.0,
        y: ry + 46.0,
        width: 48.0,
        height: 48.0,
        color: NEAR_BLACK,
    });
    cmds.push(PaintCommand::Polygon {
        points: star_points(cx, ry + 62.0, 6.0),
        color: WHITE,
    });
    cmds.push(text(
        cx,
        ry + 72.0,
        14.0,
        1.0,
        TextAlign::Center,
        WHITE,
        theme.token_prefix.clone(),
    ));
    cmds.push(text(
        cx,
        ry + rh - 18.0,
        6.0,
        1.0,
        TextAlign::Center,
        WHITE.with_alpha(180),
        "OFFICIAL VERIFIED",
    ));
    // Ribbon tails: two triangles forming the bottom notch.
    cmds.push(PaintCommand::Polygon {
        points: vec![(rx, ry + rh), (cx, ry + rh), (cx, ry + rh + 16.0)],
        color: tail,
    });
    cmds.push(PaintCommand::Polygon {
        points: vec![(cx, ry + rh), (rx + rw, ry + rh), (cx, ry + rh + 16.0)],
        color: tail,
    });
}
