//! Declarative visual themes
//!
//! Each product variant of the certificate differed only in styling; the
//! composer factors that styling into a [`Theme`]: canvas size, palette,
//! frame widths, and the fixed copy printed around the draft fields. Themes
//! are plain serde data, so custom themes load from JSON files and the
//! built-in presets are just constructors.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::error::{Error, Result};

/// An RGBA color, written in theme files as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#RRGGBB` / `#RRGGBBAA` hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 && digits.len() != 8 {
            return Err(Error::InvalidInput(format!("invalid hex color: {}", s)));
        }
        let bytes = hex::decode(digits)
            .map_err(|_| Error::InvalidInput(format!("invalid hex color: {}", s)))?;
        Ok(Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: if bytes.len() == 4 { bytes[3] } else { 255 },
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// The same color with a replacement alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct HexVisitor;

        impl<'de> Visitor<'de> for HexVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a #RRGGBB or #RRGGBBAA hex color string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Color, E> {
                Color::from_hex(v).map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// A complete visual arrangement for the certificate.
///
/// The layout stage reads nothing but this struct and the draft, so a theme
/// fully determines the rendered output for a given draft. `background: None`
/// yields a transparent PNG, a deliberate per-theme choice some variants made.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,

    /// Canvas size in logical pixels (the export scale multiplies this).
    pub width: u32,
    pub height: u32,

    /// Backdrop fill; `None` exports with a transparent background.
    pub background: Option<Color>,
    /// Outer frame color and thickness.
    pub frame_color: Color,
    pub frame_width: u32,
    /// Inner decorative frame, inset from the canvas edge, 1px.
    pub inner_inset: u32,
    pub inner_frame_color: Color,

    /// Primary text color.
    pub ink: Color,
    /// Secondary/caption text color.
    pub muted: Color,
    /// Accent color: divider star, brand accent, emphasis underline.
    pub accent: Color,

    /// Brand wordmark, split so the second half renders in the accent color.
    pub brand_primary: String,
    pub brand_accent: String,
    pub tagline: String,
    /// Ribbon badge text; also part of the exported filename.
    pub badge: Option<String>,

    pub caption: String,
    pub presented_line: String,
    /// Substituted for an empty recipient name at render time.
    pub placeholder_name: String,
    /// Body copy; `body_emphasis` renders underlined between the body lines.
    pub body_intro: String,
    pub body_emphasis: String,
    pub body_outro: String,

    pub issuer_role: String,
    pub date_label: String,

    pub verify_caption: String,
    /// Domain the QR payload and verify URL point at.
    pub verify_domain: String,
    /// Prefix of the verification token, e.g. `CP` in `CP-2026-123456`.
    pub token_prefix: String,

    /// Filename prefix of the exported artifact.
    pub file_prefix: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::classic()
    }
}

impl Theme {
    /// The gold-framed 1000x700 arrangement, the richest of the presets.
    pub fn elite() -> Self {
        Self {
            name: "elite".to_string(),
            width: 1000,
            height: 700,
            background: Some(Color::rgb(0xff, 0xff, 0xff)),
            frame_color: Color::rgb(0xea, 0xb3, 0x08),
            frame_width: 16,
            inner_inset: 16,
            inner_frame_color: Color::rgb(0xea, 0xb3, 0x08).with_alpha(51),
            ink: Color::rgb(0x0f, 0x17, 0x2a),
            muted: Color::rgb(0x94, 0xa3, 0xb8),
            accent: Color::rgb(0xea, 0xb3, 0x08),
            brand_primary: "CERT".to_string(),
            brand_accent: "PRESS".to_string(),
            tagline: "THE STANDARD OF DIGITAL EXCELLENCE".to_string(),
            badge: Some("Elite".to_string()),
            caption: "CERTIFICATE OF EXCELLENCE".to_string(),
            presented_line: "This certificate is proudly presented to:".to_string(),
            placeholder_name: "YOUR FULL NAME".to_string(),
            body_intro: "has been examined and found competent in".to_string(),
            body_emphasis: "ADVANCED SOFTWARE ENGINEERING".to_string(),
            body_outro: "and is professionally recognized by the Certpress Academy.".to_string(),
            issuer_role: "Chief Executive Officer".to_string(),
            date_label: "Issued:".to_string(),
            verify_caption: "AUTHENTICITY CHECK".to_string(),
            verify_domain: "verify.certpress.dev".to_string(),
            token_prefix: "CP".to_string(),
            file_prefix: "Certificate".to_string(),
        }
    }

    /// A restrained 800x560 arrangement without the ribbon badge.
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            width: 800,
            height: 560,
            background: Some(Color::rgb(0xfd, 0xfb, 0xf7)),
            frame_color: Color::rgb(0x1e, 0x29, 0x3b),
            frame_width: 10,
            inner_inset: 12,
            inner_frame_color: Color::rgb(0x1e, 0x29, 0x3b).with_alpha(60),
            ink: Color::rgb(0x1e, 0x29, 0x3b),
            muted: Color::rgb(0x64, 0x74, 0x8b),
            accent: Color::rgb(0xb4, 0x53, 0x09),
            brand_primary: "CERT".to_string(),
            brand_accent: "PRESS".to_string(),
            tagline: "CERTIFIED ACHIEVEMENT".to_string(),
            badge: None,
            caption: "CERTIFICATE OF COMPLETION".to_string(),
            presented_line: "This certificate is awarded to:".to_string(),
            placeholder_name: "YOUR FULL NAME".to_string(),
            body_intro: "in recognition of the successful completion of".to_string(),
            body_emphasis: "THE CERTPRESS PROGRAM".to_string(),
            body_outro: "with all requirements fulfilled.".to_string(),
            issuer_role: "Program Director".to_string(),
            date_label: "Issued:".to_string(),
            verify_caption: "AUTHENTICITY CHECK".to_string(),
            verify_domain: "verify.certpress.dev".to_string(),
            token_prefix: "CP".to_string(),
            file_prefix: "Certificate".to_string(),
        }
    }

    /// A dark 1000x750 arrangement exporting with a transparent backdrop.
    pub fn midnight() -> Self {
        Self {
            name: "midnight".to_string(),
            width: 1000,
            height: 750,
            background: None,
            frame_color: Color::rgb(0x38, 0xbd, 0xf8),
            frame_width: 12,
            inner_inset: 14,
            inner_frame_color: Color::rgb(0x38, 0xbd, 0xf8).with_alpha(64),
            ink: Color::rgb(0xe2, 0xe8, 0xf0),
            muted: Color::rgb(0x94, 0xa3, 0xb8),
            accent: Color::rgb(0x38, 0xbd, 0xf8),
            brand_primary: "CERT".to_string(),
            brand_accent: "PRESS".to_string(),
            tagline: "NIGHT TRACK GRADUATE".to_string(),
            badge: Some("Night".to_string()),
            caption: "CERTIFICATE OF MASTERY".to_string(),
            presented_line: "Awarded with distinction to:".to_string(),
            placeholder_name: "YOUR FULL NAME".to_string(),
            body_intro: "for demonstrated mastery of".to_string(),
            body_emphasis: "THE MIDNIGHT CURRICULUM".to_string(),
            body_outro: "as assessed by the Certpress review board.".to_string(),
            issuer_role: "Head of Curriculum".to_string(),
            date_label: "Issued:".to_string(),
            verify_caption: "AUTHENTICITY CHECK".to_string(),
            verify_domain: "verify.certpress.dev".to_string(),
            token_prefix: "CP".to_string(),
            file_prefix: "Certificate".to_string(),
        }
    }

    /// Look up a built-in preset by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "elite" => Ok(Self::elite()),
            "classic" => Ok(Self::classic()),
            "midnight" => Ok(Self::midnight()),
            other => Err(Error::InvalidInput(format!(
                "unknown theme preset: {} (available: {})",
                other,
                Self::preset_names().join(", ")
            ))),
        }
    }

    pub fn preset_names() -> Vec<&'static str> {
        vec!["elite", "classic", "midnight"]
    }

    /// Load and validate a custom theme from a JSON file. Fields omitted in
    /// the file keep the `classic` preset's values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Theme(format!("cannot read {}: {}", path.display(), e)))?;
        let theme: Theme = serde_json::from_str(&data)
            .map_err(|e| Error::Theme(format!("cannot parse {}: {}", path.display(), e)))?;
        theme.validate()?;
        Ok(theme)
    }

    /// Reject geometrically impossible themes before the layout stage sees
    /// them.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Theme(format!(
                "canvas dimensions must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        let min_dim = self.width.min(self.height);
        if self.frame_width * 2 >= min_dim {
            return Err(Error::Theme(format!(
                "frame width {} leaves no canvas interior at {}x{}",
                self.frame_width, self.width, self.height
            )));
        }
        if self.inner_inset * 2 >= min_dim {
            return Err(Error::Theme(format!(
                "inner inset {} leaves no canvas interior at {}x{}",
                self.inner_inset, self.width, self.height
            )));
        }
        if self.verify_domain.is_empty() {
            return Err(Error::Theme("verify_domain must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_rgb_and_rgba_hex() {
        assert_eq!(Color::from_hex("#eab308").unwrap(), Color::rgb(0xea, 0xb3, 0x08));
        assert_eq!(
            Color::from_hex("eab30833").unwrap(),
            Color::rgba(0xea, 0xb3, 0x08, 0x33)
        );
        assert!(Color::from_hex("#xyz").is_err());
        assert!(Color::from_hex("#eab3").is_err());
    }

    #[test]
    fn color_round_trips_through_hex() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(Color::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn presets_validate() {
        for name in Theme::preset_names() {
            let theme = Theme::preset(name).unwrap();
            theme.validate().unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::preset("brutalist").is_err());
    }

    #[test]
    fn preset_canvases_span_the_observed_range() {
        let classic = Theme::classic();
        assert_eq!((classic.width, classic.height), (800, 560));
        let midnight = Theme::midnight();
        assert_eq!((midnight.width, midnight.height), (1000, 750));
        // Transparent backdrop is a deliberate midnight choice
        assert!(midnight.background.is_none());
        assert!(Theme::elite().background.is_some());
    }

    #[test]
    fn partial_json_theme_inherits_defaults() {
        let theme: Theme =
            serde_json::from_str(r##"{ "name": "custom", "accent": "#ff0000" }"##).unwrap();
        assert_eq!(theme.name, "custom");
        assert_eq!(theme.accent, Color::rgb(255, 0, 0));
        // Unspecified fields come from the classic preset
        assert_eq!(theme.width, Theme::classic().width);
    }

    #[test]
    fn validate_rejects_degenerate_geometry() {
        let mut theme = Theme::classic();
        theme.frame_width = 400;
        assert!(matches!(theme.validate(), Err(Error::Theme(_))));

        let mut theme = Theme::classic();
        theme.width = 0;
        assert!(matches!(theme.validate(), Err(Error::Theme(_))));
    }
}
