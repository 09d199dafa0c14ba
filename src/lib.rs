//! Certpress Certificate Composer
//!
//! A headless certificate image generator: callers fill an in-memory draft
//! (recipient name, issuer name, optional signature), pick a visual theme,
//! and the export pipeline rasterizes the certificate deterministically into
//! a downloadable PNG with a derived filename.
//!
//! # Features
//!
//! - **Declarative Themes**: one logical component, pluggable styling
//! - **Signature Capture**: freehand ink trimming and uploaded-image decoding
//! - **Deterministic Export**: equal draft + theme + scale means identical PNG bytes
//!
//! # Example
//!
//! ```
//! use certpress::{Composer, ComposerConfig, ExportOptions, Theme};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut composer = Composer::new(ComposerConfig::default(), Theme::elite())?;
//! composer.set_recipient_name("Ada Lovelace");
//! composer.set_issuer_name("Grace Hopper");
//!
//! let artifact = composer.export(&ExportOptions::default())?;
//! assert!(artifact.filename().contains("ADA LOVELACE"));
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

// Form state holder (draft + verification token)
pub mod draft;

// Signature capture adapters (feature-gated modes)
pub mod signature;

// Declarative visual themes
pub mod theme;

// Verification URL + QR matrix
pub mod qr;

// Layout -> paint -> raster pipeline
pub mod rendering;

// The session glue object
pub mod composer;

// PNG export pipeline
pub mod export;

// Async worker-backed session facade
pub mod studio;

pub use composer::{Composer, DraftSnapshot};
pub use draft::{CertificateDraft, VerificationToken};
pub use export::{ExportOptions, ExportedArtifact};
#[cfg(feature = "freehand")]
pub use signature::SignaturePad;
pub use signature::SignatureImage;
pub use studio::Studio;
pub use theme::{Color, Theme};

/// Configuration for a composer session
///
/// Defaults are chosen for determinism: no font file means the built-in
/// stroke typeface is used, so renders are byte-identical across machines.
/// Point `font_file` at a TrueType file (or set `use_system_font`) for
/// richer glyphs at the cost of machine-dependent output.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Explicit TrueType font file for text rendering.
    pub font_file: Option<PathBuf>,
    /// Probe well-known system font paths when `font_file` is unset.
    pub use_system_font: bool,
    /// Freehand ink surface dimensions.
    pub pad_width: u32,
    pub pad_height: u32,
    /// Freehand pen stroke width in surface pixels.
    pub pen_width: f32,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            font_file: None,
            use_system_font: false,
            pad_width: 320,
            pad_height: 128,
            pen_width: 3.0,
        }
    }
}

/// Create a composer with the default (elite) theme.
pub fn new_composer(config: ComposerConfig) -> Result<Composer> {
    Composer::new(config, Theme::elite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComposerConfig::default();
        assert!(config.font_file.is_none());
        assert!(!config.use_system_font);
        assert_eq!(config.pad_width, 320);
        assert_eq!(config.pad_height, 128);
    }

    #[test]
    fn test_new_composer_uses_the_elite_theme() {
        let composer = new_composer(ComposerConfig::default()).unwrap();
        assert_eq!(composer.theme().name, "elite");
    }
}
