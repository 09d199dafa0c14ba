//! Export pipeline: rasterize, encode, and write the certificate PNG
//!
//! The export pipeline is an explicit `Result`-returning operation.
//! Rasterization problems surface as `RenderCapture`, encoding problems as
//! `Encode`, and filesystem problems as `Io`. All of them are retryable by
//! re-running the export.

use std::path::{Path, PathBuf};

use log::debug;
use sha2::{Digest, Sha256};

use crate::composer::Composer;
use crate::error::{Error, Result};
use crate::rendering::raster::encode_png;
use crate::theme::Theme;

/// Options for one export pass.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Integer upscaling factor for print quality. The observed product
    /// range was 2x-3x; 1-4 is accepted.
    pub scale: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { scale: 2 }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.scale) {
            return Err(Error::InvalidInput(format!(
                "export scale must be between 1 and 4, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// A finished export: PNG bytes plus the derived filename. Exists in memory
/// until `write_to` performs the download analogue.
#[derive(Debug, Clone)]
pub struct ExportedArtifact {
    filename: String,
    png_data: Vec<u8>,
    width: u32,
    height: u32,
}

impl ExportedArtifact {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn png_data(&self) -> &[u8] {
        &self.png_data
    }

    /// Output dimensions in device pixels (canvas size times scale).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// SHA-256 of the PNG bytes, hex-encoded. Equal drafts, themes, and
    /// scales produce equal hashes.
    pub fn content_hash(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }

    /// Write the artifact into `dir` under its derived filename, creating
    /// the directory if needed. Returns the full path written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.png_data)?;
        debug!("wrote artifact {}", path.display());
        Ok(path)
    }
}

/// Names are unconstrained, so the display name may carry path separators
/// or dot segments; a filename must not. Separators become hyphens and any
/// leading dots are stripped before the name is joined onto a directory.
fn sanitize_filename_part(part: &str) -> String {
    part.replace(['/', '\\', ':'], "-")
        .trim_start_matches('.')
        .to_string()
}

/// `<prefix>-<badge>-<display name>.png`, the badge part omitted for
/// badgeless themes. The display name is the exact upper-cased recipient
/// (or the theme placeholder for an empty draft).
fn derive_filename(theme: &Theme, display_name: &str) -> String {
    let mut parts = vec![theme.file_prefix.clone()];
    if let Some(badge) = &theme.badge {
        parts.push(badge.clone());
    }
    parts.push(sanitize_filename_part(display_name));
    format!("{}.png", parts.join("-"))
}

impl Composer {
    /// Run the export pipeline against the current draft. A signature is
    /// never required: the default draft exports successfully with the
    /// placeholder name and dashed signature line.
    pub fn export(&mut self, options: &ExportOptions) -> Result<ExportedArtifact> {
        options.validate()?;
        let filename = derive_filename(
            self.theme(),
            self.draft().display_name(&self.theme().placeholder_name),
        );
        let img = self.render(options.scale)?;
        let (width, height) = (img.width(), img.height());
        let png_data = encode_png(img)?;
        debug!(
            "exported {} ({} bytes at {}x{})",
            filename,
            png_data.len(),
            width,
            height
        );
        Ok(ExportedArtifact {
            filename,
            png_data,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComposerConfig;

    fn composer() -> Composer {
        Composer::new(ComposerConfig::default(), Theme::elite()).unwrap()
    }

    #[test]
    fn filename_contains_the_upper_cased_recipient() {
        let mut c = composer();
        c.set_recipient_name("Ada Lovelace");
        let artifact = c.export(&ExportOptions::default()).unwrap();
        assert_eq!(artifact.filename(), "Certificate-Elite-ADA LOVELACE.png");
    }

    #[test]
    fn badgeless_theme_drops_the_badge_segment() {
        let mut c = Composer::new(ComposerConfig::default(), Theme::classic()).unwrap();
        c.set_recipient_name("Jane Doe");
        let artifact = c.export(&ExportOptions::default()).unwrap();
        assert_eq!(artifact.filename(), "Certificate-JANE DOE.png");
    }

    #[test]
    fn default_draft_exports_without_a_signature() {
        let mut c = composer();
        let artifact = c.export(&ExportOptions::default()).unwrap();
        assert!(!artifact.png_data().is_empty());
        assert_eq!(&artifact.png_data()[0..8], b"\x89PNG\r\n\x1a\n");
        assert!(artifact.filename().contains("YOUR FULL NAME"));
    }

    #[test]
    fn scale_outside_range_is_invalid_input() {
        let mut c = composer();
        for scale in [0, 5, 99] {
            let err = c.export(&ExportOptions { scale }).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "scale {}", scale);
        }
    }

    #[test]
    fn export_dimensions_follow_the_scale() {
        let mut c = composer();
        let artifact = c.export(&ExportOptions { scale: 3 }).unwrap();
        assert_eq!(artifact.dimensions(), (3000, 2100));
    }

    #[test]
    fn export_is_idempotent_and_repeatable() {
        let mut c = composer();
        c.set_recipient_name("Jane Doe");
        c.set_issue_date_display("1 January 2026");
        let a = c.export(&ExportOptions::default()).unwrap();
        let b = c.export(&ExportOptions::default()).unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.filename(), b.filename());
    }

    #[test]
    fn path_separators_in_the_name_are_sanitized_out_of_the_filename() {
        let mut c = composer();
        c.set_recipient_name("AC/DC");
        let artifact = c.export(&ExportOptions { scale: 1 }).unwrap();
        assert_eq!(artifact.filename(), "Certificate-Elite-AC-DC.png");

        let dir = std::env::temp_dir().join(format!("certpress-sanitize-{}", std::process::id()));
        let path = artifact.write_to(&dir).unwrap();
        assert!(path.starts_with(&dir));
        assert!(path.is_file());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn dot_segments_in_the_name_cannot_escape_the_directory() {
        let mut c = composer();
        c.set_recipient_name("../../escape");
        let artifact = c.export(&ExportOptions { scale: 1 }).unwrap();
        assert!(!artifact.filename().contains('/'));
        assert!(!artifact.filename().starts_with('.'));
    }

    #[test]
    fn write_to_places_the_file_under_the_derived_name() {
        let mut c = composer();
        c.set_recipient_name("Writer");
        let artifact = c.export(&ExportOptions { scale: 1 }).unwrap();
        let dir = std::env::temp_dir().join(format!("certpress-export-{}", std::process::id()));
        let path = artifact.write_to(&dir).unwrap();
        assert!(path.ends_with("Certificate-Elite-WRITER.png"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, artifact.png_data());
        std::fs::remove_dir_all(&dir).ok();
    }
}
