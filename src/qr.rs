//! Verification URL and QR matrix construction
//!
//! The QR payload is a pure function of the recipient name and the theme's
//! verify domain: `https://<domain>/verify/<slug>`. It is cosmetic in the
//! sense that no registry backs it, but it must be deterministic so the
//! printed code always matches the printed URL.

use qrcode::{EcLevel, QrCode};

use crate::error::{Error, Result};

/// Lower-case the name and collapse each whitespace run into one hyphen.
/// Leading and trailing runs are replaced too, not trimmed, so the slug is
/// the exact lower-cased image of the stored name.
pub fn verify_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_run {
                slug.push('-');
                in_run = true;
            }
        } else {
            slug.push(c);
            in_run = false;
        }
    }
    slug.to_lowercase()
}

/// The full verification URL encoded into the QR block.
pub fn verify_url(domain: &str, name: &str) -> String {
    format!("https://{}/verify/{}", domain, verify_slug(name))
}

/// A rendered QR symbol: dark-module flags in row-major order.
#[derive(Debug, Clone)]
pub struct QrMatrix {
    modules: Vec<bool>,
    width: usize,
}

impl QrMatrix {
    /// Encode `payload` at error-correction level H, so the symbol stays
    /// readable at the small printed size.
    pub fn encode(payload: &str) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
            .map_err(|e| Error::RenderCapture(format!("QR encoding failed: {}", e)))?;
        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        Ok(Self { modules, width })
    }

    /// Symbol width in modules, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_hyphenates_and_lower_cases() {
        assert_eq!(verify_slug("Jane Doe"), "jane-doe");
        assert_eq!(verify_slug("ADA   LOVELACE"), "ada-lovelace");
        assert_eq!(verify_slug(""), "");
    }

    #[test]
    fn edge_whitespace_runs_become_hyphens() {
        assert_eq!(verify_slug(" Jane "), "-jane-");
        assert_eq!(verify_slug("  ADA   LOVELACE "), "-ada-lovelace-");
    }

    #[test]
    fn verify_url_is_a_pure_function_of_the_name() {
        let a = verify_url("verify.certpress.dev", "Jane Doe");
        let b = verify_url("verify.certpress.dev", "Jane Doe");
        assert_eq!(a, b);
        assert_eq!(a, "https://verify.certpress.dev/verify/jane-doe");
    }

    #[test]
    fn qr_matrix_encodes_a_url() {
        let url = verify_url("verify.certpress.dev", "Jane Doe");
        let qr = QrMatrix::encode(&url).unwrap();
        assert!(qr.width() >= 21);
        // Finder pattern corner module is always dark
        assert!(qr.is_dark(0, 0));
    }

    #[test]
    fn identical_payloads_yield_identical_matrices() {
        let a = QrMatrix::encode("https://verify.certpress.dev/verify/jane-doe").unwrap();
        let b = QrMatrix::encode("https://verify.certpress.dev/verify/jane-doe").unwrap();
        assert_eq!(a.width(), b.width());
        for y in 0..a.width() {
            for x in 0..a.width() {
                assert_eq!(a.is_dark(x, y), b.is_dark(x, y));
            }
        }
    }
}
