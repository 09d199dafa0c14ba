//! Form state holder: the in-memory certificate draft
//!
//! A [`CertificateDraft`] owns every field the render pipeline reads:
//! recipient name, issuer name, the formatted issue date, the optional
//! signature image, and the frozen verification token. The draft is
//! transient and single-session; nothing is persisted.

use chrono::{Datelike, Local};
use rand::Rng;

use crate::signature::SignatureImage;

/// A cosmetic certificate identifier of the form `<prefix>-<year>-<serial>`.
///
/// The token is generated once when the draft is created and frozen for the
/// draft's lifetime: re-rendering never regenerates it, so the string shown
/// on screen is the string baked into the export. `from_parts` exists as the
/// hook for deriving tokens from a real issuance record later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    prefix: String,
    year: i32,
    serial: u32,
}

impl VerificationToken {
    /// Generate a fresh token: current year plus a random 6-digit serial.
    pub fn generate(prefix: &str) -> Self {
        let serial = rand::thread_rng().gen_range(100_000..1_000_000);
        Self {
            prefix: prefix.to_string(),
            year: Local::now().year(),
            serial,
        }
    }

    /// Build a token from explicit parts (stable across sessions).
    pub fn from_parts(prefix: &str, year: i32, serial: u32) -> Self {
        Self {
            prefix: prefix.to_string(),
            year,
            serial,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }
}

impl std::fmt::Display for VerificationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{:06}", self.prefix, self.year, self.serial)
    }
}

/// The current, unsaved certificate field values for the active session.
///
/// Mutations are plain setters with no validation and no error conditions:
/// empty names are stored as-is, and the render layer substitutes the theme
/// placeholder only at draw time. The recipient name is normalized to
/// upper-case on input, matching what the certificate displays.
#[derive(Debug, Clone)]
pub struct CertificateDraft {
    recipient_name: String,
    issuer_name: String,
    issue_date_display: String,
    signature: Option<SignatureImage>,
    verification: VerificationToken,
}

impl CertificateDraft {
    /// Create an empty draft. The issue date is formatted once, here, and is
    /// read-only afterwards; the verification token is generated and frozen.
    pub fn new(token_prefix: &str) -> Self {
        Self {
            recipient_name: String::new(),
            issuer_name: String::new(),
            issue_date_display: Local::now().format("%-d %B %Y").to_string(),
            signature: None,
            verification: VerificationToken::generate(token_prefix),
        }
    }

    /// Store the recipient name, upper-cased. No length limit, no charset
    /// restriction; the empty string is permitted.
    pub fn set_recipient_name(&mut self, name: &str) {
        self.recipient_name = name.to_uppercase();
    }

    /// Store the issuer (signer) name as typed.
    pub fn set_issuer_name(&mut self, name: &str) {
        self.issuer_name = name.to_string();
    }

    /// Replace the signature wholesale. `None` clears it.
    pub fn set_signature(&mut self, signature: Option<SignatureImage>) {
        self.signature = signature;
    }

    /// Replace the frozen verification token, e.g. when re-issuing from a
    /// recorded certificate.
    pub fn set_verification(&mut self, token: VerificationToken) {
        self.verification = token;
    }

    /// Override the formatted issue date. Intended for re-issuing recorded
    /// certificates and for deterministic rendering in tests; interactive
    /// sessions never call this.
    pub fn set_issue_date_display(&mut self, display: &str) {
        self.issue_date_display = display.to_string();
    }

    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    pub fn issuer_name(&self) -> &str {
        &self.issuer_name
    }

    pub fn issue_date_display(&self) -> &str {
        &self.issue_date_display
    }

    pub fn signature(&self) -> Option<&SignatureImage> {
        self.signature.as_ref()
    }

    pub fn verification(&self) -> &VerificationToken {
        &self.verification
    }

    /// Resolve the name the certificate displays: the stored upper-cased
    /// recipient, or `placeholder` when the stored name is empty. The layout
    /// never renders a blank name line.
    pub fn display_name<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.recipient_name.is_empty() {
            placeholder
        } else {
            &self.recipient_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_name_is_upper_cased_on_input() {
        let mut draft = CertificateDraft::new("CP");
        draft.set_recipient_name("Ada Lovelace");
        assert_eq!(draft.recipient_name(), "ADA LOVELACE");
    }

    #[test]
    fn empty_name_falls_back_to_placeholder_at_render_time_only() {
        let mut draft = CertificateDraft::new("CP");
        draft.set_recipient_name("");
        // Storage keeps the empty string
        assert_eq!(draft.recipient_name(), "");
        // Resolution substitutes the placeholder
        assert_eq!(draft.display_name("YOUR FULL NAME"), "YOUR FULL NAME");
    }

    #[test]
    fn issue_date_is_computed_once_and_not_mutated_by_setters() {
        let mut draft = CertificateDraft::new("CP");
        let date = draft.issue_date_display().to_string();
        assert!(!date.is_empty());
        draft.set_recipient_name("SOMEONE");
        draft.set_issuer_name("Someone Else");
        assert_eq!(draft.issue_date_display(), date);
    }

    #[test]
    fn verification_token_is_frozen_per_draft() {
        let mut draft = CertificateDraft::new("CP");
        let token = draft.verification().clone();
        draft.set_recipient_name("A");
        draft.set_recipient_name("B");
        assert_eq!(draft.verification(), &token);
    }

    #[test]
    fn verification_token_formats_as_prefix_year_serial() {
        let token = VerificationToken::from_parts("CP", 2026, 123456);
        assert_eq!(token.to_string(), "CP-2026-123456");
        // Serials below 100000 are zero-padded to six digits
        let token = VerificationToken::from_parts("CP", 2026, 7);
        assert_eq!(token.to_string(), "CP-2026-000007");
    }

    #[test]
    fn generated_serial_is_six_digits() {
        for _ in 0..32 {
            let token = VerificationToken::generate("CP");
            assert!(token.serial() >= 100_000 && token.serial() < 1_000_000);
        }
    }

    #[test]
    fn signature_is_replaced_wholesale() {
        let mut draft = CertificateDraft::new("CP");
        assert!(draft.signature().is_none());
        draft.set_signature(Some(SignatureImage::test_mark(4, 4)));
        assert!(draft.signature().is_some());
        draft.set_signature(None);
        assert!(draft.signature().is_none());
    }
}
