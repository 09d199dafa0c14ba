//! Error types for the certificate composer

use thiserror::Error;

/// Result type alias for composer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the certificate composer
///
/// Nothing here is fatal: every variant corresponds to a single user action
/// (upload, render, export, theme load) that can be retried by re-performing
/// the action. Callers at the UI boundary should surface these as dismissible
/// notifications rather than terminating the session.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration or input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An uploaded signature could not be decoded as an image
    #[error("Signature decode failed: {0}")]
    SignatureDecode(String),

    /// The certificate region could not be rasterized
    #[error("Render capture failed: {0}")]
    RenderCapture(String),

    /// PNG encoding of the rendered bitmap failed
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// Theme file could not be parsed or validated
    #[error("Theme error: {0}")]
    Theme(String),

    /// Writing the exported artifact failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
