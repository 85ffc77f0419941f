//! Error types for the ieeecheck library.

use std::io;
use thiserror::Error;

/// Result type alias for ieeecheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding or checking a manuscript.
#[derive(Error, Debug)]
pub enum Error {
    /// The input buffer is missing or too small to be a PDF.
    #[error("{0}")]
    Input(String),

    /// I/O error when reading input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// A rule registry was built from a table that breaks the weight invariants.
    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(String),

    /// Error while rendering the report.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
