//! PDF buffer validation and format detection.

use crate::error::{Error, Result};

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` header
    pub header_offset: usize,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept a header anywhere in the first 1024 bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Smallest buffer that can hold a meaningful PDF.
pub const MIN_PDF_BUFFER_LEN: usize = 100;

/// Validate a raw input buffer before handing it to the decoder.
///
/// # Returns
/// * `Err(Error::Input)` if the buffer is empty or shorter than [`MIN_PDF_BUFFER_LEN`]
/// * `Err(Error::UnknownFormat)` if no PDF header is present
/// * `Ok(PdfFormat)` otherwise
pub fn validate_buffer(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < MIN_PDF_BUFFER_LEN {
        return Err(Error::Input("PDF buffer is empty or too small".to_string()));
    }
    detect_format_from_bytes(data)
}

/// Detect PDF format from bytes.
///
/// # Arguments
/// * `data` - Byte slice containing at least the start of the file
///
/// # Returns
/// * `Ok(PdfFormat)` if a valid PDF header is found
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let header_offset = window
        .windows(PDF_MAGIC_LEN)
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_start = header_offset + PDF_MAGIC_LEN;
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnknownFormat);
    }

    Ok(PdfFormat {
        version,
        header_offset,
    })
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    if version.len() != 3 {
        return false;
    }

    let chars: Vec<char> = version.chars().collect();
    chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes represent a valid PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
