//! # ieeecheck
//!
//! IEEE two-column manuscript format checker.
//!
//! This library decodes a PDF into a read-only page model (blocks, lines and
//! spans with fonts and positions) and scores it against a weighted set of
//! IEEE formatting rules: layout, title, abstract, index terms, headings,
//! figures/tables/equations, optional elements and references.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ieeecheck::{check_bytes, render};
//!
//! fn main() -> ieeecheck::Result<()> {
//!     let data = std::fs::read("paper.pdf")?;
//!
//!     // Never fails; decoding errors become a zero-score report
//!     let report = check_bytes(&data);
//!     println!("{}", render::to_json(&report, render::JsonFormat::Pretty)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout inference**: two-column detection from line geometry
//! - **Font profiling**: Times-family fonts and body size
//! - **Section detection**: abstract, index terms, headings, references
//! - **Deterministic**: identical input yields an identical report

pub mod check;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use check::{CheckOptions, Checker, Report, RuleId, RuleResult};
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use model::{BlockKind, Document, Line, Page, Rect, Span, TextBlock};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use render::JsonFormat;

use std::io::Read;

/// Check a PDF held in memory.
///
/// Any failure (empty buffer, undecodable PDF) is reported as a degraded
/// report with a single `Parsing` entry and a percentage of 0.
///
/// # Example
///
/// ```no_run
/// use ieeecheck::check_bytes;
///
/// let data = std::fs::read("paper.pdf").unwrap();
/// let report = check_bytes(&data);
/// println!("Compliance: {}%", report.percentage);
/// ```
pub fn check_bytes(data: &[u8]) -> Report {
    check_bytes_with_options(data, &CheckOptions::default())
}

/// Check a PDF held in memory with custom thresholds.
pub fn check_bytes_with_options(data: &[u8], options: &CheckOptions) -> Report {
    try_check_bytes(data, options).unwrap_or_else(|e| {
        log::warn!("Check failed: {}", e);
        Report::degraded(RuleId::Parsing, e.to_string())
    })
}

/// Check a PDF held in memory, returning decoding errors to the caller.
///
/// Pages whose content cannot be decoded are kept empty rather than
/// aborting the check.
pub fn try_check_bytes(data: &[u8], options: &CheckOptions) -> Result<Report> {
    let doc = parse_bytes_with_options(data, ParseOptions::new().lenient())?;
    Checker::with_options(options.clone())?.try_check(&doc)
}

/// Check an already decoded document.
pub fn check_document(doc: &Document) -> Report {
    check_document_with_options(doc, &CheckOptions::default())
}

/// Check an already decoded document with custom thresholds.
pub fn check_document_with_options(doc: &Document, options: &CheckOptions) -> Report {
    match Checker::with_options(options.clone()) {
        Ok(checker) => checker.check(doc),
        Err(e) => Report::degraded(RuleId::Parsing, e.to_string()),
    }
}

/// Parse a PDF from bytes.
///
/// # Example
///
/// ```no_run
/// use ieeecheck::parse_bytes;
///
/// let data = std::fs::read("paper.pdf").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = PdfParser::from_bytes(data)?;
    parser.parse()
}

/// Parse a PDF from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse a PDF from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = PdfParser::from_reader(reader)?;
    parser.parse()
}
