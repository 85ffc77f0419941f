//! PDF decoding into the read-only document model.

mod backend;
mod layout;
mod options;
mod pdf_parser;

pub use backend::{
    decode_fallback, ContentOp, FontResource, LopdfBackend, Operand, PageId, PdfBackend,
};
pub use layout::{
    group_lines_into_blocks, group_spans_into_lines, LayoutAnalyzer, PageContent, TextLine,
    TextSpan,
};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
