//! PDF document parser: bytes in, read-only [`Document`] view out.

use std::io::Read;

use crate::detect::validate_buffer;
use crate::error::Result;
use crate::model::{Document, Page};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let format = validate_buffer(data)?;
        log::debug!("Detected {} ({} bytes)", format, data.len());

        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self { backend, options })
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Parse the document into pages of blocks, lines, and spans.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();
        document.version = Some(self.backend.version());

        let analyzer = LayoutAnalyzer::new(&self.backend);
        for (page_num, page_id) in self.backend.pages() {
            if !self.options.includes(page_num) {
                continue;
            }

            match analyzer.extract_page(page_num, page_id) {
                Ok(page) => document.add_page(page),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to extract page {}: {}", page_num, e);
                    let (width, height) = self.backend.page_size(page_id);
                    document.add_page(Page::new(page_num, width, height));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(document)
    }
}
