//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};

/// A decoded PDF document as an ordered sequence of pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// PDF version string, when known
    pub version: Option<String>,

    /// Pages in the document
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from pages.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self {
            version: None,
            pages,
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// The first `n` pages (fewer if the document is shorter).
    pub fn leading_pages(&self, n: usize) -> &[Page] {
        &self.pages[..self.pages.len().min(n)]
    }

    /// Plain text of all pages joined with newlines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_pages() {
        let mut doc = Document::new();
        assert_eq!(doc.page_count(), 0);

        doc.add_page(Page::letter(1));
        doc.add_page(Page::letter(2));
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.get_page(2).map(|p| p.number), Some(2));
        assert!(doc.get_page(0).is_none());
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_leading_pages_is_bounded() {
        let doc = Document::from_pages((1..=3).map(Page::letter).collect());
        assert_eq!(doc.leading_pages(10).len(), 3);
        assert_eq!(doc.leading_pages(2).len(), 2);
    }
}
