//! Page-level types.

use std::collections::BTreeSet;

use super::{Rect, TextBlock};
use serde::{Deserialize, Serialize};

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Content blocks on the page, in reading order
    pub blocks: Vec<TextBlock>,

    /// Base font names referenced by the page
    pub fonts: BTreeSet<String>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            fonts: BTreeSet::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Record a font name used on the page.
    pub fn add_font(&mut self, name: impl Into<String>) {
        self.fonts.insert(name.into());
    }

    /// Iterate over text blocks only.
    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter(|b| b.is_text())
    }

    /// Plain text of the page: one line of output per layout line.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for line in self.text_blocks().flat_map(|b| b.lines.iter()) {
            text.push_str(&line.text());
            text.push('\n');
        }
        text
    }

    /// Raw text of the lines that fall inside a clip region.
    pub fn text_in_clip(&self, clip: &Rect) -> String {
        let mut text = String::new();
        for line in self
            .text_blocks()
            .flat_map(|b| b.lines.iter())
            .filter(|l| l.bbox.intersects(clip))
        {
            text.push_str(&line.text());
            text.push('\n');
        }
        text
    }

    /// Check if the page has no content blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Span};

    fn block(y0: f32, lines: &[&str]) -> TextBlock {
        TextBlock::text(
            lines
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let y = y0 + i as f32 * 12.0;
                    Line::new(
                        Rect::new(72.0, y, 300.0, y + 10.0),
                        vec![Span::new(*t, "Times-Roman", 10.0)],
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_page_sizes() {
        let page = Page::letter(1);
        assert_eq!(page.width, 612.0);
        assert_eq!(page.height, 792.0);
        assert!(page.is_empty());
    }

    #[test]
    fn test_plain_text_lines() {
        let mut page = Page::letter(1);
        page.add_block(block(100.0, &["first line", "second line"]));
        page.add_block(TextBlock::image(Rect::new(0.0, 0.0, 10.0, 10.0)));
        page.add_block(block(300.0, &["third"]));
        assert_eq!(page.plain_text(), "first line\nsecond line\nthird\n");
    }

    #[test]
    fn test_text_in_clip() {
        let mut page = Page::letter(1);
        page.add_block(block(50.0, &["top"]));
        page.add_block(block(400.0, &["bottom"]));
        let clip = Rect::new(0.0, 0.0, page.width, 200.0);
        assert_eq!(page.text_in_clip(&clip), "top\n");
    }

    #[test]
    fn test_fonts_are_deduplicated() {
        let mut page = Page::letter(1);
        page.add_font("Times-Roman");
        page.add_font("Times-Roman");
        page.add_font("Helvetica");
        assert_eq!(page.fonts.len(), 2);
    }
}
