//! Block, line and span types.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in top-left-origin page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Check whether two rectangles overlap (touching edges count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// Union of an iterator of rectangles, or `None` when it is empty.
    pub fn enclosing<'a, I: IntoIterator<Item = &'a Rect>>(rects: I) -> Option<Rect> {
        rects.into_iter().fold(None, |acc, r| match acc {
            None => Some(*r),
            Some(a) => Some(a.union(r)),
        })
    }
}

/// A run of text sharing one font and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font name (e.g., "Times-Roman")
    pub font: String,
    /// Font size in points
    pub size: f32,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            size,
        }
    }
}

/// A visual line of spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub bbox: Rect,
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a new line.
    pub fn new(bbox: Rect, spans: Vec<Span>) -> Self {
        Self { bbox, spans }
    }

    /// Span texts joined with single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Kind of a page block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Text with lines and spans
    #[default]
    Text,
    /// An image or other non-text content
    Image,
}

/// A block of content on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub bbox: Rect,
    pub kind: BlockKind,
    pub lines: Vec<Line>,
}

impl TextBlock {
    /// Create a text block whose bounding box encloses its lines.
    pub fn text(lines: Vec<Line>) -> Self {
        let bbox = Rect::enclosing(lines.iter().map(|l| &l.bbox)).unwrap_or_default();
        Self {
            bbox,
            kind: BlockKind::Text,
            lines,
        }
    }

    /// Create a non-text block (image) covering `bbox`.
    pub fn image(bbox: Rect) -> Self {
        Self {
            bbox,
            kind: BlockKind::Image,
            lines: Vec::new(),
        }
    }

    /// Whether this is a text block.
    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }

    /// Top y-coordinate of the block.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// All span texts of the block joined with single spaces.
    pub fn text_content(&self) -> String {
        self.spans()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Iterate spans in line order, then span order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f32, y0: f32, text: &str) -> Line {
        Line::new(
            Rect::new(x0, y0, x0 + 100.0, y0 + 10.0),
            vec![Span::new(text, "Times-Roman", 10.0)],
        )
    }

    #[test]
    fn test_rect_union_and_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 30.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 20.0, 30.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&Rect::new(11.0, 11.0, 12.0, 12.0)));
    }

    #[test]
    fn test_text_block_bbox_encloses_lines() {
        let block = TextBlock::text(vec![line(50.0, 120.0, "a"), line(60.0, 132.0, "b")]);
        assert_eq!(block.bbox, Rect::new(50.0, 120.0, 160.0, 142.0));
        assert_eq!(block.top(), 120.0);
        assert!(block.is_text());
    }

    #[test]
    fn test_text_content_joins_spans() {
        let mut first = line(0.0, 0.0, "Deep");
        first.spans.push(Span::new("Learning", "Times-Bold", 10.0));
        let block = TextBlock::text(vec![first, line(0.0, 12.0, "Rocks")]);
        assert_eq!(block.text_content(), "Deep Learning Rocks");
    }

    #[test]
    fn test_image_block_has_no_text() {
        let block = TextBlock::image(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert!(!block.is_text());
        assert_eq!(block.text_content(), "");
    }
}
