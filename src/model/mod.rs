//! Read-only document views consumed by the checker.
//!
//! The PDF collaborator in [`crate::parser`] produces these types; the rule
//! engine in [`crate::check`] only reads them. Coordinates are page points with
//! a top-left origin, so `y` grows toward the bottom of the page.

mod block;
mod document;
mod page;

pub use block::{BlockKind, Line, Rect, Span, TextBlock};
pub use document::Document;
pub use page::Page;
