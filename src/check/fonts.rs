//! Font profiling over the sampled pages.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::model::Page;

use super::round_half_even;

/// Lower-case name fragments that identify a Times-family serif font.
pub const SERIF_FONT_FRAGMENTS: [&str; 4] = ["times", "roman", "tim", "tmr"];

/// Check whether a font name looks like Times New Roman or a close relative.
pub fn is_serif_font(name: &str) -> bool {
    let lower = name.to_lowercase();
    SERIF_FONT_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// First span size on the page that falls inside the body range, in
/// block, line, span order.
pub fn first_body_size(page: &Page, body_size: &RangeInclusive<f32>) -> Option<f32> {
    page.text_blocks()
        .flat_map(|b| b.spans())
        .map(|s| s.size)
        .find(|size| body_size.contains(size))
}

/// Fonts and body size observed across the sampled pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontProfile {
    /// Every font name seen on a sampled page
    pub fonts: BTreeSet<String>,
    /// The first in-range span size encountered
    pub body_font_size: Option<f32>,
}

impl FontProfile {
    /// Fold one page into the profile.
    pub fn observe(&mut self, page: &Page, body_size: &RangeInclusive<f32>) {
        self.fonts.extend(page.fonts.iter().cloned());
        if self.body_font_size.is_none() {
            self.body_font_size = first_body_size(page, body_size);
        }
    }

    /// Whether any observed font is Times-like.
    pub fn has_serif_font(&self) -> bool {
        self.fonts.iter().any(|f| is_serif_font(f))
    }

    /// Body size rounded half-to-even to a whole point.
    pub fn rounded_body_size(&self) -> Option<i64> {
        self.body_font_size
            .map(|size| round_half_even(f64::from(size)) as i64)
    }

    /// Whether the rounded body size lies inside the accepted range.
    pub fn body_size_valid(&self, body_size: &RangeInclusive<f32>) -> bool {
        self.rounded_body_size()
            .is_some_and(|size| body_size.contains(&(size as f32)))
    }
}
