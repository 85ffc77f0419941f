//! Checker configuration.

use std::ops::RangeInclusive;

/// Thresholds used by the rule engine.
///
/// The defaults encode the IEEE manuscript checks; the builder methods exist
/// for experimentation and tests.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Leading pages sampled for layout and font analysis
    pub sample_pages: usize,

    /// Blocks whose top is within this many points of the page top are
    /// treated as running headers by the column analysis
    pub header_margin: f32,

    /// Blocks whose top is within this many points of the page top are
    /// ignored by page-number detection
    pub page_number_margin: f32,

    /// Height of a y-bin in points
    pub bin_size: f32,

    /// Depth of the first-page region searched for a title, in points
    pub title_region: f32,

    /// Minimum words for a block to count as a title
    pub min_title_words: usize,

    /// Accepted abstract length in words
    pub abstract_words: RangeInclusive<usize>,

    /// Accepted body font size in points
    pub body_size: RangeInclusive<f32>,
}

impl CheckOptions {
    /// Create new check options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sampled pages.
    pub fn with_sample_pages(mut self, pages: usize) -> Self {
        self.sample_pages = pages;
        self
    }

    /// Set the running-header margin.
    pub fn with_header_margin(mut self, points: f32) -> Self {
        self.header_margin = points;
        self
    }

    /// Set the y-bin height.
    pub fn with_bin_size(mut self, points: f32) -> Self {
        self.bin_size = points;
        self
    }

    /// Set the title search region depth.
    pub fn with_title_region(mut self, points: f32) -> Self {
        self.title_region = points;
        self
    }

    /// Set the accepted abstract length.
    pub fn with_abstract_words(mut self, words: RangeInclusive<usize>) -> Self {
        self.abstract_words = words;
        self
    }

    /// Set the accepted body font size range.
    pub fn with_body_size(mut self, size: RangeInclusive<f32>) -> Self {
        self.body_size = size;
        self
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            sample_pages: 10,
            header_margin: 100.0,
            page_number_margin: 50.0,
            bin_size: 10.0,
            title_region: 200.0,
            min_title_words: 5,
            abstract_words: 100..=300,
            body_size: 8.0..=12.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CheckOptions::default();
        assert_eq!(options.sample_pages, 10);
        assert_eq!(options.header_margin, 100.0);
        assert_eq!(options.page_number_margin, 50.0);
        assert_eq!(options.abstract_words, 100..=300);
        assert_eq!(options.body_size, 8.0..=12.0);
    }

    #[test]
    fn test_check_options_builder() {
        let options = CheckOptions::new()
            .with_sample_pages(3)
            .with_bin_size(5.0)
            .with_abstract_words(50..=250);
        assert_eq!(options.sample_pages, 3);
        assert_eq!(options.bin_size, 5.0);
        assert_eq!(options.abstract_words, 50..=250);
    }
}
