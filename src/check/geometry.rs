//! Page geometry analysis: column inference and page-number detection.

use std::collections::BTreeMap;

use regex::Regex;

use crate::model::Page;

use super::options::CheckOptions;
use super::round_half_even;

/// Share of eligible y-bins that must show a column gap for a page to be
/// two-column.
const TWO_COLUMN_BIN_RATIO: f64 = 0.5;

/// Column evidence collected from a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnEvidence {
    /// Bins holding at least two lines
    pub eligible_bins: usize,
    /// Eligible bins whose lines are split by a wide horizontal gap
    pub split_bins: usize,
}

impl ColumnEvidence {
    /// Whether the page reads as two-column.
    pub fn is_two_column(&self) -> bool {
        self.eligible_bins > 0
            && self.split_bins as f64 / self.eligible_bins as f64 > TWO_COLUMN_BIN_RATIO
    }
}

/// Aggregated layout facts over the sampled pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutSummary {
    pub sampled_pages: usize,
    pub two_column_pages: usize,
    pub pages_with_page_numbers: usize,
}

impl LayoutSummary {
    /// At least half of the sampled pages are two-column.
    pub fn two_columns(&self) -> bool {
        self.two_column_pages * 2 >= self.sampled_pages
    }

    /// No sampled page carries a standalone page number.
    pub fn no_page_numbers(&self) -> bool {
        self.pages_with_page_numbers == 0
    }
}

/// Per-page geometric analysis.
pub struct PageGeometry<'a> {
    options: &'a CheckOptions,
    page_number_regex: Regex,
}

impl<'a> PageGeometry<'a> {
    /// Create a geometry analyzer with the given thresholds.
    pub fn new(options: &'a CheckOptions) -> Self {
        Self {
            options,
            page_number_regex: Regex::new(r"^\s*\d+\s*$").unwrap(),
        }
    }

    /// Bin line x-positions by vertical position and look for column gaps.
    ///
    /// Blocks starting within the header margin are skipped. A bin shows a
    /// split when the widest gap between its sorted x-positions exceeds a
    /// quarter of the page width.
    pub fn column_evidence(&self, page: &Page) -> ColumnEvidence {
        let bin_size = f64::from(self.options.bin_size);
        let mut bins: BTreeMap<i64, Vec<f32>> = BTreeMap::new();

        for block in page
            .text_blocks()
            .filter(|b| b.top() > self.options.header_margin)
        {
            for line in &block.lines {
                let key = round_half_even(f64::from(line.bbox.y0) / bin_size) as i64;
                bins.entry(key).or_default().push(line.bbox.x0);
            }
        }

        let gap_threshold = page.width / 4.0;
        let mut evidence = ColumnEvidence::default();
        for xs in bins.values_mut().filter(|xs| xs.len() >= 2) {
            evidence.eligible_bins += 1;
            xs.sort_by(|a, b| a.total_cmp(b));
            let max_gap = xs
                .windows(2)
                .map(|w| w[1] - w[0])
                .fold(f32::NEG_INFINITY, f32::max);
            if max_gap > gap_threshold {
                evidence.split_bins += 1;
            }
        }
        evidence
    }

    /// Whether the page carries a block consisting only of digits below the
    /// top margin.
    pub fn has_page_number(&self, page: &Page) -> bool {
        page.text_blocks()
            .filter(|b| b.top() > self.options.page_number_margin)
            .any(|b| self.page_number_regex.is_match(b.text_content().trim()))
    }

    /// Fold one page into a running layout summary.
    pub fn observe(&self, page: &Page, summary: &mut LayoutSummary) {
        summary.sampled_pages += 1;

        let evidence = self.column_evidence(page);
        let two_column = evidence.is_two_column();
        if two_column {
            summary.two_column_pages += 1;
        }

        let page_number = self.has_page_number(page);
        if page_number {
            summary.pages_with_page_numbers += 1;
        }

        log::debug!(
            "Page {}: {}/{} split bins, two-column={}, page number={}",
            page.number,
            evidence.split_bins,
            evidence.eligible_bins,
            two_column,
            page_number
        );
    }
}
