//! IEEE manuscript rule engine.
//!
//! A [`Checker`] samples the leading pages for layout and font evidence,
//! runs the structural section detectors over the whole document, and
//! scores the result against the weighted rule table.

mod fonts;
mod geometry;
mod options;
mod report;
mod rules;
mod sections;

pub use fonts::{first_body_size, is_serif_font, FontProfile, SERIF_FONT_FRAGMENTS};
pub use geometry::{ColumnEvidence, LayoutSummary, PageGeometry};
pub use options::CheckOptions;
pub use report::{round_percentage, Report, RuleResult};
pub use rules::{
    ieee_rules, Evaluator, Evidence, LayoutChecks, RuleId, RuleRegistry, RuleSpec,
    SuggestionBuilder, Verdict, TOTAL_WEIGHT,
};
pub use sections::{
    normalize_text, word_count, HeadingStyle, ReferencesFinding, SectionDetector,
    SectionFindings, SectionPatterns, SectionText, OPTIONAL_ELEMENTS,
};

use crate::error::{Error, Result};
use crate::model::Document;

/// Manuscript checker holding compiled patterns and the rule table.
pub struct Checker {
    options: CheckOptions,
    patterns: SectionPatterns,
    registry: RuleRegistry,
}

impl Checker {
    /// Create a checker with default thresholds.
    pub fn new() -> Result<Self> {
        Self::with_options(CheckOptions::default())
    }

    /// Create a checker with custom thresholds.
    pub fn with_options(options: CheckOptions) -> Result<Self> {
        Ok(Self {
            options,
            patterns: SectionPatterns::new(),
            registry: RuleRegistry::ieee()?,
        })
    }

    /// Thresholds in use.
    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Collect layout and font evidence from the leading pages.
    pub fn sample(&self, doc: &Document) -> (LayoutSummary, FontProfile) {
        let geometry = PageGeometry::new(&self.options);
        let mut layout = LayoutSummary::default();
        let mut fonts = FontProfile::default();

        for page in doc.leading_pages(self.options.sample_pages) {
            geometry.observe(page, &mut layout);
            fonts.observe(page, &self.options.body_size);
        }

        log::debug!(
            "Sampled {} pages: {} two-column, {} with page numbers, body size {:?}",
            layout.sampled_pages,
            layout.two_column_pages,
            layout.pages_with_page_numbers,
            fonts.body_font_size
        );
        (layout, fonts)
    }

    /// Gather all evidence for a document.
    pub fn evidence(&self, doc: &Document) -> Evidence<'_> {
        let (layout, fonts) = self.sample(doc);
        let sections = SectionDetector::new(&self.patterns, &self.options).detect(doc);
        Evidence {
            layout,
            fonts,
            sections,
            options: &self.options,
        }
    }

    /// Score a document, failing on documents without pages.
    pub fn try_check(&self, doc: &Document) -> Result<Report> {
        if doc.pages.is_empty() {
            return Err(Error::PdfParse("document has no pages".to_string()));
        }
        let report = self.registry.evaluate(&self.evidence(doc));
        log::info!("Compliance: {}%", report.percentage);
        Ok(report)
    }

    /// Score a document; failures become a degraded `Parsing` report.
    pub fn check(&self, doc: &Document) -> Report {
        self.try_check(doc).unwrap_or_else(|e| {
            log::warn!("Check failed: {}", e);
            Report::degraded(RuleId::Parsing, e.to_string())
        })
    }
}

/// Round to the nearest integer, ties to even.
pub(crate) fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - value.signum()
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(3.5), 4.0);
        assert_eq!(round_half_even(-2.5), -2.0);
        assert_eq!(round_half_even(9.96), 10.0);
        assert_eq!(round_half_even(12.4), 12.0);
    }

    #[test]
    fn test_empty_document_degraded() {
        let checker = Checker::new().unwrap();
        let report = checker.check(&Document::new());

        assert_eq!(report.percentage, 0.0);
        assert_eq!(report.details.len(), 1);
        assert_eq!(report.details[0].rule, RuleId::Parsing);
        assert!(!report.details[0].message.is_empty());
        assert!(checker.try_check(&Document::new()).is_err());
    }

    #[test]
    fn test_blank_page_scores_optional_only() {
        let checker = Checker::new().unwrap();
        let doc = Document::from_pages(vec![crate::model::Page::letter(1)]);
        let report = checker.check(&doc);

        assert_eq!(report.details.len(), 8);
        assert_eq!(report.percentage, 5.0);
    }
}
