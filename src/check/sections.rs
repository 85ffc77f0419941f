//! Structural section detection over document text.
//!
//! Detectors run on two derived views of the document: the lower-cased
//! plain text (line breaks kept) and a compatibility-normalized,
//! whitespace-collapsed copy used for the references header.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Document, Rect};

use super::options::CheckOptions;

/// Numbering style of a detected heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    /// "I. Introduction"
    Roman,
    /// "A. Background"
    Lettered,
    /// "1. Methods"
    Numeric,
}

impl HeadingStyle {
    /// Label used in report messages.
    pub fn label(&self) -> &'static str {
        match self {
            HeadingStyle::Roman => "Level 1",
            HeadingStyle::Lettered => "Level 2",
            HeadingStyle::Numeric => "Numeric",
        }
    }
}

/// Optional manuscript elements, in reporting order.
pub const OPTIONAL_ELEMENTS: [&str; 4] = [
    "Note to Practitioners",
    "Nomenclature",
    "Appendix",
    "Acknowledgements",
];

/// Compiled patterns shared by all detectors.
pub struct SectionPatterns {
    title_filters: Vec<Regex>,
    abstract_body: Regex,
    index_terms_body: Regex,
    term_separator: Regex,
    term_noise: Regex,
    headings: Vec<(HeadingStyle, Regex)>,
    labelled_object: Regex,
    optional: Vec<(&'static str, Regex)>,
    references_header: Regex,
    numbered_citation: Regex,
}

impl SectionPatterns {
    /// Compile every detector pattern.
    pub fn new() -> Self {
        Self {
            // Applied to upper-cased candidate text.
            title_filters: vec![
                Regex::new(
                    r"IEEE|VOL\.|NO\.|\d{4}|\b(?:SPECIAL SECTION|TRANSACTIONS|JOURNAL|ACCESS)\b",
                )
                .unwrap(),
                Regex::new(r"^\s*\d+\s*$").unwrap(),
                Regex::new(r"RECEIVED\s+THE\b|MEMBER|IEEE|DATE\s+OF\s+PUBLICATION").unwrap(),
                Regex::new(r"^[A-Z]+\s+\d{4}$").unwrap(),
                Regex::new(r"^\[\d+\]").unwrap(),
                Regex::new(r"^(?:[A-Z]\.\s*)+[A-Z]+").unwrap(),
            ],
            abstract_body: Regex::new(
                r"(?i)abstract\s*[-—]?\s*(?s:(.*?))(?:\n\s*(?:index\s+terms|keywords|i\.|\d+\.|references)|\s*\z)",
            )
            .unwrap(),
            index_terms_body: Regex::new(
                r"(?i)(?:index\s+terms|keywords)\s*[-—]?\s*(?s:(.*?))(?:\n{2,}|\n\s*[a-z0-9]+\s*[-—]|\n\s*(?:i\.|\d+\.|references|manuscript)|\s*\z)",
            )
            .unwrap(),
            term_separator: Regex::new(r"[,;]").unwrap(),
            term_noise: Regex::new(r"(?i)received|revised|accepted|publication|supported|e-mail")
                .unwrap(),
            headings: vec![
                (
                    HeadingStyle::Roman,
                    Regex::new(r"\n\s*[ivx]+\.\s+[a-z]+").unwrap(),
                ),
                (
                    HeadingStyle::Lettered,
                    Regex::new(r"\n\s*[a-z]\.\s+[a-z]+").unwrap(),
                ),
                (
                    HeadingStyle::Numeric,
                    Regex::new(r"\n\s*\d+\.?\s*[a-z]+").unwrap(),
                ),
            ],
            labelled_object: Regex::new(r"(?:figure|fig\.?|table)\s+[ivxlcdm\d]+|\(\d+\)").unwrap(),
            optional: vec![
                (
                    OPTIONAL_ELEMENTS[0],
                    Regex::new(r"(?im)note\s+to\s+practitioners").unwrap(),
                ),
                (OPTIONAL_ELEMENTS[1], Regex::new(r"(?im)nomenclature").unwrap()),
                (OPTIONAL_ELEMENTS[2], Regex::new(r"(?im)appendix").unwrap()),
                (
                    OPTIONAL_ELEMENTS[3],
                    Regex::new(r"(?im)acknowledg\s*(?:e|ements|ments)").unwrap(),
                ),
            ],
            references_header: Regex::new(
                r"references|bibliography|works\s*cited|reference\s*list",
            )
            .unwrap(),
            numbered_citation: Regex::new(r"(?:^|\D)\[\d+\](?:\D|$)").unwrap(),
        }
    }
}

impl Default for SectionPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Text views derived once per document.
#[derive(Debug, Clone)]
pub struct SectionText {
    /// Lower-cased plain text, line breaks kept
    pub full_text: String,
    /// NFKD-normalized, lower-cased text with whitespace runs collapsed
    pub normalized_text: String,
}

impl SectionText {
    /// Build both text views from a document.
    pub fn from_document(doc: &Document) -> Self {
        let raw = doc.plain_text();
        Self {
            full_text: raw.to_lowercase(),
            normalized_text: normalize_text(&raw),
        }
    }
}

/// NFKD-normalize, map non-breaking spaces to spaces, lower-case and
/// collapse whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    let decomposed: String = text.nfkd().collect();
    decomposed
        .replace('\u{a0}', " ")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// References section and numbered-citation evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferencesFinding {
    pub has_section: bool,
    pub has_citations: bool,
}

/// Everything the structural detectors found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionFindings {
    /// Title text, when a qualifying block was found
    pub title: Option<String>,
    /// Abstract word count, when an abstract was found
    pub abstract_words: Option<usize>,
    /// Index terms, when an "Index Terms"/"Keywords" label was found
    pub index_terms: Option<Vec<String>>,
    /// Heading styles present, in fixed order
    pub headings: Vec<HeadingStyle>,
    /// Whether any figure, table or equation label was found
    pub figures_tables_equations: bool,
    /// Optional elements present, in fixed order
    pub optional_elements: Vec<&'static str>,
    pub references: ReferencesFinding,
}

/// Runs every structural detector over a document.
pub struct SectionDetector<'a> {
    patterns: &'a SectionPatterns,
    options: &'a CheckOptions,
}

impl<'a> SectionDetector<'a> {
    pub fn new(patterns: &'a SectionPatterns, options: &'a CheckOptions) -> Self {
        Self { patterns, options }
    }

    /// Run all detectors.
    pub fn detect(&self, doc: &Document) -> SectionFindings {
        let text = SectionText::from_document(doc);
        SectionFindings {
            title: self.detect_title(doc),
            abstract_words: self.detect_abstract(&text.full_text),
            index_terms: self.detect_index_terms(&text.full_text),
            headings: self.detect_headings(&text.full_text),
            figures_tables_equations: self.detect_figures_tables_equations(doc),
            optional_elements: self.detect_optional_elements(&text.full_text),
            references: self.detect_references(&text),
        }
    }

    fn is_title_candidate(&self, upper: &str) -> bool {
        !upper.is_empty()
            && !self.patterns.title_filters.iter().any(|re| re.is_match(upper))
            && word_count(upper) >= self.options.min_title_words
    }

    /// Find a title in the top region of the first page.
    ///
    /// Text blocks are scanned in order until one starts below the region.
    /// When none qualifies, the lines clipped to the region are tried one
    /// at a time.
    pub fn detect_title(&self, doc: &Document) -> Option<String> {
        let page = doc.pages.first()?;
        let region = self.options.title_region;

        for block in &page.blocks {
            if !block.is_text() || block.lines.is_empty() {
                continue;
            }
            if block.top() > region {
                break;
            }
            let text = block.text_content();
            let text = text.trim();
            if self.is_title_candidate(&text.to_uppercase()) {
                return Some(text.to_string());
            }
        }

        let clip = Rect::new(0.0, 0.0, page.width, region);
        page.text_in_clip(&clip)
            .lines()
            .map(str::trim)
            .find(|line| self.is_title_candidate(&line.to_uppercase()))
            .map(str::to_string)
    }

    /// Word count of the abstract body, if an abstract is present.
    pub fn detect_abstract(&self, full_text: &str) -> Option<usize> {
        self.patterns
            .abstract_body
            .captures(full_text)
            .and_then(|caps| caps.get(1))
            .map(|body| word_count(body.as_str().trim()))
    }

    /// Terms listed after an "Index Terms" or "Keywords" label.
    ///
    /// Terms are split on commas and semicolons; empty terms and
    /// submission-note noise are dropped.
    pub fn detect_index_terms(&self, full_text: &str) -> Option<Vec<String>> {
        let caps = self.patterns.index_terms_body.captures(full_text)?;
        let body = caps.get(1).map_or("", |m| m.as_str()).trim();

        let terms = self
            .patterns
            .term_separator
            .split(body)
            .map(|t| t.trim().trim_start_matches(':').trim().trim_end_matches('.'))
            .filter(|t| !t.is_empty() && !self.patterns.term_noise.is_match(t))
            .map(str::to_string)
            .collect();
        Some(terms)
    }

    /// Heading styles present in the text.
    pub fn detect_headings(&self, full_text: &str) -> Vec<HeadingStyle> {
        self.patterns
            .headings
            .iter()
            .filter(|(_, re)| re.is_match(full_text))
            .map(|(style, _)| *style)
            .collect()
    }

    /// Whether any text block on any page carries a figure, table or
    /// numbered-equation label.
    pub fn detect_figures_tables_equations(&self, doc: &Document) -> bool {
        doc.pages
            .iter()
            .flat_map(|p| p.text_blocks())
            .filter(|b| !b.lines.is_empty())
            .any(|b| {
                self.patterns
                    .labelled_object
                    .is_match(&b.text_content().to_lowercase())
            })
    }

    /// Optional elements mentioned anywhere in the text.
    pub fn detect_optional_elements(&self, full_text: &str) -> Vec<&'static str> {
        self.patterns
            .optional
            .iter()
            .filter(|(_, re)| re.is_match(full_text))
            .map(|(name, _)| *name)
            .collect()
    }

    /// References header and numbered citation markers.
    pub fn detect_references(&self, text: &SectionText) -> ReferencesFinding {
        ReferencesFinding {
            has_section: self.patterns.references_header.is_match(&text.normalized_text),
            has_citations: self.patterns.numbered_citation.is_match(&text.full_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Page, Span, TextBlock};

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn block(y0: f32, text: &str) -> TextBlock {
        TextBlock::text(vec![Line::new(
            Rect::new(72.0, y0, 540.0, y0 + 12.0),
            vec![Span::new(text, "Times-Roman", 10.0)],
        )])
    }

    fn first_page(blocks: Vec<TextBlock>) -> Document {
        let mut page = Page::letter(1);
        for b in blocks {
            page.add_block(b);
        }
        Document::from_pages(vec![page])
    }

    fn with_detector<T>(f: impl FnOnce(&SectionDetector) -> T) -> T {
        let patterns = SectionPatterns::new();
        let options = CheckOptions::default();
        f(&SectionDetector::new(&patterns, &options))
    }

    #[test]
    fn test_title_skips_journal_banner() {
        let doc = first_page(vec![
            block(30.0, "IEEE TRANSACTIONS ON ROBOTICS, VOL. 12, NO. 3, 2024"),
            block(80.0, "Learning to Grasp Unknown Objects Quickly"),
        ]);
        let title = with_detector(|d| d.detect_title(&doc));
        assert_eq!(
            title.as_deref(),
            Some("Learning to Grasp Unknown Objects Quickly")
        );
    }

    #[test]
    fn test_title_requires_five_words() {
        let doc = first_page(vec![block(80.0, "Short Title Here")]);
        assert_eq!(with_detector(|d| d.detect_title(&doc)), None);
    }

    #[test]
    fn test_title_filters_author_initials() {
        let doc = first_page(vec![block(80.0, "J. SMITH and A. B. JONES of the lab")]);
        assert_eq!(with_detector(|d| d.detect_title(&doc)), None);
    }

    #[test]
    fn test_title_scan_stops_below_region() {
        let doc = first_page(vec![block(250.0, "A Perfectly Good Title Down Low")]);
        assert_eq!(with_detector(|d| d.detect_title(&doc)), None);
    }

    #[test]
    fn test_title_clip_fallback_line_by_line() {
        let mut banner = block(60.0, "IEEE ACCESS");
        banner.lines.push(Line::new(
            Rect::new(72.0, 90.0, 540.0, 102.0),
            vec![Span::new("Robust Planning Under Partial Observability", "Times-Bold", 24.0)],
        ));
        let doc = first_page(vec![banner]);
        let title = with_detector(|d| d.detect_title(&doc));
        assert_eq!(
            title.as_deref(),
            Some("Robust Planning Under Partial Observability")
        );
    }

    #[test]
    fn test_title_empty_document() {
        assert_eq!(with_detector(|d| d.detect_title(&Document::new())), None);
    }

    #[test]
    fn test_abstract_word_count() {
        let text = format!("title\nabstract—{}\nindex terms—robots, ai\n", words(150));
        assert_eq!(with_detector(|d| d.detect_abstract(&text)), Some(150));
    }

    #[test]
    fn test_abstract_runs_to_end_of_text() {
        let text = format!("abstract {}", words(42));
        assert_eq!(with_detector(|d| d.detect_abstract(&text)), Some(42));
    }

    #[test]
    fn test_abstract_stops_at_first_heading() {
        let text = format!("abstract {}\ni. introduction\n{}", words(120), words(500));
        assert_eq!(with_detector(|d| d.detect_abstract(&text)), Some(120));
    }

    #[test]
    fn test_abstract_missing() {
        assert_eq!(with_detector(|d| d.detect_abstract("no summary here")), None);
    }

    #[test]
    fn test_index_terms_split_and_filtered() {
        let text = "index terms—machine learning, robotics; control.\n\ni. introduction";
        let terms = with_detector(|d| d.detect_index_terms(text));
        assert_eq!(
            terms,
            Some(vec![
                "machine learning".to_string(),
                "robotics".to_string(),
                "control".to_string(),
            ])
        );
    }

    #[test]
    fn test_index_terms_drop_noise() {
        let text = "keywords: vision, manuscript received may 1\n\n";
        let terms = with_detector(|d| d.detect_index_terms(text));
        assert_eq!(terms, Some(vec!["vision".to_string()]));
    }

    #[test]
    fn test_index_terms_label_without_terms() {
        let text = "index terms\n\n";
        assert_eq!(with_detector(|d| d.detect_index_terms(text)), Some(vec![]));
        assert_eq!(with_detector(|d| d.detect_index_terms("nothing")), None);
    }

    #[test]
    fn test_headings_styles() {
        let text = "title\ni. introduction\na. background\n2. methods\n";
        let styles = with_detector(|d| d.detect_headings(text));
        assert_eq!(
            styles,
            vec![
                HeadingStyle::Roman,
                HeadingStyle::Lettered,
                HeadingStyle::Numeric
            ]
        );
        assert!(with_detector(|d| d.detect_headings("i. introduction")).is_empty());
    }

    #[test]
    fn test_figures_tables_equations() {
        let doc = first_page(vec![block(300.0, "As shown in Fig. 3, the error drops")]);
        assert!(with_detector(|d| d.detect_figures_tables_equations(&doc)));

        let doc = first_page(vec![block(300.0, "E = mc^2 (12)")]);
        assert!(with_detector(|d| d.detect_figures_tables_equations(&doc)));

        let doc = first_page(vec![block(300.0, "plain prose without labels")]);
        assert!(!with_detector(|d| d.detect_figures_tables_equations(&doc)));
    }

    #[test]
    fn test_optional_elements_in_order() {
        let text = "acknowledgments\nthe authors thank\nappendix a\n";
        let found = with_detector(|d| d.detect_optional_elements(text));
        assert_eq!(found, vec!["Appendix", "Acknowledgements"]);
    }

    #[test]
    fn test_references_header_normalized() {
        let text = SectionText {
            full_text: "see [3] for details\nr\u{a0}eferences".to_string(),
            normalized_text: normalize_text("Works\u{a0}Cited"),
        };
        let found = with_detector(|d| d.detect_references(&text));
        assert!(found.has_section);
        assert!(found.has_citations);
    }

    #[test]
    fn test_numbered_citation_boundaries() {
        let text = |s: &str| SectionText {
            full_text: s.to_string(),
            normalized_text: String::new(),
        };
        assert!(with_detector(|d| d.detect_references(&text("[1]"))).has_citations);
        assert!(with_detector(|d| d.detect_references(&text("as in [12].\n"))).has_citations);
        assert!(!with_detector(|d| d.detect_references(&text("x2[1]"))).has_citations);
        assert!(!with_detector(|d| d.detect_references(&text("[1]5"))).has_citations);
        assert!(!with_detector(|d| d.detect_references(&text("see [a]"))).has_citations);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Reference\u{a0}\n List "), "reference list");
        assert_eq!(normalize_text("ﬁgure"), "figure");
    }
}
