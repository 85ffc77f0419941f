//! Rule identifiers, evaluators and the weighted rule registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::fonts::FontProfile;
use super::geometry::LayoutSummary;
use super::options::CheckOptions;
use super::report::{round_percentage, Report, RuleResult};
use super::sections::SectionFindings;

/// Total weight of the scored rules.
pub const TOTAL_WEIGHT: u32 = 100;

/// Words of the detected title quoted in the Title message.
const TITLE_MESSAGE_WORDS: usize = 12;

/// Identifier of a report entry.
///
/// The first eight variants are scored rules, in report order. `Parsing`
/// and `Input` only appear in degraded reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    Layout,
    Title,
    Abstract,
    #[serde(rename = "Index Terms")]
    IndexTerms,
    Headings,
    #[serde(rename = "Figures/Tables/Equations")]
    FiguresTablesEquations,
    #[serde(rename = "Optional Elements")]
    OptionalElements,
    References,
    Parsing,
    Input,
}

impl RuleId {
    /// Scored rules in report order.
    pub const SCORED: [RuleId; 8] = [
        RuleId::Layout,
        RuleId::Title,
        RuleId::Abstract,
        RuleId::IndexTerms,
        RuleId::Headings,
        RuleId::FiguresTablesEquations,
        RuleId::OptionalElements,
        RuleId::References,
    ];

    /// Display name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            RuleId::Layout => "Layout",
            RuleId::Title => "Title",
            RuleId::Abstract => "Abstract",
            RuleId::IndexTerms => "Index Terms",
            RuleId::Headings => "Headings",
            RuleId::FiguresTablesEquations => "Figures/Tables/Equations",
            RuleId::OptionalElements => "Optional Elements",
            RuleId::References => "References",
            RuleId::Parsing => "Parsing",
            RuleId::Input => "Input",
        }
    }

    /// Whether the rule contributes to the percentage.
    pub fn is_scored(&self) -> bool {
        !matches!(self, RuleId::Parsing | RuleId::Input)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the evaluators look at.
#[derive(Debug, Clone)]
pub struct Evidence<'a> {
    pub layout: LayoutSummary,
    pub fonts: FontProfile,
    pub sections: SectionFindings,
    pub options: &'a CheckOptions,
}

/// The four layout sub-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutChecks {
    pub two_columns: bool,
    pub serif_font: bool,
    pub body_size_valid: bool,
    pub no_page_numbers: bool,
}

impl LayoutChecks {
    /// Number of sub-checks that hold.
    pub fn passed_count(&self) -> usize {
        [
            self.two_columns,
            self.serif_font,
            self.body_size_valid,
            self.no_page_numbers,
        ]
        .iter()
        .filter(|&&c| c)
        .count()
    }

    /// Two-column is mandatory; at least two sub-checks must hold overall.
    pub fn passes(&self) -> bool {
        self.two_columns && self.passed_count() >= 2
    }
}

impl Evidence<'_> {
    /// Evaluate the layout sub-checks.
    pub fn layout_checks(&self) -> LayoutChecks {
        LayoutChecks {
            two_columns: self.layout.two_columns(),
            serif_font: self.fonts.has_serif_font(),
            body_size_valid: self.fonts.body_size_valid(&self.options.body_size),
            no_page_numbers: self.layout.no_page_numbers(),
        }
    }
}

/// Pass/fail decision and message for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
        }
    }
}

/// Decides whether a rule passes.
pub type Evaluator = fn(&Evidence<'_>) -> Verdict;

/// Produces the improvement hint for a rule, if any.
pub type SuggestionBuilder = fn(&Evidence<'_>) -> Option<String>;

/// One row of the rule table.
#[derive(Clone, Copy)]
pub struct RuleSpec {
    pub id: RuleId,
    pub weight: u32,
    pub evaluate: Evaluator,
    pub suggest: SuggestionBuilder,
}

impl RuleSpec {
    pub fn new(id: RuleId, weight: u32, evaluate: Evaluator, suggest: SuggestionBuilder) -> Self {
        Self {
            id,
            weight,
            evaluate,
            suggest,
        }
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSpec")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Validated table of weighted rules.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<RuleSpec>,
}

impl RuleRegistry {
    /// Build a registry, rejecting tables that do not hold each scored rule
    /// exactly once or whose weights do not sum to 100.
    pub fn new(mut rules: Vec<RuleSpec>) -> Result<Self> {
        for spec in &rules {
            if !spec.id.is_scored() {
                return Err(Error::InvalidRuleTable(format!(
                    "{} is not a scored rule",
                    spec.id
                )));
            }
        }

        rules.sort_by_key(|r| r.id);
        if let Some(pair) = rules.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(Error::InvalidRuleTable(format!(
                "duplicate rule {}",
                pair[0].id
            )));
        }
        if let Some(missing) = RuleId::SCORED
            .iter()
            .find(|id| !rules.iter().any(|r| r.id == **id))
        {
            return Err(Error::InvalidRuleTable(format!("missing rule {}", missing)));
        }

        let total: u32 = rules.iter().map(|r| r.weight).sum();
        if total != TOTAL_WEIGHT {
            return Err(Error::InvalidRuleTable(format!(
                "weights sum to {}, expected {}",
                total, TOTAL_WEIGHT
            )));
        }

        Ok(Self { rules })
    }

    /// The IEEE manuscript rule table.
    pub fn ieee() -> Result<Self> {
        Self::new(ieee_rules())
    }

    /// Rules in report order.
    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }

    /// Weight of a rule, if registered.
    pub fn weight(&self, id: RuleId) -> Option<u32> {
        self.rules.iter().find(|r| r.id == id).map(|r| r.weight)
    }

    /// Evaluate every rule and assemble the report.
    pub fn evaluate(&self, evidence: &Evidence<'_>) -> Report {
        let mut score = 0u32;
        let details = self
            .rules
            .iter()
            .map(|spec| {
                let verdict = (spec.evaluate)(evidence);
                if verdict.passed {
                    score += spec.weight;
                }
                log::debug!(
                    "{}: passed={} ({})",
                    spec.id,
                    verdict.passed,
                    verdict.message
                );
                RuleResult::new(spec.id, verdict.passed, verdict.message)
                    .with_suggestion((spec.suggest)(evidence))
            })
            .collect();

        Report {
            percentage: round_percentage(f64::from(score)),
            details,
        }
    }
}

/// The IEEE rule table: weights, evaluators and suggestion builders.
pub fn ieee_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new(RuleId::Layout, 30, evaluate_layout, suggest_layout),
        RuleSpec::new(RuleId::Title, 5, evaluate_title, suggest_title),
        RuleSpec::new(RuleId::Abstract, 15, evaluate_abstract, suggest_abstract),
        RuleSpec::new(RuleId::IndexTerms, 10, evaluate_index_terms, suggest_index_terms),
        RuleSpec::new(RuleId::Headings, 10, evaluate_headings, suggest_headings),
        RuleSpec::new(
            RuleId::FiguresTablesEquations,
            10,
            evaluate_figures,
            suggest_figures,
        ),
        RuleSpec::new(
            RuleId::OptionalElements,
            5,
            evaluate_optional,
            suggest_optional,
        ),
        RuleSpec::new(RuleId::References, 15, evaluate_references, suggest_references),
    ]
}

fn evaluate_layout(e: &Evidence<'_>) -> Verdict {
    let checks = e.layout_checks();
    let body = e
        .fonts
        .rounded_body_size()
        .map_or_else(|| "none".to_string(), |s| s.to_string());
    Verdict::new(
        checks.passes(),
        format!(
            "Two-column layout: {}, Times New Roman: {}, Body font ~10 pt: {}, No page numbers: {}",
            checks.two_columns, checks.serif_font, body, checks.no_page_numbers
        ),
    )
}

fn suggest_layout(e: &Evidence<'_>) -> Option<String> {
    let checks = e.layout_checks();
    let mut hints = Vec::new();
    if !checks.two_columns {
        hints.push("Two column format not found, use a two-column layout.".to_string());
    }
    if !checks.serif_font {
        hints.push("Use Times New Roman or a similar font for the body text.".to_string());
    }
    if !checks.body_size_valid {
        let (lo, hi) = (e.options.body_size.start(), e.options.body_size.end());
        match (e.fonts.body_font_size, e.fonts.rounded_body_size()) {
            (Some(size), Some(rounded)) => hints.push(format!(
                "Body font size is {} pt (rounded to {} pt); adjust to {}-{} pt.",
                size, rounded, lo, hi
            )),
            _ => hints.push(format!(
                "Set body font size between {} and {} points (ideally ~10 pt).",
                lo, hi
            )),
        }
    }
    if !checks.no_page_numbers {
        hints.push("Remove page numbers from the document.".to_string());
    }
    join_hints(hints)
}

fn evaluate_title(e: &Evidence<'_>) -> Verdict {
    match &e.sections.title {
        Some(title) => Verdict::new(true, format!("Title found: {}", title_excerpt(title))),
        None => Verdict::new(
            false,
            format!(
                "No title found in the top {} points of the page",
                e.options.title_region
            ),
        ),
    }
}

/// First words of a detected title, for messages.
fn title_excerpt(title: &str) -> String {
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.len() > TITLE_MESSAGE_WORDS {
        format!("{} ...", words[..TITLE_MESSAGE_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

fn suggest_title(e: &Evidence<'_>) -> Option<String> {
    e.sections.title.is_none().then(|| {
        format!(
            "Ensure a title with at least {} words is present in the top {} points of the page.",
            e.options.min_title_words, e.options.title_region
        )
    })
}

fn evaluate_abstract(e: &Evidence<'_>) -> Verdict {
    match e.sections.abstract_words {
        Some(words) => Verdict::new(
            e.options.abstract_words.contains(&words),
            format!("Abstract found, words: {}", words),
        ),
        None => Verdict::new(false, "Abstract not found"),
    }
}

fn suggest_abstract(e: &Evidence<'_>) -> Option<String> {
    let (min, max) = (
        *e.options.abstract_words.start(),
        *e.options.abstract_words.end(),
    );
    match e.sections.abstract_words {
        Some(words) if words < min => Some(format!(
            "Abstract has {} words; it should have at least {} words (up to {} words).",
            words, min, max
        )),
        Some(words) if words > max => Some(format!(
            "Abstract has {} words; it should have no more than {} words (minimum {} words).",
            words, max, min
        )),
        Some(_) => None,
        None => Some(format!(
            "Include an abstract section with {} to {} words, starting with the word 'Abstract'.",
            min, max
        )),
    }
}

fn evaluate_index_terms(e: &Evidence<'_>) -> Verdict {
    match &e.sections.index_terms {
        Some(terms) => Verdict::new(
            !terms.is_empty(),
            format!("Index Terms/Keywords found: {} terms", terms.len()),
        ),
        None => Verdict::new(false, "Index Terms/Keywords not found"),
    }
}

fn suggest_index_terms(e: &Evidence<'_>) -> Option<String> {
    let missing = e.sections.index_terms.as_ref().map_or(true, Vec::is_empty);
    missing.then(|| {
        "Include an 'Index Terms' or 'Keywords' section with a comma-separated list of \
         relevant terms (e.g., 'machine learning, AI, robotics')."
            .to_string()
    })
}

fn evaluate_headings(e: &Evidence<'_>) -> Verdict {
    let styles = &e.sections.headings;
    let message = if styles.is_empty() {
        "Headings detected: none".to_string()
    } else {
        let labels: Vec<_> = styles.iter().map(|s| s.label()).collect();
        format!("Headings detected: {}", labels.join(", "))
    };
    Verdict::new(!styles.is_empty(), message)
}

fn suggest_headings(e: &Evidence<'_>) -> Option<String> {
    e.sections.headings.is_empty().then(|| {
        "Use numbered or Roman numeral headings (e.g., 'I. Introduction', '1. Methods', \
         'A. Background') to structure the document."
            .to_string()
    })
}

fn evaluate_figures(e: &Evidence<'_>) -> Verdict {
    let found = e.sections.figures_tables_equations;
    Verdict::new(
        found,
        format!("Figures, tables, or equations detected: {}", found),
    )
}

fn suggest_figures(e: &Evidence<'_>) -> Option<String> {
    (!e.sections.figures_tables_equations).then(|| {
        "Include at least one figure, table, or equation, labeled as 'Figure 1', 'Table I', \
         or numbered equation (e.g., '(1)')."
            .to_string()
    })
}

fn evaluate_optional(e: &Evidence<'_>) -> Verdict {
    let found = &e.sections.optional_elements;
    let message = if found.is_empty() {
        "Optional elements detected: none".to_string()
    } else {
        format!("Optional elements detected: {}", found.join(", "))
    };
    Verdict::new(true, message)
}

fn suggest_optional(e: &Evidence<'_>) -> Option<String> {
    e.sections.optional_elements.is_empty().then(|| {
        "Consider adding optional sections like 'Note to Practitioners', 'Nomenclature', \
         'Appendix', or 'Acknowledgements' if relevant."
            .to_string()
    })
}

fn evaluate_references(e: &Evidence<'_>) -> Verdict {
    let refs = e.sections.references;
    Verdict::new(
        refs.has_section || refs.has_citations,
        format!(
            "References section found: {}, Numbered citations ([1], [2], etc.): {}",
            refs.has_section, refs.has_citations
        ),
    )
}

fn suggest_references(e: &Evidence<'_>) -> Option<String> {
    let refs = e.sections.references;
    let mut hints = Vec::new();
    if !refs.has_section {
        hints.push(
            "Include a 'References', 'Bibliography', or similar section at the end of the document."
                .to_string(),
        );
    }
    if !refs.has_citations {
        hints.push(
            "Use numbered citations in the text (e.g., [1], [2]) corresponding to the references list."
                .to_string(),
        );
    }
    join_hints(hints)
}

fn join_hints(hints: Vec<String>) -> Option<String> {
    (!hints.is_empty()).then(|| hints.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::sections::{HeadingStyle, ReferencesFinding};

    fn evidence(options: &CheckOptions) -> Evidence<'_> {
        Evidence {
            layout: LayoutSummary {
                sampled_pages: 4,
                two_column_pages: 4,
                pages_with_page_numbers: 0,
            },
            fonts: FontProfile {
                fonts: ["Times-Roman".to_string()].into_iter().collect(),
                body_font_size: Some(10.0),
            },
            sections: SectionFindings {
                title: Some("A Study of Compliant Manuscripts".to_string()),
                abstract_words: Some(150),
                index_terms: Some(vec!["robotics".to_string(), "control".to_string()]),
                headings: vec![HeadingStyle::Roman],
                figures_tables_equations: true,
                optional_elements: vec!["Appendix"],
                references: ReferencesFinding {
                    has_section: true,
                    has_citations: true,
                },
            },
            options,
        }
    }

    fn rule<'r>(report: &'r Report, id: RuleId) -> &'r RuleResult {
        report.result(id).unwrap()
    }

    #[test]
    fn test_ieee_registry_valid() {
        let registry = RuleRegistry::ieee().unwrap();
        let ids: Vec<_> = registry.rules().iter().map(|r| r.id).collect();
        assert_eq!(ids, RuleId::SCORED.to_vec());
        let total: u32 = registry.rules().iter().map(|r| r.weight).sum();
        assert_eq!(total, 100);
        assert_eq!(registry.weight(RuleId::Layout), Some(30));
        assert_eq!(registry.weight(RuleId::Parsing), None);
    }

    #[test]
    fn test_title_message_quotes_leading_words() {
        let options = CheckOptions::default();
        let mut e = evidence(&options);
        let report = RuleRegistry::ieee().unwrap().evaluate(&e);
        assert_eq!(
            rule(&report, RuleId::Title).message,
            "Title found: A Study of Compliant Manuscripts"
        );

        let column = (0..400).map(|i| format!("w{}", i)).collect::<Vec<_>>().join("\n");
        e.sections.title = Some(column);
        let report = RuleRegistry::ieee().unwrap().evaluate(&e);
        assert_eq!(
            rule(&report, RuleId::Title).message,
            "Title found: w0 w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11 ..."
        );
    }

    #[test]
    fn test_registry_rejects_bad_weights() {
        let mut rules = ieee_rules();
        rules[0].weight = 31;
        assert!(matches!(
            RuleRegistry::new(rules),
            Err(Error::InvalidRuleTable(_))
        ));
    }

    #[test]
    fn test_registry_rejects_duplicates_and_gaps() {
        let mut rules = ieee_rules();
        rules[1].id = RuleId::Layout;
        assert!(matches!(
            RuleRegistry::new(rules),
            Err(Error::InvalidRuleTable(msg)) if msg.contains("duplicate")
        ));

        let mut rules = ieee_rules();
        rules.pop();
        assert!(RuleRegistry::new(rules).is_err());

        let mut rules = ieee_rules();
        rules[7].id = RuleId::Parsing;
        assert!(RuleRegistry::new(rules).is_err());
    }

    #[test]
    fn test_registry_orders_rules() {
        let mut rules = ieee_rules();
        rules.reverse();
        let registry = RuleRegistry::new(rules).unwrap();
        assert_eq!(registry.rules()[0].id, RuleId::Layout);
        assert_eq!(registry.rules()[7].id, RuleId::References);
    }

    #[test]
    fn test_full_compliance() {
        let options = CheckOptions::default();
        let report = RuleRegistry::ieee().unwrap().evaluate(&evidence(&options));
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.details.len(), 8);
        assert!(report.details.iter().all(|d| d.passed));
        assert!(report.details.iter().all(|d| d.suggestion.is_none()));
    }

    #[test]
    fn test_layout_two_column_gate() {
        let options = CheckOptions::default();
        let mut e = evidence(&options);
        e.layout.two_column_pages = 1;
        let report = RuleRegistry::ieee().unwrap().evaluate(&e);

        let layout = rule(&report, RuleId::Layout);
        assert!(!layout.passed);
        assert!(layout
            .suggestion
            .as_deref()
            .unwrap()
            .starts_with("Two column format not found"));
        assert_eq!(report.percentage, 70.0);
    }

    #[test]
    fn test_layout_passes_with_two_of_four() {
        let options = CheckOptions::default();
        let mut e = evidence(&options);
        e.fonts.fonts.clear();
        e.fonts.body_font_size = None;
        let report = RuleRegistry::ieee().unwrap().evaluate(&e);

        let layout = rule(&report, RuleId::Layout);
        assert!(layout.passed);
        assert_eq!(
            layout.message,
            "Two-column layout: true, Times New Roman: false, Body font ~10 pt: none, No page numbers: true"
        );
        assert_eq!(
            layout.suggestion.as_deref(),
            Some(
                "Use Times New Roman or a similar font for the body text. \
                 Set body font size between 8 and 12 points (ideally ~10 pt)."
            )
        );
    }

    #[test]
    fn test_abstract_bounds() {
        let options = CheckOptions::default();
        let registry = RuleRegistry::ieee().unwrap();
        let mut e = evidence(&options);

        for (words, passed) in [(99, false), (100, true), (300, true), (301, false)] {
            e.sections.abstract_words = Some(words);
            let report = registry.evaluate(&e);
            let result = rule(&report, RuleId::Abstract);
            assert_eq!(result.passed, passed, "{} words", words);
            assert_eq!(result.message, format!("Abstract found, words: {}", words));
        }

        e.sections.abstract_words = Some(99);
        let report = registry.evaluate(&e);
        assert!(rule(&report, RuleId::Abstract)
            .suggestion
            .as_deref()
            .unwrap()
            .contains("at least 100 words"));

        e.sections.abstract_words = None;
        let report = registry.evaluate(&e);
        assert_eq!(rule(&report, RuleId::Abstract).message, "Abstract not found");
    }

    #[test]
    fn test_references_either_passes() {
        let options = CheckOptions::default();
        let mut e = evidence(&options);
        e.sections.references.has_citations = false;
        let report = RuleRegistry::ieee().unwrap().evaluate(&e);

        let refs = rule(&report, RuleId::References);
        assert!(refs.passed);
        assert_eq!(
            refs.suggestion.as_deref(),
            Some("Use numbered citations in the text (e.g., [1], [2]) corresponding to the references list.")
        );
        assert_eq!(report.percentage, 100.0);
    }

    #[test]
    fn test_optional_elements_always_pass() {
        let options = CheckOptions::default();
        let mut e = evidence(&options);
        e.sections.optional_elements.clear();
        let report = RuleRegistry::ieee().unwrap().evaluate(&e);

        let optional = rule(&report, RuleId::OptionalElements);
        assert!(optional.passed);
        assert!(optional.suggestion.is_some());
        assert_eq!(report.percentage, 100.0);
    }

    #[test]
    fn test_nothing_found() {
        let options = CheckOptions::default();
        let e = Evidence {
            layout: LayoutSummary {
                sampled_pages: 1,
                two_column_pages: 0,
                pages_with_page_numbers: 1,
            },
            fonts: FontProfile::default(),
            sections: SectionFindings::default(),
            options: &options,
        };
        let report = RuleRegistry::ieee().unwrap().evaluate(&e);

        assert_eq!(report.percentage, 5.0);
        let passed: Vec<_> = report
            .details
            .iter()
            .filter(|d| d.passed)
            .map(|d| d.rule)
            .collect();
        assert_eq!(passed, vec![RuleId::OptionalElements]);
        assert!(report
            .details
            .iter()
            .filter(|d| d.rule != RuleId::OptionalElements)
            .all(|d| d.suggestion.is_some()));
    }

    #[test]
    fn test_rule_id_names_match_serde() {
        for id in RuleId::SCORED {
            let json = serde_json::to_value(id).unwrap();
            assert_eq!(json, id.name());
        }
        assert!(!RuleId::Input.is_scored());
    }
}
