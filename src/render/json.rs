//! JSON rendering for reports and decoded documents.

use serde::Serialize;

use crate::check::Report;
use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a report to JSON.
pub fn to_json(report: &Report, format: JsonFormat) -> Result<String> {
    serialize(report, format)
}

/// Convert the decoded page model to JSON.
pub fn document_to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{RuleId, RuleResult};
    use crate::model::Page;

    #[test]
    fn test_report_to_json_pretty() {
        let report = Report {
            percentage: 45.0,
            details: vec![
                RuleResult::new(RuleId::Layout, true, "Two-column layout: true"),
                RuleResult::new(RuleId::Title, false, "No title")
                    .with_suggestion(Some("Add a title.".to_string())),
            ],
        };

        let json = to_json(&report, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"percentage\": 45.0"));
        assert!(json.contains("\"rule\": \"Layout\""));
        assert!(json.contains("\"suggestion\": \"Add a title.\""));
        assert_eq!(json.matches("suggestion").count(), 1);
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_report_to_json_compact() {
        let report = Report::degraded(RuleId::Input, "Failed to read file: missing.pdf");
        let json = to_json(&report, JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"percentage":0.0,"details":[{"rule":"Input","passed":false,"message":"Failed to read file: missing.pdf"}]}"#
        );
    }

    #[test]
    fn test_document_to_json() {
        let doc = Document::from_pages(vec![Page::letter(1)]);
        let json = document_to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(json.contains("\"width\":612.0"));
        assert!(!json.contains('\n'));
    }
}
