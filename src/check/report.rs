//! Report types produced by the rule engine.

use serde::{Deserialize, Serialize};

use super::rules::RuleId;

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule: RuleId,
    pub passed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RuleResult {
    /// Create a result without a suggestion.
    pub fn new(rule: RuleId, passed: bool, message: impl Into<String>) -> Self {
        Self {
            rule,
            passed,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }
}

/// Compliance report for one manuscript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Sum of the weights of passed rules, 0 to 100
    pub percentage: f64,
    /// One entry per rule, in fixed order
    pub details: Vec<RuleResult>,
}

impl Report {
    /// A zero-score report carrying a single failed diagnostic entry.
    pub fn degraded(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            percentage: 0.0,
            details: vec![RuleResult::new(rule, false, message)],
        }
    }

    /// Whether this report describes a failure to check rather than a score.
    pub fn is_degraded(&self) -> bool {
        self.details.iter().any(|d| !d.rule.is_scored())
    }

    /// Look up the result for a rule.
    pub fn result(&self, rule: RuleId) -> Option<&RuleResult> {
        self.details.iter().find(|d| d.rule == rule)
    }

    /// Number of passed rules.
    pub fn passed_count(&self) -> usize {
        self.details.iter().filter(|d| d.passed).count()
    }
}

/// Round a percentage to two decimal places.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
