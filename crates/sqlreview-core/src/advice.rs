//! Finding types shared by all checkers

use serde::{Deserialize, Serialize};

/// Severity of a finding, derived from the configured rule level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
}

/// Stable identifier for the kind of finding a checker produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdviceCode {
    /// No violation detected
    Ok,
    /// A collation outside the configured allowlist was used
    DisabledCollation,
    /// A DML statement was rejected by the target engine during a dry run
    StatementDmlDryRunFailed,
    /// A projection uses `SELECT *`
    SelectAll,
}

impl AdviceCode {
    pub fn name(&self) -> &'static str {
        match self {
            AdviceCode::Ok => "ok",
            AdviceCode::DisabledCollation => "disabled-collation",
            AdviceCode::StatementDmlDryRunFailed => "statement-dml-dry-run-failed",
            AdviceCode::SelectAll => "select-all",
        }
    }
}

/// One finding emitted by a checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub status: Status,
    pub code: AdviceCode,
    /// Human label, normally the rule type
    pub title: String,
    /// Explanation with enough context to act on (offending value, statement text)
    pub content: String,
    /// 1-based source line of the offending construct, 0 if not applicable
    pub line: usize,
}

impl Advice {
    /// The synthetic finding returned when a checker run produced no violations
    pub fn ok() -> Self {
        Self {
            status: Status::Success,
            code: AdviceCode::Ok,
            title: "OK".to_string(),
            content: String::new(),
            line: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_advice_shape() {
        let advice = Advice::ok();
        assert_eq!(advice.status, Status::Success);
        assert_eq!(advice.code, AdviceCode::Ok);
        assert_eq!(advice.line, 0);
    }

    #[test]
    fn test_code_names_are_stable() {
        assert_eq!(AdviceCode::Ok.name(), "ok");
        assert_eq!(AdviceCode::DisabledCollation.name(), "disabled-collation");
        assert_eq!(
            AdviceCode::StatementDmlDryRunFailed.name(),
            "statement-dml-dry-run-failed"
        );
    }
}
