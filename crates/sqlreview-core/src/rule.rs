//! Rule configuration types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::advice::Status;
use crate::error::ReviewError;

/// Operator-configured severity for a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Disabled,
    Info,
    Warning,
    Error,
}

/// Identifier naming a policy rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleType {
    CollationAllowlist,
    StatementDmlDryRun,
    NoSelectAll,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::CollationAllowlist => "collation-allowlist",
            RuleType::StatementDmlDryRun => "statement-dml-dry-run",
            RuleType::NoSelectAll => "no-select-all",
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collation-allowlist" => Ok(RuleType::CollationAllowlist),
            "statement-dml-dry-run" => Ok(RuleType::StatementDmlDryRun),
            "no-select-all" => Ok(RuleType::NoSelectAll),
            _ => Err(format!("Unknown rule type: '{}'", s)),
        }
    }
}

/// Immutable rule configuration: what to check and how severely to report it.
///
/// `payload` carries rule-specific parameters as a JSON document; rules that
/// need none leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub level: RuleLevel,
    #[serde(default)]
    pub payload: Option<String>,
}

impl ReviewRule {
    pub fn new(rule_type: RuleType, level: RuleLevel) -> Self {
        Self {
            rule_type,
            level,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Status carried by findings of this rule.
    ///
    /// The finding model is three-valued, so Info-level violations are
    /// reported at Warning status. A disabled rule must never reach a
    /// checker; hitting one here is a configuration error.
    pub fn violation_status(&self) -> Result<Status, ReviewError> {
        match self.level {
            RuleLevel::Error => Ok(Status::Error),
            RuleLevel::Warning | RuleLevel::Info => Ok(Status::Warning),
            RuleLevel::Disabled => Err(ReviewError::DisabledRule {
                rule: self.rule_type,
            }),
        }
    }
}

/// Payload shape shared by allowlist-style rules: `{"list": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct StringArrayPayload {
    pub list: Vec<String>,
}

impl StringArrayPayload {
    /// Deserialize the payload of a rule that requires one
    pub fn from_rule(rule: &ReviewRule) -> Result<Self, ReviewError> {
        let raw = rule.payload.as_deref().ok_or_else(|| ReviewError::InvalidPayload {
            rule: rule.rule_type,
            message: "payload is required".to_string(),
        })?;
        serde_json::from_str(raw).map_err(|e| ReviewError::InvalidPayload {
            rule: rule.rule_type,
            message: e.to_string(),
        })
    }
}
