//! Review engine errors
//!
//! Policy violations and probe rejections are findings ([`crate::Advice`]),
//! never errors. This type covers the conditions that abort a review:
//! bad configuration, integration mistakes, and cancellation.

use miette::Diagnostic;
use thiserror::Error;

use crate::dialect::Dialect;
use crate::rule::RuleType;

#[derive(Debug, Error, Diagnostic)]
pub enum ReviewError {
    /// The script does not parse in the configured dialect
    #[error("failed to parse SQL script: {message}")]
    #[diagnostic(code(sqlreview::parse_error))]
    Parse { message: String },

    /// No checker registered for this (dialect, rule) pair
    #[error("rule '{rule}' is not supported for dialect '{dialect}'")]
    #[diagnostic(
        code(sqlreview::unsupported_rule),
        help("run `sqlreview rules` to list supported dialect/rule pairs")
    )]
    UnsupportedRule { dialect: Dialect, rule: RuleType },

    /// A checker is already registered under this key
    #[error("a checker for rule '{rule}' is already registered for dialect '{dialect}'")]
    #[diagnostic(code(sqlreview::duplicate_rule))]
    DuplicateRule { dialect: Dialect, rule: RuleType },

    /// The rule payload is missing or does not deserialize
    #[error("invalid payload for rule '{rule}': {message}")]
    #[diagnostic(code(sqlreview::invalid_payload))]
    InvalidPayload { rule: RuleType, message: String },

    /// A disabled rule reached the engine; the caller must filter these
    #[error("rule '{rule}' is disabled and must not be evaluated")]
    #[diagnostic(code(sqlreview::disabled_rule))]
    DisabledRule { rule: RuleType },

    /// A checker was handed a script parsed for another dialect
    #[error("checker for dialect '{expected}' received a script parsed as '{actual}'")]
    #[diagnostic(code(sqlreview::dialect_mismatch))]
    DialectMismatch { expected: Dialect, actual: Dialect },

    /// The review was cancelled before it completed
    #[error("review cancelled")]
    #[diagnostic(code(sqlreview::cancelled))]
    Cancelled,
}
