//! Review orchestration

use crate::advice::Advice;
use crate::advisor::{finish, ReviewContext};
use crate::cancel::CancelToken;
use crate::error::ReviewError;
use crate::probe::QueryDriver;
use crate::registry::Registry;
use crate::rule::{ReviewRule, RuleLevel};
use crate::script::ParsedScript;

/// Evaluates one parsed script against a set of configured rules.
///
/// Rules are evaluated in the order given; each checker sees the whole
/// statement batch and its findings are appended untouched, so the report
/// is deterministic for identical input. Disabled rules must be filtered
/// by the caller; one reaching the reviewer is a configuration error.
/// A cancelled review returns only [`ReviewError::Cancelled`]; findings
/// accumulated before the cancellation are discarded, never a partial
/// report.
pub struct Reviewer<'a> {
    registry: &'a Registry,
}

impl<'a> Reviewer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn review(
        &self,
        script: &ParsedScript,
        rules: &[ReviewRule],
        driver: Option<&dyn QueryDriver>,
        cancel: &CancelToken,
    ) -> Result<Vec<Advice>, ReviewError> {
        let mut report = Vec::new();

        for rule in rules {
            if cancel.is_cancelled() {
                return Err(ReviewError::Cancelled);
            }
            if rule.level == RuleLevel::Disabled {
                return Err(ReviewError::DisabledRule {
                    rule: rule.rule_type,
                });
            }

            let advisor = self
                .registry
                .resolve(script.dialect(), rule.rule_type)
                .ok_or(ReviewError::UnsupportedRule {
                    dialect: script.dialect(),
                    rule: rule.rule_type,
                })?;

            tracing::debug!(
                rule = %rule.rule_type,
                dialect = %script.dialect(),
                statements = script.statements().len(),
                "evaluating rule"
            );

            let ctx = ReviewContext {
                script,
                rule,
                driver,
                cancel,
            };
            report.extend(advisor.check(&ctx)?);
        }

        // An empty rule set still yields a complete report
        Ok(finish(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::AdviceCode;
    use crate::dialect::Dialect;
    use crate::rule::RuleType;

    #[test]
    fn test_empty_rule_set_yields_ok() {
        let registry = Registry::builtin();
        let script = ParsedScript::parse(Dialect::MySql, "SELECT 1").unwrap();
        let advice = Reviewer::new(&registry)
            .review(&script, &[], None, &CancelToken::new())
            .unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_unsupported_rule_fails_review() {
        let registry = Registry::new();
        let script = ParsedScript::parse(Dialect::MySql, "SELECT 1").unwrap();
        let rules = [ReviewRule::new(RuleType::NoSelectAll, RuleLevel::Warning)];
        let result =
            Reviewer::new(&registry).review(&script, &rules, None, &CancelToken::new());
        assert!(matches!(result, Err(ReviewError::UnsupportedRule { .. })));
    }

    #[test]
    fn test_disabled_rule_fails_review() {
        let registry = Registry::builtin();
        let script = ParsedScript::parse(Dialect::MySql, "SELECT 1").unwrap();
        let rules = [ReviewRule::new(RuleType::NoSelectAll, RuleLevel::Disabled)];
        let result =
            Reviewer::new(&registry).review(&script, &rules, None, &CancelToken::new());
        assert!(matches!(result, Err(ReviewError::DisabledRule { .. })));
    }
}
