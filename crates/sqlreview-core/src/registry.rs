//! Checker registry

use indexmap::IndexMap;

use crate::advisor::{
    Advisor, CollationAllowlistAdvisor, NoSelectAllAdvisor, StatementDmlDryRunAdvisor,
};
use crate::dialect::Dialect;
use crate::error::ReviewError;
use crate::rule::RuleType;

/// Table mapping a `(dialect, rule type)` key to its checker.
///
/// Built once before any review traffic and borrowed immutably thereafter,
/// so lookups need no locking. Construct it explicitly and pass it to the
/// [`crate::Reviewer`]; tests can compose registries of fake checkers.
#[derive(Default)]
pub struct Registry {
    advisors: IndexMap<(Dialect, RuleType), Box<dyn Advisor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a checker. Duplicate keys are a programming error surfaced
    /// at construction time; the existing registration is left untouched.
    pub fn register(
        &mut self,
        dialect: Dialect,
        rule_type: RuleType,
        advisor: Box<dyn Advisor>,
    ) -> Result<(), ReviewError> {
        if self.advisors.contains_key(&(dialect, rule_type)) {
            return Err(ReviewError::DuplicateRule {
                dialect,
                rule: rule_type,
            });
        }
        self.advisors.insert((dialect, rule_type), advisor);
        Ok(())
    }

    /// Look up the checker for a key; `None` means the pair is not
    /// supported, which the orchestrator reports as a configuration error.
    pub fn resolve(&self, dialect: Dialect, rule_type: RuleType) -> Option<&dyn Advisor> {
        self.advisors.get(&(dialect, rule_type)).map(|a| a.as_ref())
    }

    /// Supported keys, in registration order
    pub fn supported(&self) -> impl Iterator<Item = (Dialect, RuleType)> + '_ {
        self.advisors.keys().copied()
    }

    /// The standard checker set: every builtin rule for every dialect.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for dialect in Dialect::all() {
            registry
                .register(
                    dialect,
                    RuleType::CollationAllowlist,
                    Box::new(CollationAllowlistAdvisor::new(dialect)),
                )
                .expect("builtin registry keys are unique");
            registry
                .register(
                    dialect,
                    RuleType::StatementDmlDryRun,
                    Box::new(StatementDmlDryRunAdvisor::new(dialect)),
                )
                .expect("builtin registry keys are unique");
            registry
                .register(
                    dialect,
                    RuleType::NoSelectAll,
                    Box::new(NoSelectAllAdvisor::new(dialect)),
                )
                .expect("builtin registry keys are unique");
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_all_dialects() {
        let registry = Registry::builtin();
        for dialect in Dialect::all() {
            assert!(registry
                .resolve(dialect, RuleType::CollationAllowlist)
                .is_some());
            assert!(registry
                .resolve(dialect, RuleType::StatementDmlDryRun)
                .is_some());
            assert!(registry.resolve(dialect, RuleType::NoSelectAll).is_some());
        }
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = Registry::builtin();
        let result = registry.register(
            Dialect::MySql,
            RuleType::NoSelectAll,
            Box::new(NoSelectAllAdvisor::new(Dialect::MySql)),
        );
        assert!(matches!(result, Err(ReviewError::DuplicateRule { .. })));
        // The original registration survives
        assert!(registry
            .resolve(Dialect::MySql, RuleType::NoSelectAll)
            .is_some());
    }

    #[test]
    fn test_unregistered_pair_resolves_to_none() {
        let registry = Registry::new();
        assert!(registry
            .resolve(Dialect::Postgres, RuleType::NoSelectAll)
            .is_none());
    }

    #[test]
    fn test_supported_is_in_registration_order() {
        let registry = Registry::builtin();
        let first: Vec<_> = registry.supported().take(3).collect();
        assert_eq!(
            first,
            vec![
                (Dialect::MySql, RuleType::CollationAllowlist),
                (Dialect::MySql, RuleType::StatementDmlDryRun),
                (Dialect::MySql, RuleType::NoSelectAll),
            ]
        );
    }
}
