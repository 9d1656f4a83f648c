//! Checker contract and builtin checkers

mod collation_allowlist;
mod dml_dry_run;
mod no_select_all;

pub use collation_allowlist::CollationAllowlistAdvisor;
pub use dml_dry_run::StatementDmlDryRunAdvisor;
pub use no_select_all::NoSelectAllAdvisor;

use crate::advice::Advice;
use crate::cancel::CancelToken;
use crate::dialect::Dialect;
use crate::error::ReviewError;
use crate::probe::QueryDriver;
use crate::rule::ReviewRule;
use crate::script::ParsedScript;

/// Everything one checker invocation needs: the parsed script, the resolved
/// rule, an optional live query handle, and the cancellation token.
///
/// Owned by the orchestrator for the duration of one `check` call; checkers
/// never retain it.
pub struct ReviewContext<'a> {
    pub script: &'a ParsedScript,
    pub rule: &'a ReviewRule,
    pub driver: Option<&'a dyn QueryDriver>,
    pub cancel: &'a CancelToken,
}

impl ReviewContext<'_> {
    /// Fail fast when the script was parsed for a different dialect than
    /// the checker was registered for.
    pub fn expect_dialect(&self, expected: Dialect) -> Result<(), ReviewError> {
        let actual = self.script.dialect();
        if actual == expected {
            Ok(())
        } else {
            Err(ReviewError::DialectMismatch { expected, actual })
        }
    }
}

/// A unit implementing one policy rule for one dialect.
///
/// Returned advice follows statement order, then in-statement traversal
/// order, so reports are deterministic across runs on identical input.
/// Checkers may issue read-only probes through the context's driver but
/// never statements with mutating intent.
pub trait Advisor: Send + Sync {
    fn check(&self, ctx: &ReviewContext<'_>) -> Result<Vec<Advice>, ReviewError>;
}

/// Every checker run yields at least one finding: an empty list becomes
/// the single synthetic Success/Ok advice.
pub(crate) fn finish(advice: Vec<Advice>) -> Vec<Advice> {
    if advice.is_empty() {
        vec![Advice::ok()]
    } else {
        advice
    }
}
