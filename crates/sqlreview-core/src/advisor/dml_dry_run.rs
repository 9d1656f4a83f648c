//! DML dry-run checker

use std::ops::ControlFlow;

use sqlparser::ast::{Statement, Visit, Visitor};

use crate::advice::{Advice, AdviceCode, Status};
use crate::advisor::{finish, Advisor, ReviewContext};
use crate::cancel::CancelToken;
use crate::dialect::Dialect;
use crate::error::ReviewError;
use crate::probe::DryRunProber;
use crate::script::SourceStatement;

/// Validates INSERT/UPDATE/DELETE statements against the live engine by
/// probing each one with `EXPLAIN`.
///
/// When the context carries no query driver the checker performs no probing
/// and reports no findings: dry-run rules are opt-in and require an
/// environment capable of live validation. Each statement receives an
/// independent probe; a failed probe becomes a finding and does not
/// short-circuit the rest.
pub struct StatementDmlDryRunAdvisor {
    dialect: Dialect,
}

impl StatementDmlDryRunAdvisor {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl Advisor for StatementDmlDryRunAdvisor {
    fn check(&self, ctx: &ReviewContext<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(self.dialect)?;
        let status = ctx.rule.violation_status()?;

        let mut advice = Vec::new();
        if let Some(driver) = ctx.driver {
            let prober = DryRunProber::new(driver);
            for stmt in ctx.script.statements() {
                let mut visitor = DmlDryRunVisitor {
                    prober: &prober,
                    status,
                    title: ctx.rule.rule_type.to_string(),
                    stmt,
                    cancel: ctx.cancel,
                    advice: &mut advice,
                };
                if let ControlFlow::Break(err) = stmt.statement.visit(&mut visitor) {
                    return Err(err);
                }
            }
        }

        Ok(finish(advice))
    }
}

struct DmlDryRunVisitor<'a> {
    prober: &'a DryRunProber<'a>,
    status: Status,
    title: String,
    stmt: &'a SourceStatement,
    cancel: &'a CancelToken,
    advice: &'a mut Vec<Advice>,
}

impl Visitor for DmlDryRunVisitor<'_> {
    type Break = ReviewError;

    fn pre_visit_statement(&mut self, statement: &Statement) -> ControlFlow<ReviewError> {
        match statement {
            Statement::Insert(_) | Statement::Update { .. } | Statement::Delete(_) => {
                // Checked before every probe so a cancelled review stops
                // issuing connection traffic immediately
                if self.cancel.is_cancelled() {
                    return ControlFlow::Break(ReviewError::Cancelled);
                }
                if let Err(err) = self.prober.probe(&self.stmt.text) {
                    self.advice.push(Advice {
                        status: self.status,
                        code: AdviceCode::StatementDmlDryRunFailed,
                        title: self.title.clone(),
                        content: format!(
                            "\"{}\" dry run failed: {}",
                            self.stmt.text, err
                        ),
                        line: self.stmt.line,
                    });
                }
            }
            _ => {}
        }

        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::probe::{QueryDriver, QueryError};
    use crate::rule::{ReviewRule, RuleLevel, RuleType};
    use crate::script::ParsedScript;

    struct ScriptedDriver {
        responses: Mutex<VecDeque<Result<(), QueryError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedDriver {
        fn new(responses: Vec<Result<(), QueryError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl QueryDriver for ScriptedDriver {
        fn run_readonly(&self, sql: &str) -> Result<(), QueryError> {
            self.calls.lock().unwrap().push(sql.to_string());
            self.responses.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    fn rule() -> ReviewRule {
        ReviewRule::new(RuleType::StatementDmlDryRun, RuleLevel::Error)
    }

    fn run(
        sql: &str,
        driver: Option<&dyn QueryDriver>,
        cancel: &CancelToken,
    ) -> Result<Vec<Advice>, ReviewError> {
        let script = ParsedScript::parse(Dialect::MySql, sql).unwrap();
        let rule = rule();
        let ctx = ReviewContext {
            script: &script,
            rule: &rule,
            driver,
            cancel,
        };
        StatementDmlDryRunAdvisor::new(Dialect::MySql).check(&ctx)
    }

    #[test]
    fn test_probe_success_yields_ok() {
        let driver = ScriptedDriver::new(vec![Ok(())]);
        let cancel = CancelToken::new();
        let advice = run("UPDATE t SET a = 1", Some(&driver), &cancel).unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
        assert_eq!(
            driver.calls.lock().unwrap().as_slice(),
            ["EXPLAIN UPDATE t SET a = 1"]
        );
    }

    #[test]
    fn test_probe_failure_becomes_finding() {
        let driver = ScriptedDriver::new(vec![Err(QueryError::Rejected(
            "Unknown column 'a' in 'field list'".to_string(),
        ))]);
        let cancel = CancelToken::new();
        let advice = run("UPDATE t SET a = 1", Some(&driver), &cancel).unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::StatementDmlDryRunFailed);
        assert_eq!(advice[0].status, Status::Error);
        assert!(advice[0].content.contains("UPDATE t SET a = 1"));
        assert!(advice[0].content.contains("Unknown column 'a'"));
        assert_eq!(advice[0].line, 1);
    }

    #[test]
    fn test_failure_does_not_short_circuit_batch() {
        let driver = ScriptedDriver::new(vec![
            Err(QueryError::Rejected("no such table".to_string())),
            Ok(()),
            Err(QueryError::Rejected("no such table".to_string())),
        ]);
        let cancel = CancelToken::new();
        let sql = "INSERT INTO a VALUES (1);\nUPDATE b SET x = 1;\nDELETE FROM c;";
        let advice = run(sql, Some(&driver), &cancel).unwrap();
        assert_eq!(advice.len(), 2);
        assert_eq!(advice[0].line, 1);
        assert_eq!(advice[1].line, 3);
        assert_eq!(driver.calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_non_dml_statements_are_not_probed() {
        let driver = ScriptedDriver::new(Vec::new());
        let cancel = CancelToken::new();
        let advice = run(
            "CREATE TABLE t (id INT); SELECT 1",
            Some(&driver),
            &cancel,
        )
        .unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
        assert!(driver.calls.lock().unwrap().is_empty());
    }

    // A dry-run rule with no live connection performs no probing and
    // reports success
    #[test]
    fn test_no_driver_skips_probing() {
        let cancel = CancelToken::new();
        let advice = run("UPDATE t SET a = 1", None, &cancel).unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_cancellation_aborts_before_probe() {
        let driver = ScriptedDriver::new(vec![Ok(())]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = run("UPDATE t SET a = 1", Some(&driver), &cancel);
        assert!(matches!(result, Err(ReviewError::Cancelled)));
        assert!(driver.calls.lock().unwrap().is_empty());
    }
}
