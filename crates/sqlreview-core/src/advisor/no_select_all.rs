//! SELECT * checker

use std::ops::ControlFlow;

use sqlparser::ast::{Query, SelectItem, SetExpr, Visit, Visitor};

use crate::advice::{Advice, AdviceCode, Status};
use crate::advisor::{finish, Advisor, ReviewContext};
use crate::dialect::Dialect;
use crate::error::ReviewError;
use crate::script::SourceStatement;

/// Flags wildcard projections (`SELECT *`, `SELECT t.*`).
///
/// Descends into subqueries, CTEs, and set-operation arms (UNION,
/// INTERSECT, EXCEPT); every SELECT body is inspected once.
pub struct NoSelectAllAdvisor {
    dialect: Dialect,
}

impl NoSelectAllAdvisor {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl Advisor for NoSelectAllAdvisor {
    fn check(&self, ctx: &ReviewContext<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(self.dialect)?;
        let status = ctx.rule.violation_status()?;

        let mut advice = Vec::new();
        for stmt in ctx.script.statements() {
            let mut visitor = SelectAllVisitor {
                status,
                title: ctx.rule.rule_type.to_string(),
                stmt,
                advice: &mut advice,
            };
            let _ = stmt.statement.visit(&mut visitor);
        }

        Ok(finish(advice))
    }
}

struct SelectAllVisitor<'a> {
    status: Status,
    title: String,
    stmt: &'a SourceStatement,
    advice: &'a mut Vec<Advice>,
}

impl SelectAllVisitor<'_> {
    /// Walk a query body down to its SELECT arms. Set-operation arms are
    /// `SetExpr` values, not `Query` nodes, so the visitor never fires for
    /// them on its own; a nested `SetExpr::Query` does fire and is skipped
    /// here to keep each body inspected once.
    fn inspect_body(&mut self, body: &SetExpr) {
        match body {
            SetExpr::Select(select) => {
                for item in &select.projection {
                    if matches!(
                        item,
                        SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(_, _)
                    ) {
                        self.advice.push(Advice {
                            status: self.status,
                            code: AdviceCode::SelectAll,
                            title: self.title.clone(),
                            content: format!(
                                "\"{}\" uses SELECT *, list the columns explicitly",
                                self.stmt.text
                            ),
                            line: self.stmt.line,
                        });
                    }
                }
            }
            SetExpr::SetOperation { left, right, .. } => {
                self.inspect_body(left);
                self.inspect_body(right);
            }
            _ => {}
        }
    }
}

impl Visitor for SelectAllVisitor<'_> {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<()> {
        self.inspect_body(query.body.as_ref());
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::rule::{ReviewRule, RuleLevel, RuleType};
    use crate::script::ParsedScript;

    fn check(sql: &str) -> Vec<Advice> {
        let script = ParsedScript::parse(Dialect::Postgres, sql).unwrap();
        let rule = ReviewRule::new(RuleType::NoSelectAll, RuleLevel::Warning);
        let cancel = CancelToken::new();
        let ctx = ReviewContext {
            script: &script,
            rule: &rule,
            driver: None,
            cancel: &cancel,
        };
        NoSelectAllAdvisor::new(Dialect::Postgres).check(&ctx).unwrap()
    }

    #[test]
    fn test_explicit_columns_are_ok() {
        let advice = check("SELECT id, name FROM users");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_wildcard_is_flagged() {
        let advice = check("SELECT * FROM users");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::SelectAll);
    }

    #[test]
    fn test_qualified_wildcard_is_flagged() {
        let advice = check("SELECT u.* FROM users u");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::SelectAll);
    }

    #[test]
    fn test_wildcard_in_subquery_is_flagged() {
        let advice = check("SELECT id FROM (SELECT * FROM users) sub");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::SelectAll);
    }

    #[test]
    fn test_wildcards_in_union_arms_are_flagged() {
        let advice = check("SELECT * FROM a UNION SELECT * FROM b");
        assert_eq!(advice.len(), 2);
        assert!(advice.iter().all(|a| a.code == AdviceCode::SelectAll));
    }

    #[test]
    fn test_single_union_arm_wildcard_is_flagged() {
        let advice = check("SELECT id FROM a UNION ALL SELECT * FROM b");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::SelectAll);
    }

    #[test]
    fn test_nested_set_operation_arms_are_flagged() {
        let advice = check("SELECT * FROM a UNION (SELECT id FROM b INTERSECT SELECT * FROM c)");
        assert_eq!(advice.len(), 2);
        assert!(advice.iter().all(|a| a.code == AdviceCode::SelectAll));
    }

    #[test]
    fn test_statement_order_is_preserved() {
        let advice = check("SELECT * FROM a;\nSELECT id FROM b;\nSELECT * FROM c;");
        let lines: Vec<usize> = advice.iter().map(|a| a.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }
}
