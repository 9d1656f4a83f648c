//! Collation allowlist checker

use std::collections::HashSet;
use std::ops::ControlFlow;

use sqlparser::ast::{
    AlterTableOperation, ColumnDef, ObjectName, Statement, Visit, Visitor,
};

use crate::advice::{Advice, AdviceCode, Status};
use crate::advisor::{finish, Advisor, ReviewContext};
use crate::dialect::Dialect;
use crate::error::ReviewError;
use crate::rule::StringArrayPayload;
use crate::script::SourceStatement;

/// Flags any column collation outside the configured allowlist.
///
/// Inspects CREATE TABLE column definitions and ALTER TABLE ADD COLUMN
/// definitions, where the parser attaches a collation to the column. All
/// other statement kinds and alter operations are ignored.
pub struct CollationAllowlistAdvisor {
    dialect: Dialect,
}

impl CollationAllowlistAdvisor {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl Advisor for CollationAllowlistAdvisor {
    fn check(&self, ctx: &ReviewContext<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(self.dialect)?;
        let status = ctx.rule.violation_status()?;
        let payload = StringArrayPayload::from_rule(ctx.rule)?;
        let allowlist: HashSet<String> = payload.list.into_iter().collect();

        let mut advice = Vec::new();
        for stmt in ctx.script.statements() {
            let mut visitor = CollationVisitor {
                allowlist: &allowlist,
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

struct CollationVisitor<'a> {
    allowlist: &'a HashSet<String>,
    status: Status,
    title: String,
    stmt: &'a SourceStatement,
    advice: &'a mut Vec<Advice>,
}

impl CollationVisitor<'_> {
    fn check_column(&mut self, column: &ColumnDef) {
        if let Some(collation) = &column.collation {
            let name = collation_name(collation);
            if !self.allowlist.contains(&name) {
                self.advice.push(Advice {
                    status: self.status,
                    code: AdviceCode::DisabledCollation,
                    title: self.title.clone(),
                    content: format!(
                        "Use disabled collation \"{}\", related statement \"{}\"",
                        name, self.stmt.text
                    ),
                    line: self.stmt.line_of(&column.name.span),
                });
            }
        }
    }
}

impl Visitor for CollationVisitor<'_> {
    type Break = ();

    fn pre_visit_statement(&mut self, statement: &Statement) -> ControlFlow<()> {
        match statement {
            Statement::CreateTable(create) => {
                for column in &create.columns {
                    self.check_column(column);
                }
            }
            Statement::AlterTable { operations, .. } => {
                for operation in operations {
                    if let AlterTableOperation::AddColumn { column_def, .. } = operation {
                        self.check_column(column_def);
                    }
                }
            }
            _ => {}
        }

        // Everything this rule inspects hangs off the statement node itself;
        // descending further would only double-visit column expressions.
        ControlFlow::Break(())
    }
}

/// Unquoted collation name; multi-part names keep their dots
fn collation_name(name: &ObjectName) -> String {
    name.0
        .iter()
        .map(|ident| ident.value.clone())
        .collect::<Vec<_>>()
        .join(".")
}
