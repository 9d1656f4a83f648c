//! Parsed script model
//!
//! A review operates on a [`ParsedScript`]: the statements of one SQL
//! script, each carrying its AST, its original source text, and the
//! 1-based line it starts on. The script is split into statements first
//! (respecting string literals, comments, and dollar-quoted strings) and
//! each statement is parsed on its own, so every statement knows both its
//! raw text (needed verbatim for dry-run probes and finding content) and
//! its position in the script.

use sqlparser::ast::Statement;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::Span;

use crate::dialect::Dialect;
use crate::error::ReviewError;

/// One statement of a script, with its source text and position
#[derive(Debug, Clone)]
pub struct SourceStatement {
    pub statement: Statement,
    /// Original statement text, trimmed, without the trailing semicolon
    pub text: String,
    /// 1-based line the statement starts on
    pub line: usize,
}

impl SourceStatement {
    /// Absolute 1-based line for a span recorded while this statement was
    /// parsed in isolation. Falls back to the statement's own line when the
    /// parser did not attach a position.
    pub fn line_of(&self, span: &Span) -> usize {
        let relative = span.start.line as usize;
        if relative == 0 {
            self.line
        } else {
            self.line + relative - 1
        }
    }
}

/// The statements of one script, parsed within a single dialect.
///
/// Immutable after parsing; concurrent checkers may traverse it freely.
#[derive(Debug, Clone)]
pub struct ParsedScript {
    dialect: Dialect,
    statements: Vec<SourceStatement>,
}

impl ParsedScript {
    /// Split and parse a script. Any statement that fails to parse fails
    /// the whole script with [`ReviewError::Parse`].
    pub fn parse(dialect: Dialect, sql: &str) -> Result<Self, ReviewError> {
        let parser_dialect = dialect.parser_dialect();
        let mut statements = Vec::new();

        for (offset, raw) in split_sql_statements(sql) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let leading = raw.len() - raw.trim_start().len();
            let line = 1 + sql[..offset + leading].matches('\n').count();

            let parsed = Parser::parse_sql(parser_dialect.as_ref(), trimmed)
                .map_err(|e| ReviewError::Parse {
                    message: e.to_string(),
                })?;

            // A segment contains no semicolons, so it parses to at most one
            // statement; comment-only segments parse to none.
            for statement in parsed {
                statements.push(SourceStatement {
                    statement,
                    text: trimmed.to_string(),
                    line,
                });
            }
        }

        Ok(Self {
            dialect,
            statements,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn statements(&self) -> &[SourceStatement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Split SQL text into `(byte offset, statement text)` pairs at semicolons,
/// respecting string literals, comments, and dollar-quoted strings.
fn split_sql_statements(sql: &str) -> Vec<(usize, &str)> {
    let mut statements = Vec::new();
    let mut start = 0;
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'\'' => {
                // Skip single-quoted string
                i += 1;
                while i < len {
                    if bytes[i] == b'\'' {
                        i += 1;
                        if i < len && bytes[i] == b'\'' {
                            i += 1; // escaped quote ''
                        } else {
                            break;
                        }
                    } else {
                        i += 1;
                    }
                }
            }
            b'$' => {
                // Check for dollar-quoted string ($$...$$ or $tag$...$tag$)
                if let Some(tag_end) = find_dollar_tag_end(sql, i) {
                    let tag = &sql[i..=tag_end];
                    i = tag_end + 1;
                    // Find the closing tag
                    if let Some(close_pos) = sql[i..].find(tag) {
                        i += close_pos + tag.len();
                    } else {
                        i = len; // unterminated, consume rest
                    }
                } else {
                    i += 1;
                }
            }
            b'-' if i + 1 < len && bytes[i + 1] == b'-' => {
                // Skip line comment
                while i < len && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                // Skip block comment
                i += 2;
                while i + 1 < len {
                    if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b';' => {
                let stmt = &sql[start..i];
                if !stmt.trim().is_empty() {
                    statements.push((start, stmt));
                }
                start = i + 1;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    // Handle last statement (without trailing semicolon)
    let last = &sql[start..];
    if !last.trim().is_empty() {
        statements.push((start, last));
    }

    statements
}

/// Find the end of a dollar-quote tag starting at position `start`.
/// Returns the index of the closing `$` if a valid tag is found.
fn find_dollar_tag_end(sql: &str, start: usize) -> Option<usize> {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    // Tag is $<identifier>$ or just $$
    let mut i = start + 1;
    if i < len && bytes[i] == b'$' {
        return Some(i); // $$ tag
    }
    // Look for $identifier$
    while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i < len && bytes[i] == b'$' {
        Some(i)
    } else {
        None
    }
}
