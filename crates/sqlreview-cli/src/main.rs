//! sqlreview CLI - SQL review rule engine

mod args;
mod config;
mod output;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sqlreview_core::{CancelToken, Dialect, ParsedScript, Registry, Reviewer, Status};

use crate::args::{Args, Command, OutputFormat};
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    match args.command {
        Command::Check {
            files,
            config: config_path,
            dialect,
            format,
        } => {
            // Load configuration
            let config = if let Some(path) = config_path {
                Config::from_file(&path)?
            } else {
                // Try to find sqlreview.toml
                Config::find_and_load()?.unwrap_or_default()
            };

            // Merge CLI args with config (CLI takes precedence)
            let config = config.merge_with_args(&dialect, &format);

            let dialect: Dialect = config
                .dialect
                .as_deref()
                .unwrap_or("mysql")
                .parse()
                .map_err(|e: String| miette::miette!(e))?;

            let output_format = match config.format.as_deref() {
                Some("json") => OutputFormat::Json,
                _ => OutputFormat::Human,
            };

            let rules = config.active_rules();
            if rules.is_empty() {
                miette::bail!(
                    "No rules configured. Add [[rules]] entries to sqlreview.toml or pass --config"
                );
            }

            // Collect SQL files, expanding glob patterns
            let mut sql_files = Vec::new();
            for pattern in &files {
                let pattern_str = pattern.display().to_string();
                if pattern_str.contains('*') {
                    for path in glob::glob(&pattern_str).into_diagnostic()?.flatten() {
                        sql_files.push(path);
                    }
                } else {
                    sql_files.push(pattern.clone());
                }
            }

            if sql_files.is_empty() {
                miette::bail!("No SQL files matched the given paths");
            }

            // Review each file
            let registry = Registry::builtin();
            let reviewer = Reviewer::new(&registry);
            let cancel = CancelToken::new();
            let mut total_errors = 0;
            let mut total_warnings = 0;

            for sql_file in &sql_files {
                let content = fs::read_to_string(sql_file).into_diagnostic()?;
                let script = ParsedScript::parse(dialect, &content)?;
                // Dry-run rules pass silently without a live connection
                let advice = reviewer.review(&script, &rules, None, &cancel)?;

                let formatter =
                    OutputFormatter::new(output_format, sql_file.display().to_string());
                formatter.print_advice(&advice);

                for item in &advice {
                    match item.status {
                        Status::Error => total_errors += 1,
                        Status::Warning => total_warnings += 1,
                        Status::Success => {}
                    }
                }
            }

            // Print summary
            if total_errors > 0 || total_warnings > 0 {
                eprintln!();
                eprintln!(
                    "Found {} error(s), {} warning(s) in {} file(s)",
                    total_errors,
                    total_warnings,
                    sql_files.len()
                );
            } else {
                eprintln!("All {} file(s) passed review", sql_files.len());
            }

            Ok(total_errors > 0)
        }

        Command::Rules => {
            let registry = Registry::builtin();
            println!("Supported rules:");
            for (dialect, rule_type) in registry.supported() {
                println!("  {:<12} {}", dialect.to_string(), rule_type);
            }
            Ok(false)
        }

        Command::Parse { file, dialect } => {
            // Parse and display AST (for debugging)
            let content = fs::read_to_string(&file).into_diagnostic()?;
            let dialect: Dialect = dialect.parse().map_err(|e: String| miette::miette!(e))?;

            use sqlparser::parser::Parser;

            let parser_dialect = dialect.parser_dialect();
            match Parser::parse_sql(parser_dialect.as_ref(), &content) {
                Ok(statements) => {
                    for (i, stmt) in statements.iter().enumerate() {
                        println!("Statement {}:", i + 1);
                        println!("{:#?}", stmt);
                        println!();
                    }
                }
                Err(e) => {
                    eprintln!("Parse error: {}", e);
                    return Ok(true);
                }
            }

            Ok(false)
        }
    }
}
