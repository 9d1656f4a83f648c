//! Configuration file handling

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use sqlreview_core::ReviewRule;

/// Review configuration loaded from sqlreview.toml.
///
/// Rule payloads are JSON documents carried as TOML strings, e.g.
///
/// ```toml
/// dialect = "mysql"
///
/// [[rules]]
/// type = "collation-allowlist"
/// level = "warning"
/// payload = '{"list": ["utf8mb4_general_ci"]}'
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// SQL dialect the reviewed files are written in
    #[serde(default)]
    pub dialect: Option<String>,

    /// Output format (human, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Rules to evaluate
    #[serde(default)]
    pub rules: Vec<ReviewRule>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        Ok(config)
    }

    /// Try to find and load sqlreview.toml in the current directory or any
    /// parent directory
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join("sqlreview.toml");
            if config_path.exists() {
                return Ok(Some(Self::from_file(&config_path)?));
            }

            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration.
    /// CLI arguments take precedence over config file values.
    pub fn merge_with_args(
        mut self,
        dialect: &Option<String>,
        format: &Option<crate::args::OutputFormat>,
    ) -> Self {
        if dialect.is_some() {
            self.dialect = dialect.clone();
        }

        if let Some(fmt) = format {
            self.format = Some(format!("{:?}", fmt).to_lowercase());
        }

        self
    }

    /// Configured rules with disabled entries dropped
    pub fn active_rules(&self) -> Vec<ReviewRule> {
        self.rules
            .iter()
            .filter(|r| r.level != sqlreview_core::RuleLevel::Disabled)
            .cloned()
            .collect()
    }
}
