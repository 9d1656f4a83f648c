//! SQL dialect support

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{Dialect as ParserDialect, MySqlDialect, PostgreSqlDialect};

/// Database engine family a statement is evaluated against.
///
/// Checkers are registered per dialect; a script is always parsed and
/// reviewed within exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    MariaDb,
    Postgres,
}

impl Dialect {
    /// Get the sqlparser dialect for parsing
    pub fn parser_dialect(&self) -> Box<dyn ParserDialect> {
        match self {
            // MariaDB shares the MySQL grammar
            Dialect::MySql | Dialect::MariaDb => Box::new(MySqlDialect {}),
            Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        }
    }

    pub fn all() -> [Dialect; 3] {
        [Dialect::MySql, Dialect::MariaDb, Dialect::Postgres]
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mysql8" => Ok(Dialect::MySql),
            "mariadb" => Ok(Dialect::MariaDb),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::Postgres),
            _ => Err(format!(
                "Unknown dialect: '{}'. Supported dialects: mysql, mariadb, postgresql.",
                s
            )),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::MariaDb => write!(f, "mariadb"),
            Dialect::Postgres => write!(f, "postgresql"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("pg".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!("MySQL".parse::<Dialect>(), Ok(Dialect::MySql));
        assert!("oracle".parse::<Dialect>().is_err());
    }
}
