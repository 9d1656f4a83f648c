//! Dry-run probing
//!
//! Validates a data-mutating statement against a live engine without
//! executing it, by submitting the statement wrapped in `EXPLAIN` through
//! the host-supplied [`QueryDriver`]. One probe per statement, a single
//! blocking request-response exchange, no retries: a rejected probe is
//! meaningful signal and becomes a finding, not a fault to mask.

use thiserror::Error;

/// Failure of a single read-only probe.
///
/// All variants surface the underlying engine message verbatim so the
/// finding is actionable.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The engine rejected the probe (missing column, permission, syntax)
    #[error("{0}")]
    Rejected(String),

    /// The connection dropped mid-exchange
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// The probe did not complete in time
    #[error("query timed out: {0}")]
    Timeout(String),
}

/// Minimal query-execution capability supplied by the surrounding system.
///
/// The engine never authenticates or manages connections; it only submits
/// read-only probe text through this handle. The handle may be pooled and
/// shared with other traffic.
pub trait QueryDriver: Send + Sync {
    /// Execute read-only probe text, returning success or a structured error
    fn run_readonly(&self, sql: &str) -> Result<(), QueryError>;
}

/// Wraps candidate statements in a non-executing analysis form and submits
/// them through a [`QueryDriver`].
pub struct DryRunProber<'a> {
    driver: &'a dyn QueryDriver,
}

impl<'a> DryRunProber<'a> {
    pub fn new(driver: &'a dyn QueryDriver) -> Self {
        Self { driver }
    }

    /// Probe one statement. Never executes the statement directly; the
    /// text is always wrapped in `EXPLAIN`.
    pub fn probe(&self, statement_text: &str) -> Result<(), QueryError> {
        let probe_sql = format!("EXPLAIN {}", statement_text);
        tracing::debug!(sql = %probe_sql, "issuing dry-run probe");
        self.driver.run_readonly(&probe_sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingDriver {
        seen: Mutex<Vec<String>>,
    }

    impl QueryDriver for RecordingDriver {
        fn run_readonly(&self, sql: &str) -> Result<(), QueryError> {
            self.seen.lock().unwrap().push(sql.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_probe_wraps_statement_in_explain() {
        let driver = RecordingDriver {
            seen: Mutex::new(Vec::new()),
        };
        let prober = DryRunProber::new(&driver);
        prober.probe("UPDATE t SET a = 1").unwrap();

        let seen = driver.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), ["EXPLAIN UPDATE t SET a = 1"]);
    }
}
