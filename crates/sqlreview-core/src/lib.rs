//! sqlreview-core: SQL review rule engine
//!
//! Evaluates parsed SQL scripts against operator-configured rules and
//! emits structured findings. Policy rules inspect the statement AST;
//! dry-run rules validate data-mutating statements against a live engine
//! through a host-supplied query handle, without ever executing them.

pub mod advice;
pub mod advisor;
pub mod cancel;
pub mod dialect;
pub mod error;
pub mod probe;
pub mod registry;
pub mod review;
pub mod rule;
pub mod script;

pub use advice::{Advice, AdviceCode, Status};
pub use advisor::{Advisor, ReviewContext};
pub use cancel::CancelToken;
pub use dialect::Dialect;
pub use error::ReviewError;
pub use probe::{DryRunProber, QueryDriver, QueryError};
pub use registry::Registry;
pub use review::Reviewer;
pub use rule::{ReviewRule, RuleLevel, RuleType, StringArrayPayload};
pub use script::{ParsedScript, SourceStatement};
