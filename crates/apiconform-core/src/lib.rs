//! apiconform-core: Core types and verdict logic for OpenAPI response conformance
//!
//! This crate holds the data that crosses the engine boundary: the response
//! snapshot under test, the typed evaluation outcome, the polarity-aware verdict,
//! and the exact sentences rendered for each failure kind.

pub mod config;
pub mod input;
pub mod message;
pub mod report;
pub mod verdict;

pub use config::{Config, ConfigError};
pub use input::{RequestLine, ResponseInput};
pub use report::{CheckReport, CheckSummary};
pub use verdict::{
    Endpoint, Outcome, OutcomeKind, Polarity, Verdict, VerdictStatus, Violation, ViolationKind,
    judge,
};
