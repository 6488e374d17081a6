//! # Engine Module
//!
//! Decision logic of the log assessor: everything that turns scanner output into
//! a [`classifier::Verdict`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Oscillation parameters, program selection and batch options
//! - **Job-Completion Matcher** ([`matcher`]) - Pairs job starts with terminations
//! - **Numeric Trend Analyzer** ([`trend`]) - Convergence series and oscillation detection
//! - **Failure Reasons** ([`reason`]) - The closed set of reasons and their display text
//! - **Failure Classifier** ([`classifier`]) - Collection order and precedence rules
//! - **Progress Monitoring** ([`progress`]) - Progress events for batch runs
//! - **Error Handling** ([`error`]) - Errors raised by workflow entry points
//!
//! Classification is a pure function of the document, the scheduler signals and
//! the configuration: no state survives between calls.

pub mod classifier;
pub mod config;
pub mod error;
pub mod matcher;
pub mod progress;
pub mod reason;
pub mod trend;
