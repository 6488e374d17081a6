//! # QCLog Core Library
//!
//! A library for deciding whether a computational-chemistry run (Gaussian or ORCA)
//! completed, and if not, why. It never interprets chemistry. It only looks at the
//! structural markers and numeric convergence trends a program writes into its
//! output log.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable log documents, the pattern catalog of
//!   recognized markers, the single-pass line/section scanner, scheduler signal
//!   collection, and file I/O helpers.
//!
//! - **[`engine`]: The Logic Core.** Job-completion matching, convergence trend
//!   analysis, the closed failure-reason taxonomy, and the classifier that reduces
//!   every signal into one [`engine::classifier::Verdict`].
//!
//! - **[`workflows`]: The Public API.** Entry points for assessing one file or a
//!   whole batch (optionally in parallel), plus line-by-line diagnostics.

pub mod core;
pub mod engine;
pub mod workflows;
