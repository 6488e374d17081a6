//! # Workflows Module
//!
//! Top-level entry points of the assessor.
//!
//! - **Single-file assessment** ([`assess`]) - Reads one log (and its optional
//!   scheduler error file) and returns its verdict, folding unreadable and
//!   undecodable input into the verdict itself.
//! - **Batch assessment** ([`batch`]) - Assesses many files, sequentially or in
//!   parallel, and collects the verdicts keyed by file path.
//! - **Diagnostics** ([`diagnostics`]) - Renders the line-by-line marker report.

pub mod assess;
pub mod batch;
pub mod diagnostics;
