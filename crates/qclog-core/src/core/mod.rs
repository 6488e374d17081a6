//! # Core Module
//!
//! Stateless building blocks for reading and scanning program output logs.
//!
//! - **Documents** ([`document`]) - An immutable, fully buffered log text with line offsets
//! - **Pattern Catalog** ([`patterns`]) - Every recognized marker and its matching discipline
//! - **Scanner** ([`scanner`]) - One linear pass turning a document into marker indices
//! - **Scheduler Signals** ([`scheduler`]) - Preemption, cancellation and OOM kills from
//!   the companion scheduler error file
//! - **File I/O** ([`io`]) - Reading logs from disk and writing verdict reports

pub mod document;
pub mod io;
pub mod patterns;
pub mod scanner;
pub mod scheduler;
