//! Reading program logs and companion files from disk, and writing verdict reports.
//!
//! Classification itself never touches the filesystem; these helpers sit at the
//! edge so the rest of the crate works on in-memory text only.

pub mod log;
pub mod report;
