use crate::core::document::{DocumentError, LogDocument};
use std::path::Path;

/// Reads a whole log into memory and decodes it as UTF-8.
///
/// The two failure modes stay distinct: an unreadable file is
/// [`DocumentError::Io`], invalid UTF-8 is [`DocumentError::Decode`].
pub fn read_log(path: &Path) -> Result<LogDocument, DocumentError> {
    let bytes = std::fs::read(path)?;
    LogDocument::from_bytes(bytes)
}

/// Reads a scheduler error file. Invalid UTF-8 is replaced rather than rejected,
/// since only ASCII tokens on its last line matter.
pub fn read_scheduler_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
