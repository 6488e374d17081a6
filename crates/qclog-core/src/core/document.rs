use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Log is not valid UTF-8 (first invalid byte at offset {offset})")]
    Decode { offset: usize },
}

/// A fully buffered output log.
///
/// Lines are split on `'\n'` only, so a trailing newline yields a final empty
/// line and carriage returns stay attached to their line. Line indices are
/// 0-based; anything shown to a user adds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDocument {
    text: String,
    spans: Vec<Range<usize>>,
}

impl LogDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut spans = Vec::new();
        let mut start = 0;
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                spans.push(start..idx);
                start = idx + 1;
            }
        }
        spans.push(start..text.len());
        Self { text, spans }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        String::from_utf8(bytes)
            .map(Self::new)
            .map_err(|e| DocumentError::Decode {
                offset: e.utf8_error().valid_up_to(),
            })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.spans.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|span| &self.text[span.clone()])
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.spans.iter().map(|span| &self.text[span.clone()])
    }

    /// Returns the index of the line containing the given byte offset.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.spans
            .partition_point(|span| span.end < offset)
            .min(self.spans.len() - 1)
    }

    /// The last `n` lines once trailing blank lines are skipped, in document order.
    pub fn tail(&self, n: usize) -> Vec<&str> {
        let last_content = self
            .lines()
            .rposition(|line| !line.trim().is_empty())
            .map_or(0, |idx| idx + 1);
        let start = last_content.saturating_sub(n);
        (start..last_content).filter_map(|i| self.line(i)).collect()
    }
}
