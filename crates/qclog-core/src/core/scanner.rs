use crate::core::document::LogDocument;
use crate::core::patterns::{
    FatalError, FrequencySection, LineHit, PatternCatalog, Program, SignatureKind,
};
use tracing::trace;

/// A marker found on a specific line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureMatch {
    pub line: usize,
    pub kind: SignatureKind,
}

/// Everything the scanner extracts from one document in a single pass.
///
/// `markers` is ordered by ascending line index; markers from the full-text
/// search (atomic number, multiplicity) are merged in at the line they start on.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub program: Program,
    pub markers: Vec<SignatureMatch>,
    pub atomic_number: Option<LineHit>,
    pub multiplicity: Option<LineHit>,
    pub fatal_errors: Vec<FatalError>,
    pub frequency: Option<FrequencySection>,
    /// Whether one of the last two non-blank lines is a termination marker.
    pub ends_with_termination: bool,
}

impl ScanResult {
    fn lines_of(&self, kind: SignatureKind) -> impl Iterator<Item = usize> + '_ {
        self.markers
            .iter()
            .filter(move |m| m.kind == kind)
            .map(|m| m.line)
    }

    pub fn job_starts(&self) -> Vec<usize> {
        self.lines_of(SignatureKind::JobStart).collect()
    }

    pub fn terminations(&self) -> Vec<usize> {
        self.lines_of(SignatureKind::Termination).collect()
    }

    pub fn line_errors(&self) -> impl Iterator<Item = &SignatureMatch> + '_ {
        self.markers.iter().filter(|m| m.kind.is_line_error())
    }

    pub fn count(&self, kind: SignatureKind) -> usize {
        self.lines_of(kind).count()
    }
}

pub fn scan(document: &LogDocument, catalog: &PatternCatalog) -> ScanResult {
    let mut markers: Vec<SignatureMatch> = document
        .lines()
        .enumerate()
        .filter_map(|(line, text)| {
            catalog
                .classify_line(text)
                .map(|kind| SignatureMatch { line, kind })
        })
        .collect();

    let atomic_number = catalog.find_atomic_number(document);
    let multiplicity = catalog.find_multiplicity(document);
    for (hit, kind) in [
        (&atomic_number, SignatureKind::ErrorAtomicNumber),
        (&multiplicity, SignatureKind::ErrorMultiplicity),
    ] {
        if let Some(hit) = hit {
            markers.push(SignatureMatch {
                line: hit.line,
                kind,
            });
        }
    }
    markers.sort_by_key(|m| m.line);

    let ends_with_termination = document
        .tail(2)
        .into_iter()
        .any(|line| catalog.is_termination(line));

    let result = ScanResult {
        program: catalog.program,
        markers,
        atomic_number,
        multiplicity,
        fatal_errors: catalog.find_fatal_errors(document),
        frequency: catalog.find_frequency_section(document),
        ends_with_termination,
    };
    trace!(
        markers = result.markers.len(),
        fatal = result.fatal_errors.len(),
        frequency = result.frequency.is_some(),
        complete = result.ends_with_termination,
        "Scanned document"
    );
    result
}
