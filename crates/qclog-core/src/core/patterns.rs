//! The pattern catalog: every marker the assessor recognizes, per program.
//!
//! Two matching disciplines are used, never mixed for the same marker class:
//!
//! - **Line markers** (job starts, terminations, line-level errors) are anchored
//!   at the start of a line. Leading whitespace is allowed, nothing else is, so
//!   quoted or echoed text later in a line never counts.
//! - **Document markers** (atomic number range, multiplicity, fatal program
//!   errors, frequency section, convergence rows) are searched anywhere in the
//!   full text and may span line breaks.

use crate::core::document::LogDocument;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PatternError {
    #[error("malformed {section}: '{token}' is not a number")]
    MalformedNumber { section: &'static str, token: String },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Program {
    #[default]
    Gaussian,
    Orca,
}

impl Program {
    /// File suffix of the log files this program writes.
    pub fn log_extension(self) -> &'static str {
        match self {
            Program::Gaussian => "log",
            Program::Orca => "out",
        }
    }

    pub fn catalog(self) -> &'static PatternCatalog {
        match self {
            Program::Gaussian => &GAUSSIAN,
            Program::Orca => &ORCA,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Gaussian => write!(f, "gaussian"),
            Program::Orca => write!(f, "orca"),
        }
    }
}

impl FromStr for Program {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" | "g16" | "g09" => Ok(Program::Gaussian),
            "orca" => Ok(Program::Orca),
            other => Err(format!(
                "Unknown program '{}'. Expected 'gaussian' or 'orca'.",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignatureKind {
    JobStart,
    Termination,
    ErrorFileIo,
    ErrorWrite,
    ErrorStepLimit,
    ErrorAtomicNumber,
    ErrorMultiplicity,
}

impl SignatureKind {
    /// Errors reported together, one entry per offending line.
    pub fn is_line_error(self) -> bool {
        matches!(
            self,
            SignatureKind::ErrorFileIo | SignatureKind::ErrorWrite | SignatureKind::ErrorStepLimit
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            SignatureKind::JobStart => "JOB START",
            SignatureKind::Termination => "NORM TERM",
            SignatureKind::ErrorFileIo => "FileIO Error (non-existent)",
            SignatureKind::ErrorWrite => "ERRONEOUS WRITE",
            SignatureKind::ErrorStepLimit => "STEP LIMIT EXCEEDED",
            SignatureKind::ErrorAtomicNumber => "ATOMIC NUMBER OUT OF RANGE",
            SignatureKind::ErrorMultiplicity => "ILLEGAL MULTIPLICITY",
        }
    }
}

/// The four optimization convergence criteria, in the order they are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    MaxForce,
    RmsForce,
    MaxDisplacement,
    RmsDisplacement,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::MaxForce,
        Metric::RmsForce,
        Metric::MaxDisplacement,
        Metric::RmsDisplacement,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::MaxForce => "MAX FORCE",
            Metric::RmsForce => "RMS FORCE",
            Metric::MaxDisplacement => "MAX DISPLACEMENT",
            Metric::RmsDisplacement => "RMS DISPLACEMENT",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FatalKind {
    UnknownExchangeFunctional,
    IncompleteOptimization,
    ZeroDistance,
}

/// A fatal program error found anywhere in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    pub kind: FatalKind,
    pub line: usize,
    pub message: String,
}

/// A document marker resolved to the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHit {
    pub line: usize,
    pub text: String,
}

/// The raw text between a `Frequencies --` header and the `Red. masses --` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySection {
    pub raw: String,
}

impl FrequencySection {
    /// The first numeric token of the section, which is the lowest vibrational frequency.
    pub fn lowest(&self) -> Result<f64, PatternError> {
        parse_first_token(&self.raw, "frequency section")
    }

    /// Whether the lowest frequency is imaginary (`<= 0`), together with that frequency.
    pub fn has_imaginary_frequency(&self) -> Result<(bool, f64), PatternError> {
        let lowest = self.lowest()?;
        Ok((lowest <= 0.0, lowest))
    }
}

pub struct PatternCatalog {
    pub program: Program,
    job_start: Vec<Regex>,
    termination: Regex,
    line_errors: Vec<(SignatureKind, Regex)>,
    atomic_number: Option<Regex>,
    multiplicity: Regex,
    fatal: Vec<(FatalKind, Regex, Option<&'static str>)>,
    frequency: Option<Regex>,
    convergence: [Regex; 4],
}

static GAUSSIAN: LazyLock<PatternCatalog> = LazyLock::new(PatternCatalog::gaussian);
static ORCA: LazyLock<PatternCatalog> = LazyLock::new(PatternCatalog::orca);

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("pattern catalog entries are valid regular expressions")
}

fn parse_first_token(raw: &str, section: &'static str) -> Result<f64, PatternError> {
    let token = raw.split_whitespace().next().unwrap_or("");
    token.parse::<f64>().map_err(|_| PatternError::MalformedNumber {
        section,
        token: token.to_string(),
    })
}

impl PatternCatalog {
    fn gaussian() -> Self {
        Self {
            program: Program::Gaussian,
            job_start: vec![
                compile(r"^\s*Entering Link\s+\d+"),
                compile(r"^\s*Link1:\s+Proceeding to internal job step number\s+"),
            ],
            termination: compile(r"^\s*Normal termination of Gaussian\s+\d+"),
            line_errors: vec![
                (
                    SignatureKind::ErrorFileIo,
                    compile(r"^\s*FileIO operation on non-existent file"),
                ),
                (
                    SignatureKind::ErrorWrite,
                    compile(r"^\s*Erroneous write\. Write\s+-?\d+\s+instead of\s+\d+"),
                ),
                (
                    SignatureKind::ErrorStepLimit,
                    compile(r"^\s*--\s+Number of steps exceeded,\s+NStep=\s*\d+"),
                ),
            ],
            atomic_number: Some(compile(r"Atomic number out of range for")),
            multiplicity: compile(
                r"The combination of multiplicity\s+\d+\s+and\s+\d+\s+electrons is impossible",
            ),
            fatal: Vec::new(),
            frequency: Some(compile(r"(?ms)^ Frequencies --(.*?)^ Red\. masses --")),
            convergence: [
                compile(r"Maximum Force(.*?)(?:NO|YES)"),
                compile(r"RMS[ \t]+Force(.*?)(?:NO|YES)"),
                compile(r"Maximum Displacement(.*?)(?:NO|YES)"),
                compile(r"RMS[ \t]+Displacement(.*?)(?:NO|YES)"),
            ],
        }
    }

    fn orca() -> Self {
        Self {
            program: Program::Orca,
            job_start: Vec::new(),
            termination: compile(r"^\s*\*\*\*\*ORCA TERMINATED NORMALLY\*\*\*\*"),
            line_errors: Vec::new(),
            atomic_number: None,
            multiplicity: compile(
                r"multiplicity \(\d+\) .+ and number of electrons \(\d+\) .+ -> impossible",
            ),
            fatal: vec![
                (
                    FatalKind::UnknownExchangeFunctional,
                    compile(&regex::escape(
                        "Error: Invalid or unknown value for Exchange in DFT XC-Kernel. Please try using LIBXC instead!",
                    )),
                    Some(
                        "Invalid/unknown value for Exchange in DFT XC-Kernel. Use LIBXC(<functional>)",
                    ),
                ),
                (
                    FatalKind::IncompleteOptimization,
                    compile(
                        r"ERROR !!!\r?\n\s+The optimization did not converge but reached the maximum",
                    ),
                    Some("incomplete geometry optimization"),
                ),
                (
                    FatalKind::ZeroDistance,
                    compile(r"Zero distance between atoms \d+ and \d+ in Cartesian2Internal"),
                    None,
                ),
            ],
            frequency: None,
            convergence: [
                compile(r"MAX gradient(.*?)(?:NO|YES)"),
                compile(r"RMS gradient(.*?)(?:NO|YES)"),
                compile(r"MAX step(.*?)(?:NO|YES)"),
                compile(r"RMS step(.*?)(?:NO|YES)"),
            ],
        }
    }

    /// Tests a single line against the line markers in fixed priority order:
    /// job start, then termination, then line-level errors.
    pub fn classify_line(&self, line: &str) -> Option<SignatureKind> {
        if self.job_start.iter().any(|re| re.is_match(line)) {
            return Some(SignatureKind::JobStart);
        }
        if self.termination.is_match(line) {
            return Some(SignatureKind::Termination);
        }
        self.line_errors
            .iter()
            .find(|(_, re)| re.is_match(line))
            .map(|(kind, _)| *kind)
    }

    pub fn is_termination(&self, line: &str) -> bool {
        self.termination.is_match(line)
    }

    /// The first line reporting an atomic number outside the basis set, trimmed.
    pub fn find_atomic_number(&self, document: &LogDocument) -> Option<LineHit> {
        let re = self.atomic_number.as_ref()?;
        let m = re.find(document.text())?;
        let line = document.line_of_offset(m.start());
        let text = document.line(line).unwrap_or_default().trim().to_string();
        Some(LineHit { line, text })
    }

    /// The first impossible multiplicity message, with runs of whitespace collapsed.
    pub fn find_multiplicity(&self, document: &LogDocument) -> Option<LineHit> {
        let m = self.multiplicity.find(document.text())?;
        let text = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
        Some(LineHit {
            line: document.line_of_offset(m.start()),
            text,
        })
    }

    /// Fatal program errors, at most one per kind, in catalog order.
    pub fn find_fatal_errors(&self, document: &LogDocument) -> Vec<FatalError> {
        self.fatal
            .iter()
            .filter_map(|(kind, re, fixed_message)| {
                let m = re.find(document.text())?;
                Some(FatalError {
                    kind: *kind,
                    line: document.line_of_offset(m.start()),
                    message: fixed_message
                        .map(str::to_string)
                        .unwrap_or_else(|| m.as_str().to_string()),
                })
            })
            .collect()
    }

    pub fn find_frequency_section(&self, document: &LogDocument) -> Option<FrequencySection> {
        let caps = self.frequency.as_ref()?.captures(document.text())?;
        Some(FrequencySection {
            raw: caps.get(1).map_or("", |m| m.as_str()).to_string(),
        })
    }

    /// Every reported value of one convergence criterion, in document order.
    ///
    /// Only the first number of each row is kept: that is the current value, the
    /// second is the threshold.
    pub fn convergence_values(
        &self,
        metric: Metric,
        document: &LogDocument,
    ) -> Result<Vec<f64>, PatternError> {
        self.convergence[metric.index()]
            .captures_iter(document.text())
            .map(|caps| {
                let raw = caps.get(1).map_or("", |m| m.as_str());
                parse_first_token(raw, metric.label())
            })
            .collect()
    }
}
