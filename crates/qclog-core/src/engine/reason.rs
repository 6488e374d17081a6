use crate::core::patterns::{Metric, PatternError, Program};
use crate::core::scheduler::SchedulerEvent;
use std::fmt;

/// A single offending line inside a [`FailureReason::SpecificLineErrors`] reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based.
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Preempted,
    Cancelled,
    OomKilled,
    AtomicNumberOutOfRange { line: String },
    IllegalMultiplicity { message: String },
    ProgramError { message: String },
    ImaginaryFrequency { frequency: f64 },
    Oscillating { metric: Metric, evidence: Vec<f64> },
    MalformedSection { section: String, token: String },
    SpecificLineErrors { lines: Vec<LineError> },
    IncompleteLog { program: Program },
    /// `start_line` is 1-based.
    UnterminatedJob { start_line: usize },
    UnicodeDecodeFailure,
    Unreadable { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCategory {
    Preempted,
    Cancelled,
    OomKilled,
    AtomicNumberOutOfRange,
    IllegalMultiplicity,
    ProgramError,
    ImaginaryFrequency,
    Oscillating,
    MalformedSection,
    SpecificLineError,
    IncompleteLog,
    UnterminatedJob,
    UnicodeDecodeFailure,
    Unreadable,
}

impl ReasonCategory {
    /// Generic reasons give way to any more specific reason on the same file.
    pub fn is_generic(self) -> bool {
        matches!(self, ReasonCategory::UnterminatedJob)
    }
}

impl From<SchedulerEvent> for FailureReason {
    fn from(event: SchedulerEvent) -> Self {
        match event {
            SchedulerEvent::Preempted => FailureReason::Preempted,
            SchedulerEvent::Cancelled => FailureReason::Cancelled,
            SchedulerEvent::OomKilled => FailureReason::OomKilled,
        }
    }
}

impl From<PatternError> for FailureReason {
    fn from(err: PatternError) -> Self {
        match err {
            PatternError::MalformedNumber { section, token } => FailureReason::MalformedSection {
                section: section.to_string(),
                token,
            },
        }
    }
}

impl FailureReason {
    pub fn category(&self) -> ReasonCategory {
        match self {
            FailureReason::Preempted => ReasonCategory::Preempted,
            FailureReason::Cancelled => ReasonCategory::Cancelled,
            FailureReason::OomKilled => ReasonCategory::OomKilled,
            FailureReason::AtomicNumberOutOfRange { .. } => ReasonCategory::AtomicNumberOutOfRange,
            FailureReason::IllegalMultiplicity { .. } => ReasonCategory::IllegalMultiplicity,
            FailureReason::ProgramError { .. } => ReasonCategory::ProgramError,
            FailureReason::ImaginaryFrequency { .. } => ReasonCategory::ImaginaryFrequency,
            FailureReason::Oscillating { .. } => ReasonCategory::Oscillating,
            FailureReason::MalformedSection { .. } => ReasonCategory::MalformedSection,
            FailureReason::SpecificLineErrors { .. } => ReasonCategory::SpecificLineError,
            FailureReason::IncompleteLog { .. } => ReasonCategory::IncompleteLog,
            FailureReason::UnterminatedJob { .. } => ReasonCategory::UnterminatedJob,
            FailureReason::UnicodeDecodeFailure => ReasonCategory::UnicodeDecodeFailure,
            FailureReason::Unreadable { .. } => ReasonCategory::Unreadable,
        }
    }
}

fn format_evidence(values: &[f64]) -> String {
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", joined)
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Preempted => write!(f, "preempted"),
            FailureReason::Cancelled => write!(f, "cancelled"),
            FailureReason::OomKilled => write!(f, "oom_kill"),
            FailureReason::AtomicNumberOutOfRange { line } => write!(f, "{}", line),
            FailureReason::IllegalMultiplicity { message } => write!(f, "{}", message),
            FailureReason::ProgramError { message } => write!(f, "{}", message),
            FailureReason::ImaginaryFrequency { frequency } => {
                write!(f, "imaginary freq {:.4}", frequency)
            }
            FailureReason::Oscillating { metric, evidence } => write!(
                f,
                "{} is oscillating between {}",
                metric.label(),
                format_evidence(evidence)
            ),
            FailureReason::MalformedSection { section, token } => {
                write!(f, "malformed {}: '{}'", section, token)
            }
            FailureReason::SpecificLineErrors { lines } => {
                let joined = lines
                    .iter()
                    .map(|e| format!("{} (line {})", e.text, e.line))
                    .collect::<Vec<_>>()
                    .join("\t");
                f.write_str(&joined)
            }
            FailureReason::IncompleteLog { program } => match program {
                Program::Gaussian => write!(f, "is not a complete logfile. Is the job running?"),
                Program::Orca => write!(f, "is incomplete"),
            },
            FailureReason::UnterminatedJob { start_line } => {
                write!(f, "job starting at line {} failed.", start_line)
            }
            FailureReason::UnicodeDecodeFailure => {
                write!(f, "UNICODE DECODE ERROR. CHECK FILE MANUALLY")
            }
            FailureReason::Unreadable { message } => write!(f, "could not read file: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillation_text_names_metric_and_evidence() {
        let reason = FailureReason::Oscillating {
            metric: Metric::MaxForce,
            evidence: vec![0.01, 0.02],
        };
        assert_eq!(reason.to_string(), "MAX FORCE is oscillating between {0.01, 0.02}");
    }

    #[test]
    fn imaginary_frequency_is_rounded_to_four_decimals() {
        let reason = FailureReason::ImaginaryFrequency {
            frequency: -15.343249,
        };
        assert_eq!(reason.to_string(), "imaginary freq -15.3432");
    }

    #[test]
    fn line_errors_are_tab_joined_with_line_numbers() {
        let reason = FailureReason::SpecificLineErrors {
            lines: vec![
                LineError {
                    line: 12,
                    text: "Erroneous write. Write -1 instead of 2560.".to_string(),
                },
                LineError {
                    line: 40,
                    text: "-- Number of steps exceeded,  NStep= 100".to_string(),
                },
            ],
        };
        assert_eq!(
            reason.to_string(),
            "Erroneous write. Write -1 instead of 2560. (line 12)\t-- Number of steps exceeded,  NStep= 100 (line 40)"
        );
    }

    #[test]
    fn only_unterminated_jobs_are_generic() {
        assert!(FailureReason::UnterminatedJob { start_line: 1 }
            .category()
            .is_generic());
        assert!(!FailureReason::Preempted.category().is_generic());
        assert!(!FailureReason::IncompleteLog {
            program: Program::Orca
        }
        .category()
        .is_generic());
    }

    #[test]
    fn scheduler_events_map_to_their_reasons() {
        assert_eq!(FailureReason::from(SchedulerEvent::OomKilled).to_string(), "oom_kill");
        assert_eq!(FailureReason::from(SchedulerEvent::Preempted), FailureReason::Preempted);
    }
}
