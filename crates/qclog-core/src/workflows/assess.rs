use crate::core::document::{DocumentError, LogDocument};
use crate::core::io::log::{read_log, read_scheduler_text};
use crate::core::scanner::{ScanResult, scan};
use crate::core::scheduler::SchedulerSignals;
use crate::engine::classifier::{Verdict, classify_scanned};
use crate::engine::config::AssessmentConfig;
use crate::engine::reason::FailureReason;
use std::path::Path;
use tracing::{debug, warn};

/// A verdict plus the scan it was derived from, when the log could be decoded.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub verdict: Verdict,
    pub scan: Option<ScanResult>,
}

impl Assessment {
    fn terminal(reason: FailureReason) -> Self {
        Self {
            verdict: Verdict::terminal(reason),
            scan: None,
        }
    }
}

pub fn assess_document(
    document: &LogDocument,
    signals: &SchedulerSignals,
    config: &AssessmentConfig,
) -> Assessment {
    let scan_result = scan(document, config.program.catalog());
    let verdict = classify_scanned(document, &scan_result, signals, config);
    Assessment {
        verdict,
        scan: Some(scan_result),
    }
}

/// Assesses raw log bytes. Invalid UTF-8 short-circuits to a single decode-failure reason.
pub fn assess_bytes(
    bytes: Vec<u8>,
    signals: &SchedulerSignals,
    config: &AssessmentConfig,
) -> Assessment {
    match LogDocument::from_bytes(bytes) {
        Ok(document) => assess_document(&document, signals, config),
        Err(e) => terminal_for(e),
    }
}

/// Reads and assesses one log file from disk.
///
/// The scheduler error file is only consulted once the log itself has been
/// decoded; a scheduler file that cannot be read is treated as absent.
pub fn assess_path(
    log_path: &Path,
    scheduler_path: Option<&Path>,
    config: &AssessmentConfig,
) -> Assessment {
    let document = match read_log(log_path) {
        Ok(document) => document,
        Err(e) => {
            warn!(file = %log_path.display(), error = %e, "Log could not be loaded");
            return terminal_for(e);
        }
    };

    let signals = match scheduler_path {
        Some(path) => match read_scheduler_text(path) {
            Ok(text) => SchedulerSignals::from_error_text(&text),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Scheduler error file unreadable; ignoring it");
                SchedulerSignals::default()
            }
        },
        None => SchedulerSignals::default(),
    };

    let assessment = assess_document(&document, &signals, config);
    debug!(
        file = %log_path.display(),
        success = assessment.verdict.success,
        reasons = %assessment.verdict.reason_text(),
        "Assessed log"
    );
    assessment
}

fn terminal_for(error: DocumentError) -> Assessment {
    match error {
        DocumentError::Decode { .. } => Assessment::terminal(FailureReason::UnicodeDecodeFailure),
        DocumentError::Io(e) => Assessment::terminal(FailureReason::Unreadable {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const FINISHED: &str = " Entering Link 1 = l1.exe\n Normal termination of Gaussian 16 at Mon.\n";

    #[test]
    fn decode_failure_short_circuits_everything_else() {
        let bytes = vec![b' ', b'E', 0xfe, b'\n'];
        let signals = SchedulerSignals::from_error_text("oom_kill");
        let assessment = assess_bytes(bytes, &signals, &AssessmentConfig::default());
        assert_eq!(
            assessment.verdict.reasons,
            vec![FailureReason::UnicodeDecodeFailure]
        );
        assert!(assessment.scan.is_none());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let assessment = assess_path(
            &dir.path().join("ghost.log"),
            None,
            &AssessmentConfig::default(),
        );
        assert!(!assessment.verdict.success);
        assert!(matches!(
            assessment.verdict.reasons.as_slice(),
            [FailureReason::Unreadable { .. }]
        ));
        assert!(assessment.verdict.reason_text().starts_with("could not read file: "));
    }

    #[test]
    fn companion_scheduler_file_contributes_signals() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("mol.log");
        let err = dir.path().join("mol-error.txt");
        fs::write(&log, FINISHED).unwrap();
        fs::write(&err, "start\nslurmstepd: Detected 1 oom_kill event\n").unwrap();

        let with_signals = assess_path(&log, Some(&err), &AssessmentConfig::default());
        assert_eq!(with_signals.verdict.reason_texts(), vec!["oom_kill"]);

        let without = assess_path(&log, None, &AssessmentConfig::default());
        assert!(without.verdict.success);
        assert!(without.scan.is_some());
    }

    #[test]
    fn unreadable_scheduler_file_is_ignored() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("mol.log");
        fs::write(&log, FINISHED).unwrap();
        let assessment = assess_path(
            &log,
            Some(&dir.path().join("missing-error.txt")),
            &AssessmentConfig::default(),
        );
        assert!(assessment.verdict.success);
    }
}
