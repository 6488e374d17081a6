use super::config::{AssessmentConfig, IncompleteLogPolicy};
use super::matcher::match_jobs;
use super::reason::{FailureReason, LineError, ReasonCategory};
use super::trend::{ConvergenceData, find_oscillation};
use crate::core::document::LogDocument;
use crate::core::scanner::{ScanResult, scan};
use crate::core::scheduler::SchedulerSignals;
use tracing::{debug, trace};

/// The outcome for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub success: bool,
    pub reasons: Vec<FailureReason>,
}

impl Verdict {
    pub fn from_reasons(reasons: Vec<FailureReason>) -> Self {
        Self {
            success: reasons.is_empty(),
            reasons,
        }
    }

    /// A verdict carrying a single reason that short-circuited every other check.
    pub fn terminal(reason: FailureReason) -> Self {
        Self::from_reasons(vec![reason])
    }

    pub fn reason_texts(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }

    /// All reasons, tab-joined.
    pub fn reason_text(&self) -> String {
        self.reason_texts().join("\t")
    }
}

pub fn classify(
    document: &LogDocument,
    signals: &SchedulerSignals,
    config: &AssessmentConfig,
) -> Verdict {
    let scan_result = scan(document, config.program.catalog());
    classify_scanned(document, &scan_result, signals, config)
}

/// Classifies a document that has already been scanned with `config.program`'s catalog.
pub fn classify_scanned(
    document: &LogDocument,
    scan_result: &ScanResult,
    signals: &SchedulerSignals,
    config: &AssessmentConfig,
) -> Verdict {
    let reasons = collect_reasons(document, scan_result, signals, config);
    trace!(collected = reasons.len(), "Collected failure reasons");
    Verdict::from_reasons(reduce(reasons))
}

fn collect_reasons(
    document: &LogDocument,
    scan_result: &ScanResult,
    signals: &SchedulerSignals,
    config: &AssessmentConfig,
) -> Vec<FailureReason> {
    let catalog = config.program.catalog();
    let mut reasons: Vec<FailureReason> =
        signals.events().into_iter().map(FailureReason::from).collect();

    if let Some(hit) = &scan_result.atomic_number {
        reasons.push(FailureReason::AtomicNumberOutOfRange {
            line: hit.text.clone(),
        });
    }
    if let Some(hit) = &scan_result.multiplicity {
        reasons.push(FailureReason::IllegalMultiplicity {
            message: hit.text.clone(),
        });
    }
    reasons.extend(
        scan_result
            .fatal_errors
            .iter()
            .map(|fatal| FailureReason::ProgramError {
                message: fatal.message.clone(),
            }),
    );

    if let Some(section) = &scan_result.frequency {
        match section.has_imaginary_frequency() {
            Ok((true, frequency)) => reasons.push(FailureReason::ImaginaryFrequency { frequency }),
            Ok((false, _)) => {}
            Err(e) => reasons.push(e.into()),
        }
    }

    if config.oscillation.enabled {
        match ConvergenceData::extract(document, catalog) {
            Ok(data) => {
                if let Some((metric, evidence)) = find_oscillation(&data, &config.oscillation) {
                    reasons.push(FailureReason::Oscillating { metric, evidence });
                }
            }
            Err(e) => reasons.push(e.into()),
        }
    }

    let line_errors: Vec<LineError> = scan_result
        .line_errors()
        .map(|m| LineError {
            line: m.line + 1,
            text: document.line(m.line).unwrap_or_default().trim().to_string(),
        })
        .collect();
    if !line_errors.is_empty() {
        reasons.push(FailureReason::SpecificLineErrors { lines: line_errors });
    }

    if !scan_result.ends_with_termination {
        match config.incomplete_log_policy() {
            IncompleteLogPolicy::Failure => reasons.push(FailureReason::IncompleteLog {
                program: config.program,
            }),
            IncompleteLogPolicy::Advisory => {
                debug!("No termination marker in the last lines; log may be incomplete.")
            }
        }
    }

    reasons.extend(
        match_jobs(&scan_result.markers)
            .into_iter()
            .filter(|step| step.is_failed())
            .map(|step| FailureReason::UnterminatedJob {
                start_line: step.start_line + 1,
            }),
    );

    reasons
}

/// Applies the precedence rules to the collected reasons.
///
/// A lone oscillation is dropped first. Then, with more than one reason left,
/// generic reasons give way to specific ones; generic reasons are never all
/// dropped when nothing specific replaces them.
pub fn reduce(mut reasons: Vec<FailureReason>) -> Vec<FailureReason> {
    if reasons.len() == 1 && reasons[0].category() == ReasonCategory::Oscillating {
        reasons.clear();
    }
    let has_specific = reasons.iter().any(|r| !r.category().is_generic());
    if reasons.len() > 1 && has_specific {
        reasons.retain(|reason| !reason.category().is_generic());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patterns::{Metric, Program};
    use crate::engine::config::AssessmentConfigBuilder;

    fn gaussian_config() -> AssessmentConfig {
        AssessmentConfigBuilder::new()
            .oscillation_tolerance(1e-4)
            .build()
            .unwrap()
    }

    fn classify_text(text: &str) -> Verdict {
        classify(
            &LogDocument::new(text),
            &SchedulerSignals::default(),
            &gaussian_config(),
        )
    }

    fn convergence_block(max_force: f64) -> String {
        format!(
            " Maximum Force            {max_force:.6}     0.000450     NO \n \
             RMS     Force            0.000100     0.000300     YES\n \
             Maximum Displacement     0.000200     0.001800     YES\n \
             RMS     Displacement     0.000100     0.001200     YES\n"
        )
    }

    fn oscillating_log(terminated: bool) -> String {
        let mut text = String::from(" Entering Link 1 = l1.exe\n");
        for i in 0..10 {
            text.push_str(&convergence_block(if i % 2 == 0 { 0.01 } else { 0.02 }));
        }
        if terminated {
            text.push_str(" Normal termination of Gaussian 16 at Mon Jan  1 00:00:00 2024.\n");
        }
        text
    }

    const COMPLETE_LOG: &str = "\
 Entering Link 1 = C:\\G16W\\l1.exe PID=      1111.
 SCF Done:  E(RB3LYP) =  -76.4
 Normal termination of Gaussian 16 at Mon Jan  1 00:00:00 2024.
 Link1:  Proceeding to internal job step number  2.
 Harmonic frequencies (cm**-1)
 Frequencies --   1602.3144              3811.5712              3915.1254
 Red. masses --      1.0825                 1.0453                 1.0825
 Normal termination of Gaussian 16 at Mon Jan  1 00:05:00 2024.
";

    #[test]
    fn markerless_document_succeeds() {
        let verdict = classify_text("just some text\nwith no markers\n");
        assert_eq!(verdict, Verdict::from_reasons(vec![]));
        assert!(verdict.success);
    }

    #[test]
    fn complete_two_step_log_succeeds() {
        let verdict = classify_text(COMPLETE_LOG);
        assert!(verdict.success, "unexpected reasons: {:?}", verdict.reasons);
    }

    #[test]
    fn imaginary_frequency_fails_with_rounded_value() {
        let text = COMPLETE_LOG.replace("1602.3144", "-15.3432");
        let verdict = classify_text(&text);
        assert!(!verdict.success);
        assert_eq!(verdict.reason_texts(), vec!["imaginary freq -15.3432"]);
    }

    #[test]
    fn unterminated_job_yields_exactly_one_reason() {
        let text = " Entering Link 1\n Normal termination of Gaussian 16\n Link1:  Proceeding to internal job step number  2.\n SCF Done\n";
        let verdict = classify_text(text);
        assert_eq!(
            verdict.reasons,
            vec![FailureReason::UnterminatedJob { start_line: 3 }]
        );
        assert_eq!(verdict.reason_text(), "job starting at line 3 failed.");
    }

    #[test]
    fn specific_reasons_displace_generic_ones() {
        let text = " Entering Link 1\n Erroneous write. Write -1 instead of 2560.\n";
        let verdict = classify_text(text);
        assert_eq!(
            verdict.reason_texts(),
            vec!["Erroneous write. Write -1 instead of 2560. (line 2)"]
        );
    }

    #[test]
    fn sole_oscillation_is_suppressed() {
        let verdict = classify_text(&oscillating_log(true));
        assert!(verdict.success, "unexpected reasons: {:?}", verdict.reasons);
    }

    #[test]
    fn oscillation_alongside_generic_failure_is_kept() {
        let verdict = classify_text(&oscillating_log(false));
        assert_eq!(verdict.reasons.len(), 1);
        assert!(matches!(
            verdict.reasons[0],
            FailureReason::Oscillating {
                metric: Metric::MaxForce,
                ..
            }
        ));
    }

    #[test]
    fn partial_convergence_data_never_oscillates() {
        let mut text = String::from(" Entering Link 1\n");
        for i in 0..10 {
            let value = if i % 2 == 0 { 0.01 } else { 0.02 };
            text.push_str(&format!(" Maximum Force            {value:.6}     0.000450     NO \n"));
        }
        let verdict = classify_text(&text);
        assert_eq!(verdict.reason_texts(), vec!["job starting at line 1 failed."]);
    }

    #[test]
    fn disabled_oscillation_check_reports_only_the_job_failure() {
        let config = AssessmentConfigBuilder::new()
            .check_oscillation(false)
            .build()
            .unwrap();
        let verdict = classify(
            &LogDocument::new(oscillating_log(false)),
            &SchedulerSignals::default(),
            &config,
        );
        assert_eq!(
            verdict.reasons,
            vec![FailureReason::UnterminatedJob { start_line: 1 }]
        );
    }

    #[test]
    fn preemption_is_reported_regardless_of_log_content() {
        let signals = SchedulerSignals::from_error_text("*** JOB 7 CANCELLED DUE TO PREEMPTION ***");
        let verdict = classify(&LogDocument::new(COMPLETE_LOG), &signals, &gaussian_config());
        assert_eq!(verdict.reason_texts(), vec!["preempted", "cancelled"]);
    }

    #[test]
    fn collection_order_follows_precedence() {
        let text = "\
 Entering Link 1
 Atomic number out of range for 3-21G basis set.
 The combination of multiplicity  2 and   10 electrons is impossible.
 FileIO operation on non-existent file.
";
        let verdict = classify_text(text);
        let categories: Vec<_> = verdict.reasons.iter().map(|r| r.category()).collect();
        assert_eq!(
            categories,
            vec![
                ReasonCategory::AtomicNumberOutOfRange,
                ReasonCategory::IllegalMultiplicity,
                ReasonCategory::SpecificLineError,
            ]
        );
    }

    #[test]
    fn malformed_frequency_section_is_reported() {
        let text = COMPLETE_LOG.replace("1602.3144", "*********");
        let verdict = classify_text(&text);
        assert_eq!(
            verdict.reasons,
            vec![FailureReason::MalformedSection {
                section: "frequency section".to_string(),
                token: "*********".to_string()
            }]
        );
    }

    #[test]
    fn incomplete_log_policy_controls_the_trailing_marker_check() {
        let text = " Entering Link 1\n Normal termination of Gaussian 16\n SCF Done\n More output\n";
        assert!(classify_text(text).success);

        let strict = AssessmentConfigBuilder::new()
            .incomplete_log(IncompleteLogPolicy::Failure)
            .build()
            .unwrap();
        let verdict = classify(&LogDocument::new(text), &SchedulerSignals::default(), &strict);
        assert_eq!(
            verdict.reason_texts(),
            vec!["is not a complete logfile. Is the job running?"]
        );
    }

    #[test]
    fn orca_log_without_termination_is_incomplete() {
        let config = AssessmentConfigBuilder::new()
            .program(Program::Orca)
            .build()
            .unwrap();
        let verdict = classify(
            &LogDocument::new(" SCF ITERATIONS\n  ITER       Energy\n"),
            &SchedulerSignals::default(),
            &config,
        );
        assert_eq!(verdict.reason_texts(), vec!["is incomplete"]);

        let finished = classify(
            &LogDocument::new(" SCF ITERATIONS\n                             ****ORCA TERMINATED NORMALLY****\nTOTAL RUN TIME: 0 days 0 hours 1 minutes\n"),
            &SchedulerSignals::default(),
            &config,
        );
        assert!(finished.success);
    }

    #[test]
    fn repeated_classification_is_identical() {
        let doc = LogDocument::new(oscillating_log(false));
        let config = gaussian_config();
        let first = classify(&doc, &SchedulerSignals::default(), &config);
        let second = classify(&doc, &SchedulerSignals::default(), &config);
        assert_eq!(first, second);
        assert_eq!(first.reason_text(), second.reason_text());
    }

    #[test]
    fn several_failed_jobs_without_specific_reasons_are_all_kept() {
        let reasons = vec![
            FailureReason::UnterminatedJob { start_line: 1 },
            FailureReason::UnterminatedJob { start_line: 9 },
        ];
        assert_eq!(reduce(reasons.clone()), reasons);
    }

    #[test]
    fn reduce_drops_generic_reasons_next_to_a_specific_one() {
        let reduced = reduce(vec![
            FailureReason::OomKilled,
            FailureReason::UnterminatedJob { start_line: 4 },
        ]);
        assert_eq!(reduced, vec![FailureReason::OomKilled]);
    }
}
