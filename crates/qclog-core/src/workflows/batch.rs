use super::assess::assess_path;
use crate::core::io::report::{ReportRecord, ReportStatus, write_report_file};
use crate::engine::classifier::Verdict;
use crate::engine::config::{AssessmentConfig, BatchConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One log to assess, with its scheduler error file if one was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogJob {
    pub log_path: PathBuf,
    pub scheduler_path: Option<PathBuf>,
}

impl LogJob {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            scheduler_path: None,
        }
    }

    pub fn with_scheduler_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.scheduler_path = Some(path.into());
        self
    }
}

/// Verdicts of a batch keyed by log path, independent of completion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    verdicts: BTreeMap<PathBuf, Verdict>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Verdict> {
        self.verdicts.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Verdict)> {
        self.verdicts.iter()
    }

    pub fn completed(&self) -> impl Iterator<Item = &PathBuf> {
        self.verdicts
            .iter()
            .filter(|(_, v)| v.success)
            .map(|(path, _)| path)
    }

    pub fn failed(&self) -> impl Iterator<Item = (&PathBuf, &Verdict)> {
        self.verdicts.iter().filter(|(_, v)| !v.success)
    }

    pub fn records(&self) -> Vec<ReportRecord> {
        self.verdicts
            .iter()
            .map(|(path, verdict)| ReportRecord {
                file: path.display().to_string(),
                status: if verdict.success {
                    ReportStatus::Completed
                } else {
                    ReportStatus::Failed
                },
                reasons: verdict.reason_text(),
            })
            .collect()
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), EngineError> {
        write_report_file(&self.records(), path)?;
        info!(path = %path.display(), rows = self.len(), "Wrote verdict report");
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[instrument(skip_all, name = "batch_workflow", fields(files = jobs.len()))]
pub fn run(
    jobs: &[LogJob],
    assessment: &AssessmentConfig,
    batch: &BatchConfig,
    reporter: &ProgressReporter,
) -> BatchReport {
    reporter.report(Progress::PhaseStart { name: "Assessment" });
    reporter.report(Progress::BatchStart {
        total_files: jobs.len() as u64,
    });
    info!(
        program = %assessment.program,
        parallel = batch.parallel(),
        "Assessing {} log file(s).",
        jobs.len()
    );

    let evaluate = |job: &LogJob| -> (PathBuf, Verdict) {
        let result = assess_path(&job.log_path, job.scheduler_path.as_deref(), assessment);
        if batch.diagnostics() {
            if let Some(scan_result) = &result.scan {
                reporter.report(Progress::FileScanned {
                    name: display_name(&job.log_path),
                    scan: scan_result.clone(),
                });
            }
        }
        reporter.report(Progress::FileAssessed {
            success: result.verdict.success,
        });
        (job.log_path.clone(), result.verdict)
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<(PathBuf, Verdict)> = if batch.parallel() {
        jobs.par_iter().map(&evaluate).collect()
    } else {
        jobs.iter().map(&evaluate).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<(PathBuf, Verdict)> = jobs.iter().map(&evaluate).collect();

    let report = BatchReport {
        verdicts: outcomes.into_iter().collect(),
    };

    reporter.report(Progress::BatchFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        completed = report.completed().count(),
        failed = report.failed().count(),
        "Batch assessment finished."
    );
    report
}
