use crate::core::patterns::SignatureKind;
use crate::core::scanner::SignatureMatch;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherState {
    AwaitingStart,
    AwaitingTermination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    /// The termination with this job's ordinal appeared before the job started.
    TerminatedBeforeStart,
    /// No termination with this job's ordinal exists.
    Unterminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobStep {
    pub ordinal: usize,
    pub start_line: usize,
    pub termination_line: Option<usize>,
    pub status: JobStatus,
}

impl JobStep {
    pub fn is_failed(&self) -> bool {
        self.status != JobStatus::Completed
    }
}

/// Pairs the i-th job start with the i-th termination, consuming markers in line order.
///
/// A job fails when its paired termination either never arrives or arrived
/// before the job itself started.
#[derive(Debug, Default)]
pub struct JobMatcher {
    starts_seen: usize,
    terminations_seen: usize,
    open: VecDeque<(usize, usize)>,
    steps: Vec<JobStep>,
}

impl JobMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MatcherState {
        if self.open.is_empty() {
            MatcherState::AwaitingStart
        } else {
            MatcherState::AwaitingTermination
        }
    }

    /// Feeds one marker. Markers other than job starts and terminations are ignored.
    pub fn consume(&mut self, marker: &SignatureMatch) {
        match marker.kind {
            SignatureKind::JobStart => self.on_start(marker.line),
            SignatureKind::Termination => self.on_termination(marker.line),
            _ => {}
        }
    }

    fn on_start(&mut self, line: usize) {
        let ordinal = self.starts_seen;
        self.starts_seen += 1;
        if self.terminations_seen > ordinal {
            self.steps.push(JobStep {
                ordinal,
                start_line: line,
                termination_line: None,
                status: JobStatus::TerminatedBeforeStart,
            });
        } else {
            self.open.push_back((ordinal, line));
        }
    }

    fn on_termination(&mut self, line: usize) {
        let ordinal = self.terminations_seen;
        self.terminations_seen += 1;
        if let Some(&(open_ordinal, start_line)) = self.open.front() {
            if open_ordinal == ordinal {
                self.open.pop_front();
                self.steps.push(JobStep {
                    ordinal,
                    start_line,
                    termination_line: Some(line),
                    status: JobStatus::Completed,
                });
            }
        }
    }

    /// Closes every still-open job as unterminated and returns all steps by ordinal.
    pub fn finish(mut self) -> Vec<JobStep> {
        while let Some((ordinal, start_line)) = self.open.pop_front() {
            self.steps.push(JobStep {
                ordinal,
                start_line,
                termination_line: None,
                status: JobStatus::Unterminated,
            });
        }
        self.steps.sort_by_key(|step| step.ordinal);
        self.steps
    }
}

/// Runs a fresh matcher over markers already in ascending line order.
pub fn match_jobs<'a>(markers: impl IntoIterator<Item = &'a SignatureMatch>) -> Vec<JobStep> {
    let mut matcher = JobMatcher::new();
    for marker in markers {
        matcher.consume(marker);
    }
    matcher.finish()
}
