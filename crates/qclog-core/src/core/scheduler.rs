use phf::{Map, phf_map};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchedulerEvent {
    Preempted,
    Cancelled,
    OomKilled,
}

/// Tokens written by the batch scheduler on the final line of a job's error file.
static EVENT_TOKENS: Map<&'static str, SchedulerEvent> = phf_map! {
    "PREEMPTION" => SchedulerEvent::Preempted,
    "CANCELLED" => SchedulerEvent::Cancelled,
    "oom_kill" => SchedulerEvent::OomKilled,
};

/// Out-of-band signals read from a companion scheduler error file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSignals {
    pub preempted: bool,
    pub cancelled: bool,
    pub oom_killed: bool,
}

impl SchedulerSignals {
    /// Inspects the last line of the error file; earlier lines are ignored.
    pub fn from_error_text(text: &str) -> Self {
        let mut signals = Self::default();
        let Some(last_line) = text.lines().last() else {
            return signals;
        };
        for (token, event) in EVENT_TOKENS.entries() {
            if last_line.contains(token) {
                signals.set(*event);
            }
        }
        signals
    }

    fn set(&mut self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::Preempted => self.preempted = true,
            SchedulerEvent::Cancelled => self.cancelled = true,
            SchedulerEvent::OomKilled => self.oom_killed = true,
        }
    }

    /// Active events in the fixed order preempted, cancelled, out-of-memory.
    pub fn events(&self) -> Vec<SchedulerEvent> {
        [
            (self.preempted, SchedulerEvent::Preempted),
            (self.cancelled, SchedulerEvent::Cancelled),
            (self.oom_killed, SchedulerEvent::OomKilled),
        ]
        .into_iter()
        .filter_map(|(active, event)| active.then_some(event))
        .collect()
    }

    pub fn any(&self) -> bool {
        self.preempted || self.cancelled || self.oom_killed
    }
}
