use crate::core::patterns::Program;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    #[error("Conflicting options: {0}")]
    Conflict(&'static str),
}

pub const DEFAULT_OSCILLATION_WINDOW: usize = 10;
pub const DEFAULT_OSCILLATION_TOLERANCE: f64 = 1e-5;
/// Smallest accepted window. With one or two values there is no pair of
/// step changes to compare, so every series would count as oscillating.
pub const MIN_OSCILLATION_WINDOW: usize = 3;

/// What to do with a log whose last lines carry no termination marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncompleteLogPolicy {
    /// Log the observation; the verdict is unaffected.
    Advisory,
    /// Record an `IncompleteLog` failure reason.
    Failure,
}

impl std::str::FromStr for IncompleteLogPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "advisory" => Ok(Self::Advisory),
            "failure" | "fail" => Ok(Self::Failure),
            other => Err(format!(
                "Unknown policy '{}'. Expected 'advisory' or 'failure'.",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillationConfig {
    pub enabled: bool,
    pub window: usize,
    pub tolerance: f64,
}

impl Default for OscillationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: DEFAULT_OSCILLATION_WINDOW,
            tolerance: DEFAULT_OSCILLATION_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AssessmentConfig {
    pub program: Program,
    pub oscillation: OscillationConfig,
    incomplete_log: Option<IncompleteLogPolicy>,
}

impl AssessmentConfig {
    /// The configured policy, or the program's own default when none was set.
    pub fn incomplete_log_policy(&self) -> IncompleteLogPolicy {
        self.incomplete_log.unwrap_or(match self.program {
            Program::Gaussian => IncompleteLogPolicy::Advisory,
            Program::Orca => IncompleteLogPolicy::Failure,
        })
    }
}

#[derive(Default)]
pub struct AssessmentConfigBuilder {
    program: Option<Program>,
    check_oscillation: Option<bool>,
    window: Option<usize>,
    tolerance: Option<f64>,
    incomplete_log: Option<IncompleteLogPolicy>,
}

impl AssessmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: Program) -> Self {
        self.program = Some(program);
        self
    }
    pub fn check_oscillation(mut self, enabled: bool) -> Self {
        self.check_oscillation = Some(enabled);
        self
    }
    pub fn oscillation_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }
    pub fn oscillation_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn incomplete_log(mut self, policy: IncompleteLogPolicy) -> Self {
        self.incomplete_log = Some(policy);
        self
    }

    pub fn build(self) -> Result<AssessmentConfig, ConfigError> {
        let defaults = OscillationConfig::default();
        let window = self.window.unwrap_or(defaults.window);
        if window < MIN_OSCILLATION_WINDOW {
            return Err(ConfigError::InvalidParameter {
                parameter: "oscillation.window",
                reason: format!("must be at least {}, got {}", MIN_OSCILLATION_WINDOW, window),
            });
        }
        let tolerance = self.tolerance.unwrap_or(defaults.tolerance);
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "oscillation.tolerance",
                reason: format!("must be a finite positive number, got {}", tolerance),
            });
        }

        Ok(AssessmentConfig {
            program: self.program.unwrap_or_default(),
            oscillation: OscillationConfig {
                enabled: self.check_oscillation.unwrap_or(defaults.enabled),
                window,
                tolerance,
            },
            incomplete_log: self.incomplete_log,
        })
    }
}

/// How a batch of files is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchConfig {
    parallel: bool,
    diagnostics: bool,
}

impl BatchConfig {
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    parallel: bool,
    diagnostics: bool,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        if self.parallel && self.diagnostics {
            return Err(ConfigError::Conflict(
                "line-by-line diagnostics cannot be combined with parallel execution",
            ));
        }
        let parallel = if self.parallel && !cfg!(feature = "parallel") {
            warn!("Parallel execution requested but the 'parallel' feature is disabled; running sequentially.");
            false
        } else {
            self.parallel
        };
        Ok(BatchConfig {
            parallel,
            diagnostics: self.diagnostics,
        })
    }
}
