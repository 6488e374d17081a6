use qclog::core::patterns::Program;
use qclog::engine::config::{DEFAULT_OSCILLATION_TOLERANCE, DEFAULT_OSCILLATION_WINDOW};

pub struct DefaultsConfig {
    pub program: Program,
    pub check_oscillation: bool,
    pub oscillation_window: usize,
    pub oscillation_tolerance: f64,
    pub delete_chk: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            program: Program::Gaussian,
            check_oscillation: true,
            oscillation_window: DEFAULT_OSCILLATION_WINDOW,
            oscillation_tolerance: DEFAULT_OSCILLATION_TOLERANCE,
            delete_chk: false,
        }
    }
}
