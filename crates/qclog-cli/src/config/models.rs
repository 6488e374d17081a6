use qclog::engine::config::AssessmentConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    pub assessment: AssessmentConfig,
    pub delete_chk: bool,
}
