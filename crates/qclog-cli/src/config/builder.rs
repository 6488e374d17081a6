use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::AssessmentArgs;
use crate::error::{CliError, Result};
use qclog::engine::config::AssessmentConfigBuilder;
use std::str::FromStr;

/// Merges flags, `-S` overrides, the config file and defaults into one validated configuration.
///
/// `delete_chk_flag` is the command's own `--delete-chk` switch; commands that
/// never touch files pass `false`.
pub fn build_config(args: &AssessmentArgs, delete_chk_flag: bool) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let program = args
        .program
        .or(file_config.program)
        .unwrap_or(defaults.program);

    let osc_file = file_config.oscillation.take().unwrap_or_default();
    let check_oscillation = if args.no_oscillation_criteria {
        false
    } else {
        osc_file.enabled.unwrap_or(defaults.check_oscillation)
    };
    let window = args
        .window
        .or(osc_file.window)
        .unwrap_or(defaults.oscillation_window);
    let tolerance = args
        .tolerance
        .or(osc_file.tolerance)
        .unwrap_or(defaults.oscillation_tolerance);

    let mut builder = AssessmentConfigBuilder::new()
        .program(program)
        .check_oscillation(check_oscillation)
        .oscillation_window(window)
        .oscillation_tolerance(tolerance);

    let policy_file = file_config.policy.take().unwrap_or_default();
    if let Some(policy) = args.incomplete_log.or(policy_file.incomplete_log) {
        builder = builder.incomplete_log(policy);
    }

    let artifacts_file = file_config.artifacts.take().unwrap_or_default();
    let delete_chk = delete_chk_flag || artifacts_file.delete_chk.unwrap_or(defaults.delete_chk);

    Ok(AppConfig {
        assessment: builder.build()?,
        delete_chk,
    })
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "program" => {
                config.program = Some(
                    value_str
                        .parse()
                        .map_err(|e: String| CliError::Config(e))?,
                );
            }
            "oscillation.enabled" => {
                config
                    .oscillation
                    .get_or_insert_with(Default::default)
                    .enabled = Some(parse_value(key, value_str, "boolean")?);
            }
            "oscillation.window" => {
                config
                    .oscillation
                    .get_or_insert_with(Default::default)
                    .window = Some(parse_value(key, value_str, "integer")?);
            }
            "oscillation.tolerance" => {
                config
                    .oscillation
                    .get_or_insert_with(Default::default)
                    .tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "policy.incomplete-log" => {
                config
                    .policy
                    .get_or_insert_with(Default::default)
                    .incomplete_log = Some(
                    value_str
                        .parse()
                        .map_err(|e: String| CliError::Config(e))?,
                );
            }
            "artifacts.delete-chk" => {
                config
                    .artifacts
                    .get_or_insert_with(Default::default)
                    .delete_chk = Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qclog::core::patterns::Program;
    use qclog::engine::config::IncompleteLogPolicy;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_args() -> AssessmentArgs {
        AssessmentArgs {
            program: None,
            config: None,
            tolerance: None,
            window: None,
            no_oscillation_criteria: false,
            incomplete_log: None,
            set_values: vec![],
        }
    }

    fn write_config(dir: &std::path::Path, body: &str) -> PathBuf {
        let path = dir.join("qclog.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn build_config_without_file_uses_defaults() {
        let app = build_config(&base_args(), false).expect("build ok");
        let defaults = DefaultsConfig::default();
        assert_eq!(app.assessment.program, defaults.program);
        assert_eq!(app.assessment.oscillation.window, defaults.oscillation_window);
        assert_eq!(
            app.assessment.oscillation.tolerance,
            defaults.oscillation_tolerance
        );
        assert!(app.assessment.oscillation.enabled);
        assert!(!app.delete_chk);
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let mut args = base_args();
        args.config = Some(write_config(
            dir.path(),
            r#"
            program = "orca"
            [oscillation]
            window = 6
            [policy]
            incomplete-log = "advisory"
            [artifacts]
            delete-chk = true
            "#,
        ));

        let app = build_config(&args, false).expect("build ok");
        assert_eq!(app.assessment.program, Program::Orca);
        assert_eq!(app.assessment.oscillation.window, 6);
        assert_eq!(
            app.assessment.incomplete_log_policy(),
            IncompleteLogPolicy::Advisory
        );
        assert!(app.delete_chk);
    }

    #[test]
    fn cli_overrides_set_values_which_override_file() {
        let dir = tempdir().unwrap();
        let mut args = base_args();
        args.config = Some(write_config(
            dir.path(),
            "[oscillation]\nwindow = 6\ntolerance = 1e-3\n",
        ));
        args.set_values = vec![
            "oscillation.window=8".to_string(),
            "oscillation.tolerance=2e-3".to_string(),
        ];
        args.tolerance = Some(5e-4);

        let app = build_config(&args, false).expect("build ok");
        assert_eq!(app.assessment.oscillation.window, 8);
        assert_eq!(app.assessment.oscillation.tolerance, 5e-4);
    }

    #[test]
    fn no_oscillation_flag_wins_over_file() {
        let dir = tempdir().unwrap();
        let mut args = base_args();
        args.config = Some(write_config(dir.path(), "[oscillation]\nenabled = true\n"));
        args.no_oscillation_criteria = true;

        let app = build_config(&args, false).expect("build ok");
        assert!(!app.assessment.oscillation.enabled);
    }

    #[test]
    fn invalid_window_is_a_config_error() {
        let mut args = base_args();
        args.window = Some(1);
        assert!(matches!(build_config(&args, false), Err(CliError::Config(_))));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["oscillation.window", "oscillation.window=ten", "colour=red", "program=nwchem"] {
            let mut args = base_args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args, false), Err(CliError::Config(_))),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn delete_chk_flag_is_honored() {
        assert!(build_config(&base_args(), true).unwrap().delete_chk);
    }
}
