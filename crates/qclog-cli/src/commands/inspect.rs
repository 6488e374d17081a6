use crate::cli::InspectArgs;
use crate::config::build_config;
use crate::discovery;
use crate::error::Result;
use console::style;
use qclog::workflows::assess::{Assessment, assess_path};
use qclog::workflows::diagnostics;
use std::path::Path;
use tracing::info;

fn render_inspection(path: &Path, assessment: &Assessment) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut out = match &assessment.scan {
        Some(scan_result) => diagnostics::render(&name, scan_result),
        None => format!("{}\n", diagnostics::banner(&name)),
    };

    let verdict = &assessment.verdict;
    if verdict.success {
        out.push_str(&format!("\t{}\n", style("completed").green().bold()));
    } else {
        out.push_str(&format!("\t{}\n", style("failed").red().bold()));
        for reason in verdict.reason_texts() {
            out.push_str(&format!("\t\t{}\n", reason));
        }
    }
    out
}

pub async fn run(args: InspectArgs) -> Result<()> {
    let app_config = build_config(&args.assessment, false)?;

    for file in &args.files {
        let scheduler_file = discovery::find_scheduler_file(file);
        info!(file = %file.display(), scheduler = ?scheduler_file, "Inspecting log.");
        let assessment = tokio::task::block_in_place(|| {
            assess_path(file, scheduler_file.as_deref(), &app_config.assessment)
        });
        println!("{}", render_inspection(file, &assessment));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use qclog::engine::config::AssessmentConfig;
    use std::fs;
    use tempfile::tempdir;

    fn inspect_text(name: &str, body: &[u8]) -> String {
        let dir = tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        let assessment = assess_path(&path, None, &AssessmentConfig::default());
        strip_ansi_codes(&render_inspection(&path, &assessment)).into_owned()
    }

    #[test]
    fn completed_log_shows_analysis_and_verdict() {
        let text = inspect_text(
            "ok.log",
            b" Entering Link 1\n Normal termination of Gaussian 16\n",
        );
        assert!(text.contains("ok.log"));
        assert!(text.contains("Line-by-line analysis:"));
        assert!(text.trim_end().ends_with("completed"));
    }

    #[test]
    fn failed_log_lists_each_reason() {
        let text = inspect_text(
            "freq.log",
            b" Entering Link 1\n Frequencies --   -20.5000   11.0\n Red. masses --   1.0   1.0\n",
        );
        assert!(text.contains("\tfailed\n"));
        assert!(text.contains("\t\timaginary freq -20.5000\n"));
    }

    #[test]
    fn undecodable_log_has_banner_only() {
        let text = inspect_text("bin.log", &[0x20, 0xff, 0xfe, 0x0a]);
        assert!(!text.contains("Line-by-line analysis:"));
        assert!(text.contains("\tfailed\n"));
    }
}
