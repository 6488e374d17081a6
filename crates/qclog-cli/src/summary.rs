use crate::artifacts::{Destination, Relocation};
use console::style;
use qclog::workflows::batch::BatchReport;
use qclog::workflows::diagnostics::banner;
use std::path::Path;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn totals(report: &BatchReport) -> String {
    let total = report.len();
    let completed = report.completed().count();
    let failed = report.failed().count();
    format!(
        "\n{}:\t\t{}\n{}:\t{} ({} of {})\n{}:\t\t{} ({} of {})\n",
        style("TOTAL").bold(),
        total,
        style("COMPLETED").bold(),
        completed,
        completed,
        total,
        style("FAILED").bold(),
        failed,
        failed,
        total
    )
}

/// Failed files with their reasons, followed by the batch counts.
pub fn render_overview(report: &BatchReport) -> String {
    let mut out = banner("OVERVIEW");
    out.push('\n');
    for (path, verdict) in report.failed() {
        out.push_str(&format!(
            "{} failed because {}\n",
            style(file_name(path)).red(),
            verdict.reason_text()
        ));
    }
    out.push_str(&totals(report));
    out
}

/// Moved files per destination, deleted checkpoints, then anything that
/// could not be relocated.
pub fn render_relocations(relocations: &[Relocation]) -> String {
    let mut out = String::new();
    for destination in [Destination::Completed, Destination::Failed] {
        let title = format!(
            "FILES MOVED TO {} DIRECTORY",
            destination.dir_name().to_uppercase()
        );
        out.push_str(&banner(&title));
        out.push('\n');
        for path in relocations
            .iter()
            .filter(|r| r.destination == destination)
            .flat_map(|r| r.moved.iter())
        {
            let name = file_name(path);
            let styled = match destination {
                Destination::Completed => style(name).green(),
                Destination::Failed => style(name).red(),
            };
            out.push_str(&format!("{}\n", styled));
        }
    }

    let deleted: Vec<_> = relocations.iter().flat_map(|r| r.deleted.iter()).collect();
    if !deleted.is_empty() {
        out.push_str(&banner("DELETED CHK FILES"));
        out.push('\n');
        for path in deleted {
            out.push_str(&file_name(path));
            out.push('\n');
        }
    }

    let failures: Vec<_> = relocations.iter().flat_map(|r| r.failures.iter()).collect();
    if !failures.is_empty() {
        out.push_str(&banner("FILES NOT RELOCATED"));
        out.push('\n');
        for failure in failures {
            out.push_str(&format!("{}\n", style(failure).yellow()));
        }
    }
    out
}
