use crate::error::{CliError, Result};
use qclog::core::patterns::Program;
use qclog::workflows::batch::LogJob;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolves the input path into the sorted list of logs to assess.
///
/// A directory is scanned (non-recursively) for logs with the program's
/// extension; a single file is accepted only if it carries that extension.
pub fn find_logs(input: &Path, program: Program) -> Result<Vec<PathBuf>> {
    let extension = program.log_extension();

    if input.is_file() {
        return if has_extension(input, extension) {
            Ok(vec![input.to_path_buf()])
        } else {
            Err(CliError::Argument(format!(
                "'{}' is not a .{} file",
                input.display(),
                extension
            )))
        };
    }

    if !input.is_dir() {
        return Err(CliError::Argument(format!(
            "Input path '{}' does not exist",
            input.display()
        )));
    }

    let mut logs = glob_files(input, &format!("*.{}", extension))?;
    logs.sort();

    if logs.is_empty() {
        return Err(CliError::NoLogsFound {
            path: input.to_path_buf(),
            extension: format!(".{}", extension),
        });
    }
    debug!(count = logs.len(), "Discovered log files.");
    Ok(logs)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Lists the regular files in `dir` matching `file_pattern`.
///
/// The directory part is escaped so brackets or stars in its name are
/// matched literally.
fn glob_files(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        file_pattern
    );
    let entries = glob::glob(&pattern)
        .map_err(|e| CliError::Argument(format!("Invalid search pattern '{}': {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable directory entry: {}", e),
        }
    }
    Ok(files)
}

/// Finds the scheduler error file belonging to `log`.
///
/// The companion is the unique sibling whose name contains both `error` and
/// the log's stem. No match or several matches both mean "absent".
pub fn find_scheduler_file(log: &Path) -> Option<PathBuf> {
    let stem = log.file_stem()?.to_string_lossy().into_owned();
    let dir = log.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let entries = match glob_files(dir, "*error*") {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), "Cannot search for scheduler files: {}", e);
            return None;
        }
    };

    let candidates: Vec<PathBuf> = entries
        .into_iter()
        .filter(|path| path.file_name() != log.file_name())
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy())
                .is_some_and(|name| name.contains(stem.as_str()))
        })
        .collect();

    match candidates.as_slice() {
        [single] => Some(single.clone()),
        [] => None,
        many => {
            warn!(
                log = %log.display(),
                matches = many.len(),
                "Multiple scheduler error files match; ignoring all of them."
            );
            None
        }
    }
}

/// Pairs every log with its scheduler error file, if any.
pub fn build_jobs(logs: Vec<PathBuf>) -> Vec<LogJob> {
    logs.into_iter()
        .map(|log| match find_scheduler_file(&log) {
            Some(companion) => LogJob::new(log).with_scheduler_file(companion),
            None => LogJob::new(log),
        })
        .collect()
}
