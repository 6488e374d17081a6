use crate::error::CliError;
use qclog::core::patterns::Program;
use qclog::workflows::batch::BatchReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const GAUSSIAN_CHK_SUFFIXES: [&str; 3] = ["_sp_ra.chk", "_sp_rc.chk", "_sp_solv.chk"];
const ORCA_OUTPUT_EXTENSIONS: [&str; 6] =
    ["bibtex", "densitiesinfo", "xyz", "gbw", "densities", "hess"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Destination {
    Completed,
    Failed,
}

impl Destination {
    pub fn dir_name(self) -> &'static str {
        match self {
            Destination::Completed => "completed",
            Destination::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactAction {
    Move(PathBuf),
    Delete(PathBuf),
}

/// What happened to one log and its artifacts.
///
/// A failed move or deletion is recorded and the remaining artifacts are
/// still processed.
#[derive(Debug)]
pub struct Relocation {
    pub log: PathBuf,
    pub destination: Destination,
    pub moved: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<CliError>,
}

impl Relocation {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn sibling(log: &Path, name: impl AsRef<Path>) -> PathBuf {
    match log.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name.as_ref()),
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn gaussian_actions(log: &Path, delete_chk: bool) -> Vec<ArtifactAction> {
    let stem = stem_of(log);
    let chk = |path: PathBuf| {
        if delete_chk {
            ArtifactAction::Delete(path)
        } else {
            ArtifactAction::Move(path)
        }
    };

    let mut actions = vec![
        ArtifactAction::Move(log.to_path_buf()),
        ArtifactAction::Move(log.with_extension("com")),
        chk(log.with_extension("chk")),
    ];
    actions.extend(
        GAUSSIAN_CHK_SUFFIXES
            .iter()
            .map(|suffix| chk(sibling(log, format!("{}{}", stem, suffix)))),
    );
    actions.push(ArtifactAction::Move(log.with_extension("wfn")));
    actions
}

fn orca_actions(log: &Path) -> Vec<ArtifactAction> {
    let input = {
        let inp = log.with_extension("inp");
        if inp.exists() {
            inp
        } else {
            log.with_extension("orcainp")
        }
    };
    let input_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let input_stem = stem_of(&input);

    let mut paths = vec![log.to_path_buf(), input.clone()];
    paths.extend(
        ORCA_OUTPUT_EXTENSIONS
            .iter()
            .map(|ext| sibling(log, format!("{}.{}", input_name, ext))),
    );
    paths.push(sibling(log, format!("{}.slurm", input_stem)));
    paths.extend(
        ORCA_OUTPUT_EXTENSIONS
            .iter()
            .map(|ext| sibling(log, format!("{}.{}", input_stem, ext))),
    );
    paths.into_iter().map(ArtifactAction::Move).collect()
}

/// Lists the existing files that travel with `log`, the log itself first.
///
/// `delete_chk` only applies to Gaussian checkpoint files.
pub fn plan(log: &Path, program: Program, delete_chk: bool) -> Vec<ArtifactAction> {
    let actions = match program {
        Program::Gaussian => gaussian_actions(log, delete_chk),
        Program::Orca => orca_actions(log),
    };

    let mut seen = Vec::new();
    actions
        .into_iter()
        .filter(|action| {
            let path = match action {
                ArtifactAction::Move(p) | ArtifactAction::Delete(p) => p,
            };
            if seen.contains(path) || !path.is_file() {
                return false;
            }
            seen.push(path.clone());
            true
        })
        .collect()
}

/// Moves `log` and its artifacts into the destination directory beside it.
pub fn relocate(
    log: &Path,
    destination: Destination,
    program: Program,
    delete_chk: bool,
) -> Relocation {
    let mut relocation = Relocation {
        log: log.to_path_buf(),
        destination,
        moved: Vec::new(),
        deleted: Vec::new(),
        failures: Vec::new(),
    };

    let target_dir = sibling(log, destination.dir_name());
    if let Err(source) = fs::create_dir_all(&target_dir) {
        relocation.failures.push(CliError::Relocation {
            path: target_dir,
            source,
        });
        return relocation;
    }

    for action in plan(log, program, delete_chk) {
        match action {
            ArtifactAction::Move(path) => {
                let Some(name) = path.file_name() else {
                    continue;
                };
                let target = target_dir.join(name);
                debug!(from = %path.display(), to = %target.display(), "Moving file.");
                match fs::rename(&path, &target) {
                    Ok(()) => relocation.moved.push(path),
                    Err(source) => relocation
                        .failures
                        .push(CliError::Relocation { path, source }),
                }
            }
            ArtifactAction::Delete(path) => {
                debug!(path = %path.display(), "Deleting checkpoint file.");
                match fs::remove_file(&path) {
                    Ok(()) => relocation.deleted.push(path),
                    Err(source) => relocation
                        .failures
                        .push(CliError::Relocation { path, source }),
                }
            }
        }
    }
    relocation
}

/// Sorts every assessed log of a finished batch, completed logs first.
///
/// Every log is attempted even when earlier ones fail.
pub fn relocate_all(report: &BatchReport, program: Program, delete_chk: bool) -> Vec<Relocation> {
    let completed = report.completed().map(|p| (p, Destination::Completed));
    let failed = report.failed().map(|(p, _)| (p, Destination::Failed));

    let relocations: Vec<Relocation> = completed
        .chain(failed)
        .map(|(log, destination)| relocate(log, destination, program, delete_chk))
        .collect();

    for relocation in relocations.iter().filter(|r| !r.is_clean()) {
        for failure in &relocation.failures {
            warn!(log = %relocation.log.display(), "{}", failure);
        }
    }
    info!(
        files = relocations.iter().map(|r| r.moved.len()).sum::<usize>(),
        deleted = relocations.iter().map(|r| r.deleted.len()).sum::<usize>(),
        failures = relocations.iter().map(|r| r.failures.len()).sum::<usize>(),
        "Relocated assessed logs and their artifacts."
    );
    relocations
}
