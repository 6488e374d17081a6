use clap::{Args, Parser, Subcommand};
use qclog::core::patterns::Program;
use qclog::engine::config::IncompleteLogPolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "QCLog Developers",
    version,
    about = "QCLog CLI - Sorts Gaussian and ORCA output logs into completed and failed jobs, with a specific reason for every failure.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used by parallel assessment.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess every log in a directory and move it, with its artifacts, into completed/ or failed/.
    Assess(AssessArgs),
    /// Print the line-by-line analysis and verdict of individual logs without moving anything.
    Inspect(InspectArgs),
}

/// Options shared by every command that classifies logs.
#[derive(Args, Debug, Clone)]
pub struct AssessmentArgs {
    /// Program that wrote the logs.
    #[arg(long, value_name = "PROGRAM")]
    pub program: Option<Program>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tolerance for detecting oscillating optimizations.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Number of trailing optimization steps examined for oscillation.
    #[arg(short, long, value_name = "INT")]
    pub window: Option<usize>,

    /// Disable oscillation detection to speed up assessment.
    #[arg(long)]
    pub no_oscillation_criteria: bool,

    /// Whether a log lacking a final termination marker fails ('failure') or is only noted ('advisory').
    #[arg(long, value_name = "POLICY")]
    pub incomplete_log: Option<IncompleteLogPolicy>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S oscillation.window=12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `assess` subcommand.
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Directory containing the logs, or a single log file. Defaults to the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub assessment: AssessmentArgs,

    /// Assess files in parallel.
    #[arg(short, long, conflicts_with = "line_by_line")]
    pub parallel: bool,

    /// Print a line-by-line marker analysis of every file. Not available with --parallel.
    #[arg(long)]
    pub line_by_line: bool,

    /// Report verdicts without moving or deleting any file.
    #[arg(long)]
    pub dry: bool,

    /// Delete .chk files instead of moving them (Gaussian only). This is permanent.
    #[arg(long)]
    pub delete_chk: bool,

    /// Write a CSV report (file,status,reasons) to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Log files to inspect.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub assessment: AssessmentArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assess_parses_overrides() {
        let cli = Cli::try_parse_from([
            "qclog",
            "assess",
            "-i",
            "runs",
            "--program",
            "orca",
            "-t",
            "1e-4",
            "-w",
            "12",
            "--incomplete-log",
            "failure",
            "-S",
            "oscillation.enabled=false",
            "--dry",
        ])
        .unwrap();
        let Commands::Assess(args) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(args.input, Some(PathBuf::from("runs")));
        assert_eq!(args.assessment.program, Some(Program::Orca));
        assert_eq!(args.assessment.tolerance, Some(1e-4));
        assert_eq!(args.assessment.window, Some(12));
        assert_eq!(
            args.assessment.incomplete_log,
            Some(IncompleteLogPolicy::Failure)
        );
        assert_eq!(args.assessment.set_values, vec!["oscillation.enabled=false"]);
        assert!(args.dry);
    }

    #[test]
    fn parallel_conflicts_with_line_by_line() {
        let result = Cli::try_parse_from(["qclog", "assess", "-p", "--line-by-line"]);
        assert!(result.is_err());
    }

    #[test]
    fn inspect_requires_files() {
        assert!(Cli::try_parse_from(["qclog", "inspect"]).is_err());
        let cli = Cli::try_parse_from(["qclog", "-v", "inspect", "a.log", "b.log"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn unknown_program_is_rejected() {
        assert!(Cli::try_parse_from(["qclog", "assess", "--program", "nwchem"]).is_err());
    }
}
