use crate::artifacts;
use crate::cli::AssessArgs;
use crate::config::build_config;
use crate::discovery;
use crate::error::{CliError, Result};
use crate::summary;
use crate::ui::{CliProgressHandler, UiEvent};
use qclog::{
    core::patterns::Program,
    engine::{config::BatchConfigBuilder, progress::ProgressReporter},
    workflows,
};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};

const LARGE_BATCH: usize = 200;

async fn notify(ui_sender: &mpsc::Sender<UiEvent>, message: String) {
    if ui_sender.send(UiEvent::Log(message)).await.is_err() {
        warn!("UI channel closed; dropping notice.");
    }
}

pub async fn run(args: AssessArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let started = Instant::now();

    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args.assessment, args.delete_chk)?;
    let program = app_config.assessment.program;
    let batch_config = BatchConfigBuilder::new()
        .parallel(args.parallel)
        .diagnostics(args.line_by_line)
        .build()?;

    if app_config.delete_chk && program == Program::Orca {
        warn!("--delete-chk has no effect on ORCA logs.");
    }

    let input = match &args.input {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    info!("Discovering {} logs under {:?}", program, &input);
    let jobs = discovery::build_jobs(discovery::find_logs(&input, program)?);

    notify(&ui_sender, format!("Analyzing {} files...", jobs.len())).await;
    if jobs.len() >= LARGE_BATCH {
        notify(&ui_sender, "This may take a minute.".to_string()).await;
    }

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the batch assessment workflow...");
    let report = tokio::task::block_in_place(|| {
        workflows::batch::run(&jobs, &app_config.assessment, &batch_config, &reporter)
    });

    if let Some(report_path) = &args.report {
        report.write_csv(report_path)?;
        println!("Report written to: {}", report_path.display());
    }

    print!("{}", summary::render_overview(&report));

    let mut unrelocated = 0;
    if args.dry {
        println!("Dry run: no files were moved.");
    } else {
        let relocations = tokio::task::block_in_place(|| {
            artifacts::relocate_all(&report, program, app_config.delete_chk)
        });
        print!("{}", summary::render_relocations(&relocations));
        unrelocated = relocations.iter().map(|r| r.failures.len()).sum();
    }

    println!(
        "Total analysis time (s): {:.2}",
        started.elapsed().as_secs_f64()
    );
    if unrelocated > 0 {
        return Err(CliError::IncompleteRelocation {
            failed: unrelocated,
        });
    }
    Ok(())
}
