mod artifacts;
mod cli;
mod commands;
mod config;
mod discovery;
mod error;
mod logging;
mod summary;
mod ui;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::ui::UiManager;
use clap::Parser;
use tokio::task;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Sizes the global rayon pool. Sequential runs are pinned to one thread.
fn configure_thread_pool(cli: &Cli) -> Result<()> {
    let parallel = matches!(&cli.command, Commands::Assess(args) if args.parallel);
    let num_threads = match (parallel, cli.threads) {
        (true, threads) => threads,
        (false, Some(threads)) if threads != 1 => {
            warn!("-j {} ignored: assessment is sequential without --parallel.", threads);
            Some(1)
        }
        (false, _) => Some(1),
    };

    if let Some(num_threads) = num_threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }
    Ok(())
}

async fn run_app() -> Result<()> {
    let (ui_manager, ui_sender, shutdown_sender) = UiManager::new();
    let ui_handle = task::spawn(ui_manager.run());

    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    let command_result = async {
        info!("QCLog CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
        debug!("Full CLI arguments parsed: {:?}", &cli);

        configure_thread_pool(&cli)?;

        match cli.command {
            Commands::Assess(args) => {
                info!("Dispatching to 'assess' command.");
                commands::assess::run(args, ui_sender).await
            }
            Commands::Inspect(args) => {
                info!("Dispatching to 'inspect' command.");
                drop(ui_sender);
                commands::inspect::run(args).await
            }
        }
    }
    .await;

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }

    if shutdown_sender.send(true).is_err() {
        warn!("UI manager may have already exited before shutdown signal.");
    }

    ui_handle
        .await
        .map_err(|e| CliError::Other(anyhow::anyhow!("UI manager task failed: {}", e)))?;

    command_result
}
