mod cli;
mod commands;
mod interactive;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::SyncOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // First Ctrl+C lets issued saves finish; the second one exits at once
    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            eprintln!("\n\nInterrupted by user (Ctrl+C)");
            std::process::exit(130); // Standard exit code for SIGINT
        }
        eprintln!("\n\nInterrupted, finishing saves already in flight (Ctrl+C again to exit now)");
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = SyncOptions::new(
        cli.dry_run,
        cli.yes_all,
        cli.config.as_deref(),
        cli.no_config,
        &cli.connection,
        Arc::clone(&interrupted),
    );

    let result = run(&cli, &options).await;
    if interrupted.load(Ordering::SeqCst) {
        if let Err(e) = &result {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(130);
    }
    result
}

async fn run(cli: &Cli, options: &SyncOptions<'_>) -> anyhow::Result<()> {
    match &cli.command {
        Commands::CopyFields {
            fields,
            source,
            targets,
            publish,
            force,
        } => {
            commands::CopyFields::execute(fields, source, targets, *publish, *force, options)
                .await
                .context("Failed to execute copy-fields command")?;
        }
        Commands::DeleteFields {
            fields,
            targets,
            force,
        } => {
            commands::DeleteFields::execute(fields, targets, *force, options)
                .await
                .context("Failed to execute delete-fields command")?;
        }
    }

    Ok(())
}

/// Log to stderr so the summary on stdout stays clean
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "ctsync=debug" } else { "ctsync=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
