//! bump - dependency updater CLI tool
//!
//! Scans the git repositories under a base directory (or one target
//! repository), bumps npm, PyPI and RubyGems dependencies, regenerates
//! lockfiles, and commits and pushes the result.

use bump::cli::CliArgs;
use bump::config::RunConfig;
use bump::orchestrator::Orchestrator;
use bump::output::create_formatter;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the verbosity flags
fn init_tracing(args: &CliArgs) {
    let default_level = if args.verbose {
        "bump=debug"
    } else if args.quiet {
        "bump=warn"
    } else {
        "bump=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = RunConfig::from_cli(&args);
    tracing::debug!(
        base_dir = %config.base_dir.display(),
        target = ?config.target,
        dry_run = config.dry_run,
        unsafe_mode = config.unsafe_mode,
        "starting bump v{}",
        env!("CARGO_PKG_VERSION")
    );

    let orchestrator = Orchestrator::new(config)?;
    let result = orchestrator.run().await?;

    let formatter = create_formatter(&orchestrator.config().output);
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // Per-item errors are already in the report; the run itself succeeded
    Ok(ExitCode::SUCCESS)
}
