// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod runner;
mod stdio;

use clap::{Parser, Subcommand};
use embank_config::BankConfig;
use embank_core::SessionController;
use runner::{TestArgs, EXIT_CONFIG_ERROR, EXIT_PASS};
use std::path::PathBuf;
use std::process::ExitCode;
use stdio::StdioTransport;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Embedded Bank console",
    long_about = None,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Path to the bank config (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deterministic, CI-friendly runner mode driven by a session script (YAML).
    Test(TestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the console itself; logs go to stderr.
    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Test(args)) => runner::run_test(args),
        None => run_interactive(cli.config),
    }
}

fn run_interactive(config_path: Option<PathBuf>) -> ExitCode {
    info!("Starting Embedded Bank console");

    let config = match config_path {
        Some(path) => {
            info!("Loading bank config: {:?}", path);
            match BankConfig::from_file(&path) {
                Ok(c) => c,
                Err(e) => {
                    error!("{:#}", e);
                    return ExitCode::from(EXIT_CONFIG_ERROR);
                }
            }
        }
        None => {
            info!("Using default bank configuration");
            BankConfig::default()
        }
    };
    info!(
        "Registry capacity: {}, transaction timeout: {} ms",
        config.registry.max_accounts, config.timeouts.active_ms
    );

    let mut controller = SessionController::new(
        StdioTransport::stdio(),
        config.build_registry(),
        config.timeouts(),
    );
    controller.run();
    info!(
        "Console closed with {} account(s) created",
        controller.registry().total_accounts()
    );
    ExitCode::from(EXIT_PASS)
}
