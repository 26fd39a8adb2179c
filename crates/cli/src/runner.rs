// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use clap::Parser;
use embank_config::{BankConfig, ScriptAssertion, SessionScript, StopReason};
use embank_core::transport::ScriptedTransport;
use embank_core::{SessionController, StepOutcome};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

pub const EXIT_PASS: u8 = 0;
pub const EXIT_ASSERT_FAIL: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;

const RESULT_SCHEMA_VERSION: &str = "1.0";

// Guard against accidentally huge runs from CI misconfiguration.
const MAX_ALLOWED_STEPS: u64 = 1_000_000;

#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Path to the session script (YAML)
    #[arg(short = 's', long)]
    pub script: PathBuf,

    /// Path to the bank config (YAML); overrides the script's inputs.config
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Override max steps (takes precedence over script)
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Disable transcript echo on stdout (still captured for assertions/artifacts)
    #[arg(long)]
    pub no_uart_stdout: bool,

    /// Directory for result.json and uart.log
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct AssertionResult {
    assertion: ScriptAssertion,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct TestConfig {
    script: PathBuf,
    bank_config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TestResult {
    result_schema_version: String,
    status: String,
    stop_reason: StopReason,
    steps_executed: u64,
    total_accounts: usize,
    assertions: Vec<AssertionResult>,
    script_hash: String,
    config: TestConfig,
}

fn resolve_script_path(script_path: &Path, value: &str) -> PathBuf {
    let candidate = PathBuf::from(value);
    if candidate.is_absolute() {
        return candidate;
    }
    script_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(candidate)
}

pub fn run_test(args: TestArgs) -> ExitCode {
    let script = match SessionScript::from_file(&args.script) {
        Ok(s) => s,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let max_steps = args.max_steps.unwrap_or(script.limits.max_steps);
    if max_steps > MAX_ALLOWED_STEPS {
        error!(
            "max_steps {} exceeds MAX_ALLOWED_STEPS {}",
            max_steps, MAX_ALLOWED_STEPS
        );
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    let config_path = args.config.clone().or_else(|| {
        script
            .inputs
            .config
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| resolve_script_path(&args.script, s))
    });
    let config = match &config_path {
        Some(path) => match BankConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                error!("{:#}", e);
                return ExitCode::from(EXIT_CONFIG_ERROR);
            }
        },
        None => BankConfig::default(),
    };

    let script_bytes = match std::fs::read(&args.script) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read script {:?}: {}", args.script, e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let mut transport = ScriptedTransport::new();
    for event in script.input_events() {
        transport.push_event(event);
    }
    let mut controller =
        SessionController::new(transport, config.build_registry(), config.timeouts());

    info!(
        "Running session script {:?} ({} inputs, max {} steps)",
        args.script,
        script.inputs.lines.len(),
        max_steps
    );

    let mut stop_reason = StopReason::MaxSteps;
    let mut steps_executed: u64 = 0;
    for _ in 0..max_steps {
        match controller.step() {
            StepOutcome::Advanced => steps_executed += 1,
            StepOutcome::InputClosed => {
                stop_reason = StopReason::InputExhausted;
                break;
            }
        }
    }

    let transcript = controller.transport().output().to_string();
    let total_accounts = controller.registry().total_accounts();
    if !args.no_uart_stdout {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(transcript.as_bytes());
        let _ = stdout.write_all(b"\n");
        let _ = stdout.flush();
    }

    let mut all_passed = true;
    let mut assertion_results = Vec::new();
    for assertion in &script.assertions {
        let passed = match assertion {
            ScriptAssertion::UartContains(a) => transcript.contains(&a.uart_contains),
            ScriptAssertion::UartNotContains(a) => !transcript.contains(&a.uart_not_contains),
            ScriptAssertion::TotalAccounts(a) => a.total_accounts == total_accounts,
            ScriptAssertion::ExpectedStopReason(a) => a.expected_stop_reason == stop_reason,
        };
        if !passed {
            all_passed = false;
            error!(
                "Assertion failed: {:?} (transcript len={}, accounts={})",
                assertion,
                transcript.len(),
                total_accounts
            );
        }
        assertion_results.push(AssertionResult {
            assertion: assertion.clone(),
            passed,
        });
    }

    let status = if all_passed { "pass" } else { "fail" };
    info!(
        "Session script finished: {} ({:?}, {} steps)",
        status, stop_reason, steps_executed
    );

    if let Some(output_dir) = &args.output_dir {
        let mut hasher = Sha256::new();
        hasher.update(&script_bytes);
        let result = TestResult {
            result_schema_version: RESULT_SCHEMA_VERSION.to_string(),
            status: status.to_string(),
            stop_reason,
            steps_executed,
            total_accounts,
            assertions: assertion_results,
            script_hash: format!("{:x}", hasher.finalize()),
            config: TestConfig {
                script: args.script.clone(),
                bank_config: config_path,
            },
        };
        write_outputs(output_dir, &result, &transcript);
    }

    if all_passed {
        ExitCode::from(EXIT_PASS)
    } else {
        ExitCode::from(EXIT_ASSERT_FAIL)
    }
}

fn write_outputs(output_dir: &Path, result: &TestResult, transcript: &str) {
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        error!("Failed to create output directory {:?}: {}", output_dir, e);
        return;
    }

    let result_path = output_dir.join("result.json");
    match std::fs::File::create(&result_path) {
        Ok(f) => {
            if let Err(e) = serde_json::to_writer_pretty(f, result) {
                error!("Failed to write result.json: {}", e);
            }
        }
        Err(e) => error!("Failed to create result.json: {}", e),
    }

    let uart_path = output_dir.join("uart.log");
    if let Err(e) = std::fs::write(&uart_path, transcript) {
        error!("Failed to write uart.log: {}", e);
    }
}
