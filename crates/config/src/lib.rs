// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use embank_core::transport::InputEvent;
use embank_core::{Registry, Timeouts, MAX_ACCOUNTS, MAX_ACCOUNTS_LIMIT, TRANSACTION_WAIT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported schema_version '{0}'. Supported versions: '1.0'")]
    UnsupportedSchema(String),
    #[error("registry.max_accounts must be between 1 and {max}, got {got}")]
    Capacity { got: usize, max: usize },
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("Limit 'max_steps' must be greater than zero")]
    ZeroMaxSteps,
    #[error("Script input line {index} contains a carriage return")]
    EmbeddedCarriageReturn { index: usize },
}

fn check_schema(version: &str) -> Result<(), ValidationError> {
    if version != SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedSchema(version.to_string()));
    }
    Ok(())
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

fn default_max_accounts() -> usize {
    MAX_ACCOUNTS
}

fn default_active_ms() -> u64 {
    TRANSACTION_WAIT.as_millis() as u64
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default = "default_max_accounts")]
    pub max_accounts: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_accounts: default_max_accounts(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    #[serde(default = "default_active_ms")]
    pub active_ms: u64,
    /// `None` waits forever at the top-level menu.
    #[serde(default)]
    pub inactive_ms: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            active_ms: default_active_ms(),
            inactive_ms: None,
        }
    }
}

/// Runtime settings for the console and the account registry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BankConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            registry: RegistryConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl BankConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open bank config at {:?}", path.as_ref()))?;
        let config: Self =
            serde_yaml::from_reader(f).context("Failed to parse Bank Config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_schema(&self.schema_version)?;

        let max_accounts = self.registry.max_accounts;
        if max_accounts == 0 || max_accounts > MAX_ACCOUNTS_LIMIT {
            return Err(ValidationError::Capacity {
                got: max_accounts,
                max: MAX_ACCOUNTS_LIMIT,
            });
        }

        if self.timeouts.active_ms == 0 {
            return Err(ValidationError::ZeroTimeout("active_ms"));
        }
        if self.timeouts.inactive_ms == Some(0) {
            return Err(ValidationError::ZeroTimeout("inactive_ms"));
        }

        Ok(())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            active: Duration::from_millis(self.timeouts.active_ms),
            inactive: self.timeouts.inactive_ms.map(Duration::from_millis),
        }
    }

    pub fn build_registry(&self) -> Registry {
        Registry::new(self.registry.max_accounts)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ControlEvent {
    Timeout,
    Fail,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ControlInput {
    pub event: ControlEvent,
}

/// One scripted console read: typed text, or a control event.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ScriptInput {
    Line(String),
    Control(ControlInput),
}

impl ScriptInput {
    pub fn to_event(&self) -> InputEvent {
        match self {
            ScriptInput::Line(text) => InputEvent::Line(text.as_bytes().to_vec()),
            ScriptInput::Control(ControlInput {
                event: ControlEvent::Timeout,
            }) => InputEvent::Timeout,
            ScriptInput::Control(ControlInput {
                event: ControlEvent::Fail,
            }) => InputEvent::Fault,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScriptInputs {
    /// Bank config path, relative to the script.
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default)]
    pub lines: Vec<ScriptInput>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScriptLimits {
    /// Session controller state transitions.
    pub max_steps: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    InputExhausted,
    MaxSteps,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct UartContainsAssertion {
    pub uart_contains: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct UartNotContainsAssertion {
    pub uart_not_contains: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TotalAccountsAssertion {
    pub total_accounts: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct StopReasonAssertion {
    pub expected_stop_reason: StopReason,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum ScriptAssertion {
    UartContains(UartContainsAssertion),
    UartNotContains(UartNotContainsAssertion),
    TotalAccounts(TotalAccountsAssertion),
    ExpectedStopReason(StopReasonAssertion),
}

/// Scripted console session with transcript assertions.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    pub schema_version: String,
    pub inputs: ScriptInputs,
    pub limits: ScriptLimits,
    #[serde(default)]
    pub assertions: Vec<ScriptAssertion>,
}

impl SessionScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open session script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse Session Script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_schema(&self.schema_version)?;

        if self.limits.max_steps == 0 {
            return Err(ValidationError::ZeroMaxSteps);
        }

        // A carriage return would split one scripted read into a
        // truncated line.
        for (index, input) in self.inputs.lines.iter().enumerate() {
            if let ScriptInput::Line(text) = input {
                if text.contains('\r') {
                    return Err(ValidationError::EmbeddedCarriageReturn { index });
                }
            }
        }

        Ok(())
    }

    pub fn input_events(&self) -> Vec<InputEvent> {
        self.inputs.lines.iter().map(ScriptInput::to_event).collect()
    }
}
