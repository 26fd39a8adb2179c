// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod account;
pub mod amount;
pub mod menu;
pub mod registry;
pub mod session;
pub mod transport;

use std::time::Duration;

pub use account::{pad_field, Account, AccountId, Name, Password};
pub use registry::Registry;
pub use session::{SessionController, SessionState, StepOutcome};
pub use transport::{ScriptedTransport, Transport, TransportError};


/// Default registry capacity.
pub const MAX_ACCOUNTS: usize = 10;
/// Largest capacity a registry may be configured with (ids are `u16`).
pub const MAX_ACCOUNTS_LIMIT: usize = u16::MAX as usize;

/// Fixed width of the account name field, in bytes.
pub const NAME_SIZE: usize = 16;
/// Fixed width of the password field, in bytes.
pub const PASSWORD_SIZE: usize = 16;
/// Menu choice buffer: one character plus the terminator slot.
pub const OPTION_SIZE: usize = 2;
/// Amount prompt buffer.
pub const AMOUNT_SIZE: usize = 16;

/// Per-prompt wait while a transaction is in progress.
pub const TRANSACTION_WAIT: Duration = Duration::from_secs(30);
/// Wait at the top-level menu. `None` blocks until input arrives.
pub const ENTRY_WAIT: Option<Duration> = None;

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("The bank capacity is full. Your account cannot be created.")]
    CapacityExceeded { capacity: usize },
    #[error("Account name '{name}' is not available!")]
    DuplicateName { name: String },
    #[error("Password and confirm password do not match.")]
    PasswordMismatch,
    #[error("Invalid account name or password.")]
    AuthenticationFailed,
    #[error("Insufficient balance for withdrawal.")]
    InsufficientFunds { balance: f64, requested: f64 },
    #[error("Invalid amount.")]
    InvalidAmount(f64),
    #[error("Invalid option.")]
    InvalidOption(u8),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type BankResult<T> = Result<T, BankError>;

/// Prompt timeouts used by the console loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Applied to every prompt inside a transaction.
    pub active: Duration,
    /// Applied to the top-level menu prompt.
    pub inactive: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            active: TRANSACTION_WAIT,
            inactive: ENTRY_WAIT,
        }
    }
}

/// Renders a fixed-width, zero-padded field for display.
/// Stops at the first NUL; invalid UTF-8 is replaced.
pub fn field_to_string(field: &[u8]) -> String {
    let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..len]).into_owned()
}
