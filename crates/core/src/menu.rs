// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::account::Account;
use crate::amount::parse_amount;
use crate::transport::{Transport, TransportError};
use crate::{BankError, Timeouts, AMOUNT_SIZE, OPTION_SIZE};
use tracing::debug;

const MENU_PROMPT: &str =
    "\r\nBalance (B), Deposit (D), Withdraw (W) or Quit (Q). \r\nPlease enter: ";
const DEPOSIT_PROMPT: &str = "\r\nEnter deposit amount: ";
const WITHDRAW_PROMPT: &str = "\r\nEnter withdrawal amount: ";

/// Per-account console loop. Holds the account for the whole session.
pub struct AccountMenu<'a, T: Transport> {
    transport: &'a mut T,
    account: &'a mut Account,
    timeouts: Timeouts,
}

impl<'a, T: Transport> AccountMenu<'a, T> {
    pub fn new(transport: &'a mut T, account: &'a mut Account, timeouts: Timeouts) -> Self {
        Self {
            transport,
            account,
            timeouts,
        }
    }

    /// Runs until the user quits. A failed read aborts the session.
    pub fn run(mut self) -> Result<(), TransportError> {
        debug!("Entering account menu for account {}", self.account.id());
        let mut option = [0u8; OPTION_SIZE];
        loop {
            self.transport
                .prompt(MENU_PROMPT, &mut option, Some(self.timeouts.active))?;

            match option[0] {
                b'B' => {
                    let balance = self.account.balance();
                    self.send(&format!("Balance: {:.1}", balance));
                }
                b'D' => self.deposit()?,
                b'W' => self.withdraw()?,
                b'Q' => break,
                // Nothing typed before the prompt expired.
                0 => continue,
                other => self.report(&BankError::InvalidOption(other)),
            }
        }
        debug!("Leaving account menu for account {}", self.account.id());
        Ok(())
    }

    fn deposit(&mut self) -> Result<(), TransportError> {
        let amount = self.read_amount(DEPOSIT_PROMPT)?;
        match self.account.deposit(amount) {
            Ok(()) => self.send(&format!("Deposit of {:.1} successful.", amount)),
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    fn withdraw(&mut self) -> Result<(), TransportError> {
        let amount = self.read_amount(WITHDRAW_PROMPT)?;
        match self.account.withdraw(amount) {
            Ok(()) => self.send(&format!("Withdrawal of {:.1} successful.", amount)),
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    fn read_amount(&mut self, prompt: &str) -> Result<f64, TransportError> {
        let mut buf = [0u8; AMOUNT_SIZE];
        self.transport
            .prompt(prompt, &mut buf, Some(self.timeouts.active))?;
        Ok(parse_amount(&buf))
    }

    fn report(&mut self, err: &BankError) {
        debug!("Account {}: {:?}", self.account.id(), err);
        self.send(&err.to_string());
    }

    fn send(&mut self, msg: &str) {
        self.transport.send(&format!("\r\n{}", msg));
    }
}
