// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::account::{AccountId, Name, Password};
use crate::menu::AccountMenu;
use crate::registry::Registry;
use crate::transport::{Transport, TransportError};
use crate::{
    field_to_string, BankError, BankResult, Timeouts, NAME_SIZE, OPTION_SIZE, PASSWORD_SIZE,
};
use tracing::{debug, info, warn};

const BANNER: &str = "\r\n*****************************************************\r\n\
------------- Welcome to Embedded Bank! -------------\r\n\
*****************************************************";
const MAIN_PROMPT: &str = "\r\nNew account (N) or Existing account (E). \r\nPlease enter: ";
const NAME_PROMPT: &str = "\r\nEnter account name: ";
const PASSWORD_PROMPT: &str = "\r\nEnter password: ";
const CONFIRM_PROMPT: &str = "\r\nConfirm password: ";
const ABORTED: &str = "\r\nOperation aborted! Please try again!";

/// Result of a single [`SessionController::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    /// The input stream ended at the top-level menu. Only host transports
    /// ever report this.
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingMenuChoice,
    CreatingAccount,
    AuthenticatingExisting,
    AccountSession(AccountId),
}

/// Top-level console loop: account creation and login, then the
/// per-account menu.
pub struct SessionController<T: Transport> {
    transport: T,
    registry: Registry,
    timeouts: Timeouts,
    state: SessionState,
}

impl<T: Transport> SessionController<T> {
    pub fn new(transport: T, registry: Registry, timeouts: Timeouts) -> Self {
        Self {
            transport,
            registry,
            timeouts,
            state: SessionState::AwaitingMenuChoice,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_parts(self) -> (T, Registry) {
        (self.transport, self.registry)
    }

    /// Drives the console until the input stream closes.
    pub fn run(&mut self) {
        while self.step() == StepOutcome::Advanced {}
        info!("Console input closed, stopping session controller");
    }

    /// Performs one state transition.
    ///
    /// Transport failures are reported on the console and never escape;
    /// the only way out is a closed input stream at the top-level menu.
    pub fn step(&mut self) -> StepOutcome {
        let next = match self.state {
            SessionState::AwaitingMenuChoice => match self.await_menu_choice() {
                Some(next) => next,
                None => return StepOutcome::InputClosed,
            },
            SessionState::CreatingAccount => match self.create_account() {
                Ok(id) => SessionState::AccountSession(id),
                Err(e) => {
                    self.report(&e);
                    SessionState::AwaitingMenuChoice
                }
            },
            SessionState::AuthenticatingExisting => match self.authenticate() {
                Ok(id) => SessionState::AccountSession(id),
                Err(e) => {
                    self.report(&e);
                    SessionState::AwaitingMenuChoice
                }
            },
            SessionState::AccountSession(id) => {
                self.manage_account(id);
                SessionState::AwaitingMenuChoice
            }
        };

        if next != self.state {
            debug!("Session state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        StepOutcome::Advanced
    }

    /// Returns `None` once the input stream has closed.
    fn await_menu_choice(&mut self) -> Option<SessionState> {
        self.transport.send(BANNER);
        let mut option = [0u8; OPTION_SIZE];
        match self
            .transport
            .prompt(MAIN_PROMPT, &mut option, self.timeouts.inactive)
        {
            Ok(_) => {}
            Err(TransportError::Closed) => return None,
            Err(e) => {
                warn!("Menu read failed: {}", e);
                return Some(SessionState::AwaitingMenuChoice);
            }
        }

        Some(match option[0] {
            b'N' => SessionState::CreatingAccount,
            b'E' => SessionState::AuthenticatingExisting,
            0 => SessionState::AwaitingMenuChoice,
            other => {
                self.report(&BankError::InvalidOption(other));
                SessionState::AwaitingMenuChoice
            }
        })
    }

    fn create_account(&mut self) -> BankResult<AccountId> {
        if self.registry.is_full() {
            return Err(BankError::CapacityExceeded {
                capacity: self.registry.capacity(),
            });
        }

        let mut name: Name = [0; NAME_SIZE];
        loop {
            self.transport
                .prompt(NAME_PROMPT, &mut name, Some(self.timeouts.active))?;
            if !self.registry.is_name_taken(&name) {
                break;
            }
            self.report(&BankError::DuplicateName {
                name: field_to_string(&name),
            });
        }

        let mut password: Password = [0; PASSWORD_SIZE];
        let mut confirm: Password = [0; PASSWORD_SIZE];
        loop {
            self.transport
                .prompt(PASSWORD_PROMPT, &mut password, Some(self.timeouts.active))?;
            self.transport
                .prompt(CONFIRM_PROMPT, &mut confirm, Some(self.timeouts.active))?;
            if password == confirm {
                break;
            }
            self.report(&BankError::PasswordMismatch);
        }

        let id = self.registry.create(&name, &password)?;
        self.transport.send(&format!(
            "\r\nNew account '{}' created.",
            field_to_string(&name)
        ));
        Ok(id)
    }

    fn authenticate(&mut self) -> BankResult<AccountId> {
        let mut name: Name = [0; NAME_SIZE];
        self.transport
            .prompt(NAME_PROMPT, &mut name, Some(self.timeouts.active))?;
        let mut password: Password = [0; PASSWORD_SIZE];
        self.transport
            .prompt(PASSWORD_PROMPT, &mut password, Some(self.timeouts.active))?;

        self.registry
            .find(&name, &password)
            .map(|account| account.id())
            .ok_or(BankError::AuthenticationFailed)
    }

    fn manage_account(&mut self, id: AccountId) {
        let Some(account) = self.registry.get_mut(id) else {
            warn!("Account {} vanished before its session started", id);
            return;
        };
        let res = AccountMenu::new(&mut self.transport, account, self.timeouts).run();
        if let Err(e) = res {
            self.report(&BankError::Transport(e));
        }
    }

    fn report(&mut self, err: &BankError) {
        match err {
            BankError::Transport(e) => {
                warn!("Operation aborted: {}", e);
                self.transport.send(ABORTED);
            }
            other => {
                debug!("Reporting {:?}", other);
                self.transport.send(&format!("\r\n{}", other));
            }
        }
    }
}
