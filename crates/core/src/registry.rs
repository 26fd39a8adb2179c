// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::account::{Account, AccountId, Name, Password};
use crate::{field_to_string, BankError, BankResult, MAX_ACCOUNTS, MAX_ACCOUNTS_LIMIT};
use tracing::{debug, info};

/// Fixed-capacity store of accounts, indexed by creation order.
///
/// Accounts are only ever appended, so `accounts[i].id() == i` holds for
/// every stored account and the occupied count doubles as the next id.
#[derive(Debug)]
pub struct Registry {
    accounts: Vec<Account>,
    capacity: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(MAX_ACCOUNTS)
    }
}

impl Registry {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_ACCOUNTS_LIMIT);
        Self {
            accounts: Vec::with_capacity(capacity.min(MAX_ACCOUNTS)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of accounts ever created; also the next id to be assigned.
    pub fn total_accounts(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_full(&self) -> bool {
        self.accounts.len() >= self.capacity
    }

    /// True if `name` cannot be used for a new account.
    ///
    /// The all-zero name is permanently reserved: it is the value of an
    /// unfilled slot.
    pub fn is_name_taken(&self, name: &Name) -> bool {
        name.iter().all(|&b| b == 0) || self.accounts.iter().any(|a| a.verify_name(name))
    }

    pub fn create(&mut self, name: &Name, password: &Password) -> BankResult<AccountId> {
        if self.is_full() {
            return Err(BankError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if self.is_name_taken(name) {
            return Err(BankError::DuplicateName {
                name: field_to_string(name),
            });
        }

        let id = self.accounts.len() as AccountId;
        self.accounts.push(Account::new(id, name, password));
        info!("Account {} created ({}/{})", id, self.accounts.len(), self.capacity);
        Ok(id)
    }

    /// Linear scan for the first account matching both credentials.
    pub fn find(&mut self, name: &Name, password: &Password) -> Option<&mut Account> {
        let found = self
            .accounts
            .iter_mut()
            .find(|a| a.verify_name(name) && a.verify_password(password));
        if found.is_none() {
            debug!("No account matches the supplied credentials");
        }
        found
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id as usize)
    }

    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id as usize)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}
