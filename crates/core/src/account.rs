// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{BankError, BankResult, NAME_SIZE, PASSWORD_SIZE};

pub type AccountId = u16;
pub type Name = [u8; NAME_SIZE];
pub type Password = [u8; PASSWORD_SIZE];

/// Copies `bytes` into a fixed-width field.
/// Excess bytes are truncated, a shortfall is zero-padded.
pub fn pad_field<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut field = [0u8; N];
    let len = bytes.len().min(N);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

/// A named, password-protected balance record.
///
/// Name and password are compared as whole fixed-width fields, so
/// trailing zero padding is significant.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    name: Name,
    password: Password,
    balance: f64,
}

impl Account {
    pub fn new(id: AccountId, name: &[u8], password: &[u8]) -> Self {
        Self {
            id,
            name: pad_field(name),
            password: pad_field(password),
            balance: 0.0,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn verify_name(&self, candidate: &Name) -> bool {
        self.name == *candidate
    }

    pub fn verify_password(&self, candidate: &Password) -> bool {
        self.password == *candidate
    }

    pub fn set_password(&mut self, password: &Password) {
        self.password = *password;
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Credits `amount`. Negative and non-finite amounts are refused
    /// and leave the balance untouched.
    pub fn deposit(&mut self, amount: f64) -> BankResult<()> {
        check_amount(amount)?;
        self.balance += amount;
        Ok(())
    }

    /// Debits `amount` if the balance covers it.
    pub fn withdraw(&mut self, amount: f64) -> BankResult<()> {
        check_amount(amount)?;
        if self.balance < amount {
            return Err(BankError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

fn check_amount(amount: f64) -> BankResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BankError::InvalidAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(0, b"alice", b"secret1")
    }

    #[test]
    fn test_pad_field_truncates_and_pads() {
        let short: [u8; 4] = pad_field(b"ab");
        assert_eq!(short, [b'a', b'b', 0, 0]);

        let long: [u8; 4] = pad_field(b"abcdef");
        assert_eq!(&long, b"abcd");
    }

    #[test]
    fn test_deposit_then_withdraw() {
        let mut acc = account();
        acc.deposit(100.0).unwrap();
        acc.withdraw(40.0).unwrap();
        assert_eq!(acc.balance(), 60.0);

        let err = acc.withdraw(1000.0).unwrap_err();
        assert!(matches!(
            err,
            BankError::InsufficientFunds { requested, .. } if requested == 1000.0
        ));
        assert_eq!(acc.balance(), 60.0);
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let mut acc = account();
        acc.deposit(25.5).unwrap();
        acc.withdraw(25.5).unwrap();
        assert_eq!(acc.balance(), 0.0);
        assert!(acc.withdraw(0.1).is_err());
    }

    #[test]
    fn test_invalid_amounts_rejected() {
        let mut acc = account();
        acc.deposit(10.0).unwrap();

        for amount in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(acc.deposit(amount), Err(BankError::InvalidAmount(_))));
            assert!(matches!(acc.withdraw(amount), Err(BankError::InvalidAmount(_))));
        }
        assert_eq!(acc.balance(), 10.0);
    }

    #[test]
    fn test_verify_password_is_exact() {
        let acc = account();
        assert!(acc.verify_password(&pad_field(b"secret1")));
        assert!(!acc.verify_password(&pad_field(b"secret2")));
        assert!(!acc.verify_password(&pad_field(b"secret")));

        // Same visible text, different trailing padding byte.
        let mut padded: Password = pad_field(b"secret1");
        padded[PASSWORD_SIZE - 1] = b' ';
        assert!(!acc.verify_password(&padded));
    }

    #[test]
    fn test_set_password() {
        let mut acc = account();
        acc.set_password(&pad_field(b"hunter2"));
        assert!(!acc.verify_password(&pad_field(b"secret1")));
        assert!(acc.verify_password(&pad_field(b"hunter2")));
    }

    #[test]
    fn test_balance_is_stable() {
        let mut acc = account();
        acc.deposit(12.25).unwrap();
        assert_eq!(acc.balance(), acc.balance());
    }
}
