//! Nullable store: in-memory keyed state and balances for testing.

use dpos_store::{StateStore, StoreError, WriteBatch};
use dpos_types::{Address, Amount};
use std::collections::BTreeMap;

/// An in-memory [`StateStore`].
///
/// Balances can be seeded directly with [`NullStore::fund`] to stand in for
/// value the host ledger attaches to calls.
#[derive(Debug, Default)]
pub struct NullStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    balances: BTreeMap<Address, Amount>,
    commits: u64,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with native value.
    pub fn with_balance(mut self, account: Address, amount: Amount) -> Self {
        self.fund(&account, amount);
        self
    }

    /// Add native value to an account outside of any operation.
    pub fn fund(&mut self, account: &Address, amount: Amount) {
        let entry = self.balances.entry(*account).or_default();
        *entry = entry.checked_add(amount).unwrap_or(Amount::new(u128::MAX));
    }

    /// Sum of every balance. Value only moves between accounts, so this
    /// changes only through [`NullStore::fund`].
    pub fn total_balance(&self) -> u128 {
        self.balances.values().map(|a| a.raw()).sum()
    }

    /// Number of batches committed so far.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    pub fn record_count(&self) -> usize {
        self.data.len()
    }
}

impl StateStore for NullStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn balance(&self, account: &Address) -> Result<Amount, StoreError> {
        Ok(self.balances.get(account).copied().unwrap_or_default())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        let (writes, balances) = batch.into_parts();
        for (key, value) in writes {
            match value {
                Some(value) => {
                    self.data.insert(key, value);
                }
                None => {
                    self.data.remove(&key);
                }
            }
        }
        for (account, amount) in balances {
            if amount.is_zero() {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, amount);
            }
        }
        self.commits += 1;
        Ok(())
    }
}
