//! Write batching: every effect of one operation, applied in a single
//! atomic commit.
//!
//! A batch that is dropped without being committed has no effect.

use std::collections::BTreeMap;

use dpos_types::{Address, Amount};

/// Pending state writes (`None` = delete) and absolute balance overrides.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
    balances: BTreeMap<Address, Amount>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.writes.insert(key, Some(value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.writes.insert(key, None);
    }

    pub fn set_balance(&mut self, account: Address, amount: Amount) {
        self.balances.insert(account, amount);
    }

    /// The pending write for `key`: `Some(None)` means a pending delete.
    pub fn pending(&self, key: &[u8]) -> Option<Option<&[u8]>> {
        self.writes.get(key).map(|v| v.as_deref())
    }

    pub fn pending_balance(&self, account: &Address) -> Option<Amount> {
        self.balances.get(account).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.balances.is_empty()
    }

    /// Consume the batch: `(state writes, balance overrides)`.
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<Vec<u8>, Option<Vec<u8>>>,
        BTreeMap<Address, Amount>,
    ) {
        (self.writes, self.balances)
    }
}
