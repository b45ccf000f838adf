//! Abstract state storage for the governance core.
//!
//! The host ledger provides durable keyed storage and native balances through
//! [`StateStore`]. Components never write to it directly: every operation runs
//! inside a [`Txn`] that buffers writes, balance changes and events into a
//! [`WriteBatch`], which the caller commits only if the operation succeeded.

pub mod batch;
pub mod error;
pub mod txn;

pub use batch::WriteBatch;
pub use error::StoreError;
pub use txn::Txn;

use dpos_types::{Address, Amount};

/// Durable keyed state plus the native balance ledger of the host.
pub trait StateStore {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Native balance held by `account`.
    fn balance(&self, account: &Address) -> Result<Amount, StoreError>;

    /// Apply a batch atomically: either every write lands or none does.
    fn commit(&mut self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Build a namespaced record key: `namespace/id`.
pub fn record_key(namespace: &str, id: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(namespace.len() + 1 + id.len());
    key.extend_from_slice(namespace.as_bytes());
    key.push(b'/');
    key.extend_from_slice(id);
    key
}
