//! The execution context of a single operation.

use serde::de::DeserializeOwned;
use serde::Serialize;

use dpos_types::{Address, Amount, Event, Timestamp};

use crate::batch::WriteBatch;
use crate::error::StoreError;
use crate::StateStore;

/// Read-through overlay over a [`StateStore`].
///
/// Reads see the operation's own pending writes first, then the committed
/// state. Native value moves only inside the batch, so a failed operation
/// leaves every balance untouched.
pub struct Txn<'a> {
    base: &'a dyn StateStore,
    batch: WriteBatch,
    events: Vec<Event>,
    now: Timestamp,
}

impl<'a> Txn<'a> {
    pub fn new(base: &'a dyn StateStore, now: Timestamp) -> Self {
        Self {
            base,
            batch: WriteBatch::new(),
            events: Vec::new(),
            now,
        }
    }

    /// Ledger time of the operation.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.batch.pending(key) {
            Some(pending) => Ok(pending.map(<[u8]>::to_vec)),
            None => self.base.get(key),
        }
    }

    /// Read and decode a record.
    pub fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// Encode and stage a record.
    pub fn put<T: Serialize>(&mut self, key: &[u8], value: &T) -> Result<(), StoreError> {
        let bytes = bincode::serialize(value)?;
        self.batch.put(key.to_vec(), bytes);
        Ok(())
    }

    pub fn delete(&mut self, key: &[u8]) {
        self.batch.delete(key.to_vec());
    }

    pub fn balance(&self, account: &Address) -> Result<Amount, StoreError> {
        match self.batch.pending_balance(account) {
            Some(amount) => Ok(amount),
            None => self.base.balance(account),
        }
    }

    /// Move native value between two accounts.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), StoreError> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let available = self.balance(from)?;
        let debited = available
            .checked_sub(amount)
            .ok_or(StoreError::InsufficientFunds {
                account: *from,
                needed: amount,
                available,
            })?;
        let credited = self
            .balance(to)?
            .checked_add(amount)
            .ok_or(StoreError::Overflow(*to))?;
        self.batch.set_balance(*from, debited);
        self.batch.set_balance(*to, credited);
        tracing::trace!(%from, %to, amount = amount.raw(), "staged transfer");
        Ok(())
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events staged so far by this operation.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Release the borrow on the store, handing back everything to commit.
    pub fn finish(self) -> (WriteBatch, Vec<Event>) {
        (self.batch, self.events)
    }
}
