//! The narrow view of the producer registry the engine depends on.

use dpos_registry::ProducerRegistry;
use dpos_store::Txn;
use dpos_types::{Address, Weight};

use crate::error::DelegationError;

pub trait WeightTarget {
    /// Whether `producer` may receive new votes.
    fn is_active_candidate(&self, txn: &Txn<'_>, producer: &Address)
        -> Result<bool, DelegationError>;

    fn adjust_weight(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        producer: &Address,
        delta: Weight,
        increase: bool,
    ) -> Result<(), DelegationError>;
}

impl WeightTarget for ProducerRegistry {
    fn is_active_candidate(
        &self,
        txn: &Txn<'_>,
        producer: &Address,
    ) -> Result<bool, DelegationError> {
        Ok(self.is_active(txn, producer)?)
    }

    fn adjust_weight(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        producer: &Address,
        delta: Weight,
        increase: bool,
    ) -> Result<(), DelegationError> {
        ProducerRegistry::adjust_weight(self, txn, caller, producer, delta, increase)?;
        Ok(())
    }
}
