//! The narrow view of the producer registry governance depends on.

use dpos_registry::ProducerRegistry;
use dpos_store::Txn;
use dpos_types::{Address, Amount};

use crate::error::GovernanceError;

pub trait ProducerSet {
    /// Producers currently allowed to propose and vote.
    fn active_set(&self, txn: &Txn<'_>) -> Result<Vec<Address>, GovernanceError>;

    /// Whether `producer` sits in the Active Producer Index.
    fn is_listed(&self, txn: &Txn<'_>, producer: &Address) -> Result<bool, GovernanceError>;

    /// Forced removal with deposit seizure. Returns the seized deposit.
    fn expel(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        producer: &Address,
    ) -> Result<Amount, GovernanceError>;
}

impl ProducerSet for ProducerRegistry {
    fn active_set(&self, txn: &Txn<'_>) -> Result<Vec<Address>, GovernanceError> {
        Ok(self.top_producers(txn)?)
    }

    fn is_listed(&self, txn: &Txn<'_>, producer: &Address) -> Result<bool, GovernanceError> {
        Ok(self.is_active(txn, producer)?)
    }

    fn expel(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        producer: &Address,
    ) -> Result<Amount, GovernanceError> {
        Ok(ProducerRegistry::expel(self, txn, caller, producer)?)
    }
}
