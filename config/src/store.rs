//! Config entries and module bindings.

use dpos_store::{record_key, Txn};
use dpos_types::{Address, ConfigKey, ConfigValue, Event};

use crate::error::ConfigError;

const ENTRY_NS: &str = "config.entry";
const BINDING_NS: &str = "config.binding";

/// Handle over the config mappings, parameterised by the one identity that
/// may write them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigStore {
    governance: Address,
}

impl ConfigStore {
    pub fn new(governance: Address) -> Self {
        Self { governance }
    }

    /// The privileged writer (the governance engine's address).
    pub fn governance(&self) -> Address {
        self.governance
    }

    pub(crate) fn authorize(&self, caller: &Address) -> Result<(), ConfigError> {
        if *caller != self.governance {
            tracing::warn!(%caller, "rejected privileged config call");
            return Err(ConfigError::Unauthorized(*caller));
        }
        Ok(())
    }

    /// Read an entry. Unset keys read as `Uint(0)`.
    pub fn get(&self, txn: &Txn<'_>, key: &ConfigKey) -> Result<ConfigValue, ConfigError> {
        Ok(txn
            .get::<ConfigValue>(&record_key(ENTRY_NS, key.as_bytes()))?
            .unwrap_or_default())
    }

    /// Integer view of a well-known entry.
    pub fn get_uint(&self, txn: &Txn<'_>, name: &str) -> Result<u128, ConfigError> {
        Ok(self.get(txn, &ConfigKey::named(name))?.uint_or_zero())
    }

    /// Integer view clamped to `u64` (durations, sizes).
    pub fn get_u64(&self, txn: &Txn<'_>, name: &str) -> Result<u64, ConfigError> {
        Ok(u64::try_from(self.get_uint(txn, name)?).unwrap_or(u64::MAX))
    }

    pub fn set(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        key: ConfigKey,
        value: ConfigValue,
    ) -> Result<(), ConfigError> {
        self.authorize(caller)?;
        txn.put(&record_key(ENTRY_NS, key.as_bytes()), &value)?;
        tracing::info!(%key, %value, "config entry updated");
        txn.emit(Event::ConfigUpdated { key, value });
        Ok(())
    }

    /// Point `name` at `module`, returning the previous binding.
    pub fn bind_module(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        name: ConfigKey,
        module: Address,
    ) -> Result<Option<Address>, ConfigError> {
        self.authorize(caller)?;
        let previous = self.resolve_module(txn, &name)?;
        txn.put(&record_key(BINDING_NS, name.as_bytes()), &module)?;
        tracing::info!(%name, %module, ?previous, "module bound");
        txn.emit(Event::ModuleBound {
            name,
            previous,
            current: module,
        });
        Ok(previous)
    }

    pub fn resolve_module(
        &self,
        txn: &Txn<'_>,
        name: &ConfigKey,
    ) -> Result<Option<Address>, ConfigError> {
        Ok(txn.get::<Address>(&record_key(BINDING_NS, name.as_bytes()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_nullables::NullStore;
    use dpos_types::{names, Timestamp};

    fn gov() -> Address {
        Address::derive(b"governance")
    }

    #[test]
    fn unset_key_reads_zero() {
        let store = NullStore::new();
        let txn = Txn::new(&store, Timestamp::EPOCH);
        let config = ConfigStore::new(gov());
        let value = config
            .get(&txn, &ConfigKey::named("never.written"))
            .unwrap();
        assert_eq!(value, ConfigValue::Uint(0));
    }

    #[test]
    fn governance_can_set() {
        let store = NullStore::new();
        let mut txn = Txn::new(&store, Timestamp::EPOCH);
        let config = ConfigStore::new(gov());
        let key = ConfigKey::named(names::PROPOSAL_PERIOD);
        config.set(&mut txn, &gov(), key, ConfigValue::Uint(42)).unwrap();
        assert_eq!(config.get_uint(&txn, names::PROPOSAL_PERIOD).unwrap(), 42);
        assert_eq!(txn.events().len(), 1);
    }

    #[test]
    fn others_cannot_set_or_bind() {
        let store = NullStore::new();
        let mut txn = Txn::new(&store, Timestamp::EPOCH);
        let config = ConfigStore::new(gov());
        let intruder = Address::derive(b"intruder");
        let key = ConfigKey::named(names::DEPOSIT_FOR_JOIN);
        let err = config
            .set(&mut txn, &intruder, key, ConfigValue::Uint(0))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Unauthorized(a) if a == intruder));
        assert!(config
            .bind_module(&mut txn, &intruder, key, intruder)
            .is_err());
        assert!(txn.events().is_empty());
    }

    #[test]
    fn rebinding_returns_previous() {
        let store = NullStore::new();
        let mut txn = Txn::new(&store, Timestamp::EPOCH);
        let config = ConfigStore::new(gov());
        let name = ConfigKey::named(names::DELEGATION_MODULE);
        let first = Address::derive(b"v1");
        let second = Address::derive(b"v2");
        assert_eq!(config.bind_module(&mut txn, &gov(), name, first).unwrap(), None);
        assert_eq!(
            config.bind_module(&mut txn, &gov(), name, second).unwrap(),
            Some(first)
        );
        assert_eq!(config.resolve_module(&txn, &name).unwrap(), Some(second));
    }

    #[test]
    fn u64_view_clamps() {
        let store = NullStore::new();
        let mut txn = Txn::new(&store, Timestamp::EPOCH);
        let config = ConfigStore::new(gov());
        let key = ConfigKey::named(names::LOCK_TIME_FOR_DEPOSIT);
        config.set(&mut txn, &gov(), key, ConfigValue::Uint(u128::MAX)).unwrap();
        assert_eq!(config.get_u64(&txn, names::LOCK_TIME_FOR_DEPOSIT).unwrap(), u64::MAX);
    }
}
