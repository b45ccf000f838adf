//! Module directory: which addresses carry live module code.
//!
//! A module is stateless logic plus the native balance it escrows; all of its
//! records live in the shared keyed state. Replacing a module therefore only
//! needs its balance moved and its code removed: the successor reads the same
//! records.

use serde::{Deserialize, Serialize};

use dpos_store::{record_key, Txn};
use dpos_types::{names, Address, Amount, ConfigKey, Event};

use crate::error::ConfigError;
use crate::store::ConfigStore;

const CODE_NS: &str = "module.code";
const NONCE_KEY: &[u8] = b"module.nonce";

/// The kinds of code a module address can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    ProducerRegistry,
    Delegation,
}

impl ModuleKind {
    /// Logical name the current implementation is bound under.
    pub fn binding_name(&self) -> &'static str {
        match self {
            Self::ProducerRegistry => names::PRODUCER_REGISTRY_MODULE,
            Self::Delegation => names::DELEGATION_MODULE,
        }
    }

    pub fn binding_key(&self) -> ConfigKey {
        ConfigKey::named(self.binding_name())
    }

    fn tag(&self) -> u8 {
        match self {
            Self::ProducerRegistry => 1,
            Self::Delegation => 2,
        }
    }
}

impl ConfigStore {
    /// Install fresh module code at a new, never-used address.
    pub fn deploy_module(
        &self,
        txn: &mut Txn<'_>,
        kind: ModuleKind,
    ) -> Result<Address, ConfigError> {
        let nonce = txn.get::<u64>(NONCE_KEY)?.unwrap_or(0);
        let mut label = b"module".to_vec();
        label.push(kind.tag());
        label.extend_from_slice(&nonce.to_be_bytes());
        let module = Address::derive(&label);

        txn.put(NONCE_KEY, &(nonce + 1))?;
        txn.put(&record_key(CODE_NS, module.as_bytes()), &kind)?;
        tracing::info!(%module, ?kind, "module deployed");
        txn.emit(Event::ModuleDeployed { module });
        Ok(module)
    }

    /// Kind of code at `module`, or `None` if it never had code or was retired.
    pub fn module_kind(
        &self,
        txn: &Txn<'_>,
        module: &Address,
    ) -> Result<Option<ModuleKind>, ConfigError> {
        Ok(txn.get::<ModuleKind>(&record_key(CODE_NS, module.as_bytes()))?)
    }

    /// Fail unless `module` currently carries code of `kind`.
    pub fn ensure_live(
        &self,
        txn: &Txn<'_>,
        module: &Address,
        kind: ModuleKind,
    ) -> Result<(), ConfigError> {
        match self.module_kind(txn, module)? {
            Some(k) if k == kind => Ok(()),
            _ => Err(ConfigError::ModuleRetired(*module)),
        }
    }

    /// Address currently bound for `kind`.
    pub fn bound_module(&self, txn: &Txn<'_>, kind: ModuleKind) -> Result<Address, ConfigError> {
        self.resolve_module(txn, &kind.binding_key())?
            .ok_or(ConfigError::Unbound(kind.binding_name()))
    }

    /// Retire `module`: release its whole balance to `beneficiary` and remove
    /// its code so every later call into it fails. Governance only.
    pub fn retire(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        module: &Address,
        beneficiary: &Address,
    ) -> Result<Amount, ConfigError> {
        self.authorize(caller)?;
        if self.module_kind(txn, module)?.is_none() {
            return Err(ConfigError::ModuleRetired(*module));
        }
        let released = txn.balance(module)?;
        txn.transfer(module, beneficiary, released)?;
        txn.delete(&record_key(CODE_NS, module.as_bytes()));
        tracing::info!(%module, %beneficiary, released = released.raw(), "module retired");
        txn.emit(Event::ModuleRetired {
            module: *module,
            beneficiary: *beneficiary,
            released,
        });
        Ok(released)
    }
}
