use serde::{Deserialize, Serialize};

use dpos_types::{Address, Weight};

/// An identity that opted in to cast other voters' stake.
///
/// While `producers` is non-empty every listed producer carries exactly
/// `weight` on behalf of this proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRecord {
    pub proxy: Address,
    /// Sum of the stakes delegated to this proxy.
    pub weight: Weight,
    pub producers: Vec<Address>,
    /// Cleared on unregistration. The record lingers until the remaining
    /// delegators have unvoted.
    pub accepting: bool,
}

impl ProxyRecord {
    pub fn new(proxy: Address) -> Self {
        Self {
            proxy,
            weight: 0,
            producers: Vec::new(),
            accepting: true,
        }
    }

    pub fn is_propagating(&self) -> bool {
        !self.producers.is_empty()
    }
}
