//! Active Producer Index.
//!
//! An unordered set of addresses laid out as numbered slots plus a reverse
//! position map, so membership tests and removal are both O(1). Removal moves
//! the last slot into the hole and truncates.

use dpos_store::{record_key, StoreError, Txn};
use dpos_types::Address;

const LEN_KEY: &[u8] = b"registry.active.len";
const SLOT_NS: &str = "registry.active.slot";
const POS_NS: &str = "registry.active.pos";

fn slot_key(i: u64) -> Vec<u8> {
    record_key(SLOT_NS, &i.to_be_bytes())
}

fn pos_key(producer: &Address) -> Vec<u8> {
    record_key(POS_NS, producer.as_bytes())
}

pub(crate) struct ActiveIndex;

impl ActiveIndex {
    pub fn len(txn: &Txn<'_>) -> Result<u64, StoreError> {
        Ok(txn.get::<u64>(LEN_KEY)?.unwrap_or(0))
    }

    pub fn contains(txn: &Txn<'_>, producer: &Address) -> Result<bool, StoreError> {
        txn.contains(&pos_key(producer))
    }

    /// Members in slot order. The order carries no meaning.
    pub fn members(txn: &Txn<'_>) -> Result<Vec<Address>, StoreError> {
        let len = Self::len(txn)?;
        let mut out = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(producer) = txn.get::<Address>(&slot_key(i))? {
                out.push(producer);
            }
        }
        Ok(out)
    }

    /// Returns `false` if already present.
    pub fn insert(txn: &mut Txn<'_>, producer: &Address) -> Result<bool, StoreError> {
        if Self::contains(txn, producer)? {
            return Ok(false);
        }
        let len = Self::len(txn)?;
        txn.put(&slot_key(len), producer)?;
        txn.put(&pos_key(producer), &len)?;
        txn.put(LEN_KEY, &(len + 1))?;
        Ok(true)
    }

    /// Swap-remove. Returns `false` if absent.
    pub fn remove(txn: &mut Txn<'_>, producer: &Address) -> Result<bool, StoreError> {
        let Some(pos) = txn.get::<u64>(&pos_key(producer))? else {
            return Ok(false);
        };
        let last = Self::len(txn)?.saturating_sub(1);
        if pos != last {
            if let Some(moved) = txn.get::<Address>(&slot_key(last))? {
                txn.put(&slot_key(pos), &moved)?;
                txn.put(&pos_key(&moved), &pos)?;
            }
        }
        txn.delete(&slot_key(last));
        txn.delete(&pos_key(producer));
        txn.put(LEN_KEY, &last)?;
        Ok(true)
    }
}
