use std::collections::{BTreeMap, HashMap};

use alloy::primitives::{b256, keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Root of an empty trie.
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Hash of empty bytecode.
pub const KECCAK_EMPTY: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Full ledger export, keyed by account address.
pub type StateDump = BTreeMap<Address, AccountRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub nonce: u64,
    pub balance: U256,
    pub storage_root: B256,
    pub code_hash: B256,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deployed_bytecode: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub storage: Option<HashMap<B256, U256>>,
}

impl Default for AccountRecord {
    fn default() -> Self {
        Self {
            nonce: 0,
            balance: U256::ZERO,
            storage_root: EMPTY_ROOT_HASH,
            code_hash: KECCAK_EMPTY,
            deployed_bytecode: None,
            storage: None,
        }
    }
}

impl AccountRecord {
    pub fn with_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    pub fn get_storage_value(&self, slot: B256) -> Option<U256> {
        self.storage
            .as_ref()
            .and_then(|storage| storage.get(&slot).copied())
    }

    /// Appends a canonical encoding of the account to `out`. Storage slots
    /// are written in ascending key order so equal accounts encode equally.
    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&self.balance.to_be_bytes::<32>());
        out.extend_from_slice(self.storage_root.as_slice());
        out.extend_from_slice(self.code_hash.as_slice());

        let code: &[u8] = self
            .deployed_bytecode
            .as_ref()
            .map(|code| &code[..])
            .unwrap_or_default();
        out.extend_from_slice(&(code.len() as u64).to_be_bytes());
        out.extend_from_slice(code);

        let mut slots = self
            .storage
            .iter()
            .flatten()
            .collect::<Vec<(&B256, &U256)>>();
        slots.sort_unstable_by_key(|(slot, _)| **slot);

        out.extend_from_slice(&(slots.len() as u64).to_be_bytes());
        for (slot, value) in slots {
            out.extend_from_slice(slot.as_slice());
            out.extend_from_slice(&value.to_be_bytes::<32>());
        }
    }

    pub(crate) fn storage_digest(storage: &HashMap<B256, U256>) -> B256 {
        if storage.is_empty() {
            return EMPTY_ROOT_HASH;
        }

        let mut slots = storage.iter().collect::<Vec<_>>();
        slots.sort_unstable_by_key(|(slot, _)| **slot);

        let mut buf = Vec::with_capacity(slots.len() * 64);
        for (slot, value) in slots {
            buf.extend_from_slice(slot.as_slice());
            buf.extend_from_slice(&value.to_be_bytes::<32>());
        }

        keccak256(&buf)
    }
}

/// Content digest of a ledger. This is not a Merkle-Patricia root, but it is
/// deterministic and changes whenever any account field changes.
pub fn state_digest(state: &StateDump) -> B256 {
    if state.is_empty() {
        return EMPTY_ROOT_HASH;
    }

    let mut buf = Vec::new();
    for (address, account) in state {
        buf.extend_from_slice(address.as_slice());
        account.encode(&mut buf);
    }

    keccak256(&buf)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn digest_ignores_storage_insertion_order() {
        let slot_a = B256::with_last_byte(1);
        let slot_b = B256::with_last_byte(2);

        let mut first = AccountRecord::default();
        first.storage = Some(HashMap::from([
            (slot_a, U256::from(10)),
            (slot_b, U256::from(20)),
        ]));

        let mut second = AccountRecord::default();
        let mut storage = HashMap::new();
        storage.insert(slot_b, U256::from(20));
        storage.insert(slot_a, U256::from(10));
        second.storage = Some(storage);

        let owner = address!("1234567890123456789012345678901234567890");
        let a = StateDump::from([(owner, first)]);
        let b = StateDump::from([(owner, second)]);

        assert_eq!(state_digest(&a), state_digest(&b));
    }

    #[test]
    fn digest_tracks_balance() {
        let owner = address!("1234567890123456789012345678901234567890");
        let poor = StateDump::from([(owner, AccountRecord::with_balance(U256::from(1)))]);
        let rich = StateDump::from([(owner, AccountRecord::with_balance(U256::from(2)))]);

        assert_ne!(state_digest(&poor), state_digest(&rich));
        assert_eq!(state_digest(&StateDump::new()), EMPTY_ROOT_HASH);
    }

    #[test]
    fn digest_tracks_bytecode() {
        let owner = address!("1234567890123456789012345678901234567890");
        let empty = StateDump::from([(owner, AccountRecord::default())]);
        let deployed = StateDump::from([(
            owner,
            AccountRecord {
                deployed_bytecode: Some(Bytes::from_static(&[0x60, 0x80])),
                ..Default::default()
            },
        )]);

        assert_ne!(state_digest(&empty), state_digest(&deployed));
    }

    #[test]
    fn account_serializes_camel_case() {
        let account = AccountRecord {
            nonce: 1,
            deployed_bytecode: Some(Bytes::from_static(&[0x60, 0x80])),
            ..Default::default()
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("storageRoot").is_some());
        assert!(json.get("deployedBytecode").is_some());
        assert!(json.get("storage").is_none());

        let back: AccountRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, account);
    }
}
