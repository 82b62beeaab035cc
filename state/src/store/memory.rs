use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use super::StateStore;
use crate::errors::StoreError;
use crate::types::{state_digest, AccountRecord, StateDump};

/// In-memory ledger with a checkpoint journal.
///
/// Every root handed out by `get_state_root` is remembered together with the
/// ledger it was computed from, so `set_state_root` can travel back to it.
/// Travelling back to a root forgets the roots that were only handed out after
/// its last appearance.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: StateDump) -> Self {
        let inner = Inner {
            accounts: state,
            ..Default::default()
        };

        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub async fn get_account(&self, address: &Address) -> Option<AccountRecord> {
        self.inner.read().await.accounts.get(address).cloned()
    }

    pub async fn put_account(&self, address: Address, account: AccountRecord) {
        self.inner.write().await.accounts.insert(address, account);
    }

    pub async fn delete_account(&self, address: &Address) -> bool {
        self.inner.write().await.accounts.remove(address).is_some()
    }

    pub async fn get_storage(&self, address: &Address, slot: B256) -> Option<U256> {
        self.inner
            .read()
            .await
            .accounts
            .get(address)
            .and_then(|account| account.get_storage_value(slot))
    }

    pub async fn put_storage(&self, address: Address, slot: B256, value: U256) {
        let mut inner = self.inner.write().await;
        let account = inner.accounts.entry(address).or_default();
        let storage = account.storage.get_or_insert_with(HashMap::new);

        if value.is_zero() {
            storage.remove(&slot);
        } else {
            storage.insert(slot, value);
        }

        account.storage_root = AccountRecord::storage_digest(storage);
    }

    pub async fn put_code(&self, address: Address, code: Bytes) {
        let mut inner = self.inner.write().await;
        let account = inner.accounts.entry(address).or_default();
        account.code_hash = keccak256(&code);
        account.deployed_bytecode = Some(code);
    }

    pub async fn checkpoint_depth(&self) -> usize {
        self.inner.read().await.checkpoints.len()
    }

    /// Number of state roots `set_state_root` can currently restore.
    pub async fn remembered_roots(&self) -> usize {
        self.inner.read().await.roots.len()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn checkpoint(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let journal = inner.accounts.clone();
        inner.checkpoints.push(journal);
        trace!(target: "devnet::store", depth = inner.checkpoints.len(), "checkpoint");
        Ok(())
    }

    async fn commit(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.checkpoints.pop().ok_or(StoreError::NoCheckpoint)?;
        trace!(target: "devnet::store", depth = inner.checkpoints.len(), "commit");
        Ok(())
    }

    async fn revert(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let journal = inner.checkpoints.pop().ok_or(StoreError::NoCheckpoint)?;
        inner.accounts = journal;
        trace!(target: "devnet::store", depth = inner.checkpoints.len(), "revert");
        Ok(())
    }

    async fn get_state_root(&self) -> Result<B256, StoreError> {
        let mut inner = self.inner.write().await;
        let root = state_digest(&inner.accounts);
        if !inner.roots.contains_key(&root) {
            let accounts = inner.accounts.clone();
            inner.roots.insert(root, accounts);
        }
        if inner.root_log.last() != Some(&root) {
            inner.root_log.push(root);
        }

        Ok(root)
    }

    async fn set_state_root(&self, root: B256) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let accounts = inner
            .roots
            .get(&root)
            .cloned()
            .ok_or(StoreError::UnknownStateRoot(root))?;

        inner.accounts = accounts;

        if let Some(position) = inner.root_log.iter().rposition(|seen| *seen == root) {
            inner.root_log.truncate(position + 1);
            let kept = inner.root_log.iter().copied().collect::<HashSet<_>>();
            inner.roots.retain(|known, _| kept.contains(known));
        }

        trace!(target: "devnet::store", %root, remembered = inner.roots.len(), "state root set");
        Ok(())
    }

    async fn dump_state(&self) -> Result<StateDump, StoreError> {
        Ok(self.inner.read().await.accounts.clone())
    }

    async fn load_state(&self, state: StateDump) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.accounts.extend(state);
        Ok(())
    }

    async fn deep_copy(&self) -> Result<Arc<dyn StateStore>, StoreError> {
        let inner = self.inner.read().await.clone();
        Ok(Arc::new(MemoryStore {
            inner: Arc::new(RwLock::new(inner)),
        }))
    }
}

#[derive(Debug, Clone, Default)]
struct Inner {
    accounts: StateDump,
    checkpoints: Vec<StateDump>,
    roots: HashMap<B256, StateDump>,
    // every root handed out, oldest first, without consecutive repeats
    root_log: Vec<B256>,
}
