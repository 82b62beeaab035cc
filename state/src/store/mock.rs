use std::fmt::Display;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::B256;
use async_trait::async_trait;
use eyre::eyre;

use super::memory::MemoryStore;
use super::StateStore;
use crate::errors::StoreError;
use crate::types::StateDump;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Checkpoint,
    Commit,
    Revert,
    GetStateRoot,
    SetStateRoot,
    DumpState,
    LoadState,
    DeepCopy,
}

impl Operation {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Checkpoint => "checkpoint",
            Operation::Commit => "commit",
            Operation::Revert => "revert",
            Operation::GetStateRoot => "getStateRoot",
            Operation::SetStateRoot => "setStateRoot",
            Operation::DumpState => "dumpState",
            Operation::LoadState => "loadState",
            Operation::DeepCopy => "deepCopy",
        };

        write!(f, "{name}")
    }
}

/// A [`MemoryStore`] with per-operation fault injection and call counters.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    store: MemoryStore,
    hooks: Arc<Hooks>,
}

#[derive(Debug, Default)]
struct Hooks {
    failing: [AtomicBool; Operation::COUNT],
    calls: [AtomicUsize; Operation::COUNT],
    stalled: [AtomicBool; Operation::COUNT],
}

impl MockStore {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            hooks: Arc::default(),
        }
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.store
    }

    /// Makes every subsequent call of `op` fail.
    pub fn fail(&self, op: Operation) {
        self.hooks.failing[op.index()].store(true, Ordering::SeqCst);
    }

    pub fn heal(&self, op: Operation) {
        self.hooks.failing[op.index()].store(false, Ordering::SeqCst);
    }

    /// Holds every subsequent call of `op` until the stall is lifted.
    pub fn stall(&self, op: Operation, stall: bool) {
        self.hooks.stalled[op.index()].store(stall, Ordering::SeqCst);
    }

    pub fn calls(&self, op: Operation) -> usize {
        self.hooks.calls[op.index()].load(Ordering::SeqCst)
    }

    async fn enter(&self, op: Operation) -> Result<(), StoreError> {
        self.hooks.calls[op.index()].fetch_add(1, Ordering::SeqCst);
        while self.hooks.stalled[op.index()].load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        if self.hooks.failing[op.index()].load(Ordering::SeqCst) {
            return Err(eyre!("injected {op} failure").into());
        }

        Ok(())
    }
}

#[async_trait]
impl StateStore for MockStore {
    async fn checkpoint(&self) -> Result<(), StoreError> {
        self.enter(Operation::Checkpoint).await?;
        self.store.checkpoint().await
    }

    async fn commit(&self) -> Result<(), StoreError> {
        self.enter(Operation::Commit).await?;
        self.store.commit().await
    }

    async fn revert(&self) -> Result<(), StoreError> {
        self.enter(Operation::Revert).await?;
        self.store.revert().await
    }

    async fn get_state_root(&self) -> Result<B256, StoreError> {
        self.enter(Operation::GetStateRoot).await?;
        self.store.get_state_root().await
    }

    async fn set_state_root(&self, root: B256) -> Result<(), StoreError> {
        self.enter(Operation::SetStateRoot).await?;
        self.store.set_state_root(root).await
    }

    async fn dump_state(&self) -> Result<StateDump, StoreError> {
        self.enter(Operation::DumpState).await?;
        self.store.dump_state().await
    }

    async fn load_state(&self, state: StateDump) -> Result<(), StoreError> {
        self.enter(Operation::LoadState).await?;
        self.store.load_state(state).await
    }

    async fn deep_copy(&self) -> Result<Arc<dyn StateStore>, StoreError> {
        self.enter(Operation::DeepCopy).await?;
        self.store.deep_copy().await
    }
}
