use std::fmt::Debug;
use std::sync::Arc;

use alloy::primitives::B256;
use async_trait::async_trait;

use crate::errors::StoreError;
use crate::types::StateDump;

pub mod memory;
pub mod mock;

/// Transactional ledger backing the node.
///
/// `checkpoint` opens a provisional change window; `commit` keeps the changes
/// made since the most recent checkpoint and `revert` discards them.
/// Checkpoints nest like a stack.
#[async_trait]
pub trait StateStore: Debug + Send + Sync + 'static {
    async fn checkpoint(&self) -> Result<(), StoreError>;
    async fn commit(&self) -> Result<(), StoreError>;
    async fn revert(&self) -> Result<(), StoreError>;

    async fn get_state_root(&self) -> Result<B256, StoreError>;
    async fn set_state_root(&self, root: B256) -> Result<(), StoreError>;

    async fn dump_state(&self) -> Result<StateDump, StoreError>;
    async fn load_state(&self, state: StateDump) -> Result<(), StoreError>;

    /// Returns an independent store seeded with a copy of this one.
    async fn deep_copy(&self) -> Result<Arc<dyn StateStore>, StoreError>;
}
