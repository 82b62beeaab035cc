use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, error, warn};

use common::types::SnapshotId;
use state::errors::StoreError;
use state::types::StateDump;
use state::StateStore;

use crate::errors::SnapshotError;

/// Ledger state captured at one point in time. Registered snapshots are
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state_root: B256,
    pub state: StateDump,
}

/// Registry of state snapshots taken against a [`StateStore`].
///
/// Cloning the manager shares its registry; [`SnapshotManager::deep_copy`]
/// produces an independent one.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    snapshots: Arc<RwLock<BTreeMap<SnapshotId, Arc<Snapshot>>>>,
    next_id: Arc<AtomicU64>,
    store: Arc<dyn StateStore>,
    // serializes the store transactions issued by this manager
    transaction: Arc<Mutex<()>>,
}

impl SnapshotManager {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self::from_cells(Arc::default(), Arc::new(AtomicU64::new(1)), store)
    }

    fn from_cells(
        snapshots: Arc<RwLock<BTreeMap<SnapshotId, Arc<Snapshot>>>>,
        next_id: Arc<AtomicU64>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            snapshots,
            next_id,
            store,
            transaction: Arc::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Captures the current state root and a full dump of the ledger inside a
    /// store checkpoint and registers them under a fresh id.
    ///
    /// The checkpoint is reverted when the capture or the commit fails, and
    /// also when the returned future is dropped before the commit.
    pub async fn take_snapshot(&self) -> Result<SnapshotId, SnapshotError> {
        let id = SnapshotId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let lock = self.transaction.clone().lock_owned().await;

        if let Err(err) = self.store.checkpoint().await {
            return Err(self.storage_failure(id, "checkpoint", err));
        }
        let guard = CheckpointGuard::new(self.store.clone(), lock);

        let snapshot = match self.capture().await {
            Ok(snapshot) => snapshot,
            Err((operation, err)) => {
                guard.revert().await;
                return Err(self.storage_failure(id, operation, err));
            }
        };

        if let Err(err) = self.store.commit().await {
            guard.revert().await;
            return Err(self.storage_failure(id, "commit", err));
        }
        // held until the snapshot is registered, so a concurrent revert to an
        // earlier id also discards this one
        let _transaction = guard.disarm();

        let state_root = snapshot.state_root;
        let accounts = snapshot.state.len();
        self.snapshots.write().await.insert(id, Arc::new(snapshot));

        debug!(target: "devnet::snapshot", %id, %state_root, accounts, "snapshot taken");
        Ok(id)
    }

    async fn capture(&self) -> Result<Snapshot, (&'static str, StoreError)> {
        let state_root = self
            .store
            .get_state_root()
            .await
            .map_err(|err| ("getStateRoot", err))?;
        let state = self
            .store
            .dump_state()
            .await
            .map_err(|err| ("dumpState", err))?;

        Ok(Snapshot { state_root, state })
    }

    fn storage_failure(&self, id: SnapshotId, operation: &str, err: StoreError) -> SnapshotError {
        let err = SnapshotError::storage(id, operation, err);
        error!(target: "devnet::snapshot", error = %err);
        err
    }

    pub async fn get_snapshot(&self, id: SnapshotId) -> Option<Arc<Snapshot>> {
        self.snapshots.read().await.get(&id).cloned()
    }

    /// Returns a new map of every registered snapshot.
    pub async fn get_all_snapshots(&self) -> BTreeMap<SnapshotId, Arc<Snapshot>> {
        self.snapshots.read().await.clone()
    }

    /// Restores the store to the state root recorded by `id`, then forgets
    /// `id` and every snapshot taken after it.
    ///
    /// Nothing is forgotten when the store rejects the root, so the revert can
    /// be retried.
    pub async fn revert_to_snapshot(&self, id: SnapshotId) -> Result<(), SnapshotError> {
        let _lock = self.transaction.lock().await;

        let snapshot = self.snapshots.read().await.get(&id).cloned();
        let Some(snapshot) = snapshot else {
            debug!(target: "devnet::snapshot", %id, "revert to unknown snapshot");
            return Err(SnapshotError::NotFound(id));
        };

        if let Err(source) = self.store.set_state_root(snapshot.state_root).await {
            warn!(
                target: "devnet::snapshot",
                %id,
                state_root = %snapshot.state_root,
                error = %source,
                "state root restoration failed"
            );
            return Err(SnapshotError::StateRootRestoration {
                state_root: snapshot.state_root,
                source,
            });
        }

        let discarded = self.snapshots.write().await.split_off(&id);
        debug!(
            target: "devnet::snapshot",
            %id,
            discarded = discarded.len(),
            "reverted to snapshot"
        );

        Ok(())
    }

    /// Creates an independent manager holding value copies of every snapshot
    /// and continuing the same id sequence.
    ///
    /// Pass `store` when the store was copied too; otherwise the copy keeps
    /// operating on this manager's store.
    pub async fn deep_copy(&self, store: Option<Arc<dyn StateStore>>) -> Self {
        let snapshots = self.snapshots.read().await;
        let next_id = self.next_id.load(Ordering::SeqCst);

        let copied = snapshots
            .iter()
            .map(|(id, snapshot)| (*id, Arc::new(Snapshot::clone(snapshot))))
            .collect::<BTreeMap<_, _>>();

        Self::from_cells(
            Arc::new(RwLock::new(copied)),
            Arc::new(AtomicU64::new(next_id)),
            store.unwrap_or_else(|| self.store.clone()),
        )
    }
}

/// Reverts an open checkpoint unless disarmed.
///
/// The revert always runs on a spawned task that owns the transaction lock, so
/// it completes exactly once even when the snapshot future is dropped while
/// the revert is in flight.
struct CheckpointGuard {
    armed: Option<(Arc<dyn StateStore>, OwnedMutexGuard<()>)>,
}

impl CheckpointGuard {
    fn new(store: Arc<dyn StateStore>, lock: OwnedMutexGuard<()>) -> Self {
        Self {
            armed: Some((store, lock)),
        }
    }

    /// Keeps the checkpoint and hands back the transaction lock.
    fn disarm(mut self) -> Option<OwnedMutexGuard<()>> {
        self.armed.take().map(|(_, lock)| lock)
    }

    async fn revert(mut self) {
        let Some((store, lock)) = self.armed.take() else {
            return;
        };

        if let Err(err) = tokio::spawn(revert_checkpoint(store, lock)).await {
            error!(target: "devnet::snapshot", error = %err, "checkpoint revert task failed");
        }
    }
}

impl Drop for CheckpointGuard {
    fn drop(&mut self) {
        let Some((store, lock)) = self.armed.take() else {
            return;
        };

        warn!(target: "devnet::snapshot", "snapshot cancelled with an open checkpoint");
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(revert_checkpoint(store, lock));
            }
            Err(_) => {
                error!(target: "devnet::snapshot", "no runtime to revert the open checkpoint");
            }
        }
    }
}

async fn revert_checkpoint(store: Arc<dyn StateStore>, lock: OwnedMutexGuard<()>) {
    if let Err(err) = store.revert().await {
        error!(target: "devnet::snapshot", error = %err, "checkpoint revert failed");
    }
    drop(lock);
}
