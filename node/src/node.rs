use std::sync::Arc;

use tracing::info;

use config::Config;
use state::StateStore;

use crate::block_params::BlockParams;
use crate::errors::NodeError;
use crate::filters::FilterRegistry;
use crate::impersonation::Impersonation;
use crate::snapshot::SnapshotManager;

/// Mutable node state shared by the RPC handlers, the block builder and the
/// transaction validator.
#[derive(Debug, Clone)]
pub struct DevNode {
    pub config: Arc<Config>,
    store: Arc<dyn StateStore>,
    snapshots: SnapshotManager,
    block_params: BlockParams,
    impersonation: Impersonation,
    filters: FilterRegistry,
}

impl DevNode {
    pub fn new(config: Arc<Config>, store: Arc<dyn StateStore>) -> Self {
        let snapshots = SnapshotManager::new(store.clone());
        let block_params = BlockParams::new(&config.block_params);
        let impersonation = Impersonation::new(&config.impersonation);
        let filters = FilterRegistry::new(config.filter_expiration());

        DevNode {
            config,
            store,
            snapshots,
            block_params,
            impersonation,
            filters,
        }
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    pub fn block_params(&self) -> &BlockParams {
        &self.block_params
    }

    pub fn impersonation(&self) -> &Impersonation {
        &self.impersonation
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Forks the node: the store and every service are copied by value, and
    /// the copied snapshot registry operates on the copied store.
    pub async fn deep_copy(&self) -> Result<Self, NodeError> {
        let store = self.store.deep_copy().await?;
        let snapshots = self.snapshots.deep_copy(Some(store.clone())).await;
        let block_params = self.block_params.deep_copy().await;
        let impersonation = self.impersonation.deep_copy().await;
        let filters = self.filters.deep_copy().await;

        info!(target: "devnet::node", "node state copied");

        Ok(DevNode {
            config: self.config.clone(),
            store,
            snapshots,
            block_params,
            impersonation,
            filters,
        })
    }
}
