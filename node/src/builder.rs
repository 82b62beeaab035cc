use std::sync::Arc;

use alloy::primitives::Address;
use tracing::debug;

use config::Config;
use state::types::StateDump;
use state::{MemoryStore, StateStore};

use crate::errors::NodeError;
use crate::DevNode;

#[derive(Debug, Default)]
pub struct NodeBuilder {
    pub config: Option<Config>,
    pub store: Option<Arc<dyn StateStore>>,
    pub genesis: Option<StateDump>,
    pub min_gas_price: Option<u128>,
    pub block_timestamp_interval: Option<u64>,
    pub impersonate: Option<Address>,
    pub auto_impersonate: Option<bool>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `store` instead of a fresh [`MemoryStore`].
    pub fn store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Accounts loaded into the store before the node is handed out.
    pub fn genesis(mut self, genesis: StateDump) -> Self {
        self.genesis = Some(genesis);
        self
    }

    pub fn min_gas_price(mut self, price: u128) -> Self {
        self.min_gas_price = Some(price);
        self
    }

    pub fn block_timestamp_interval(mut self, interval: u64) -> Self {
        self.block_timestamp_interval = Some(interval);
        self
    }

    pub fn impersonate(mut self, account: Address) -> Self {
        self.impersonate = Some(account);
        self
    }

    pub fn auto_impersonate(mut self, enabled: bool) -> Self {
        self.auto_impersonate = Some(enabled);
        self
    }

    pub async fn build(self) -> Result<DevNode, NodeError> {
        let mut config = self.config.unwrap_or_default();

        if let Some(price) = self.min_gas_price {
            config.block_params.min_gas_price = Some(price);
        }

        if let Some(interval) = self.block_timestamp_interval {
            config.block_params.block_timestamp_interval = Some(interval);
        }

        if let Some(account) = self.impersonate {
            config.impersonation.account = Some(account);
        }

        if let Some(enabled) = self.auto_impersonate {
            config.impersonation.auto_impersonate = enabled;
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn StateStore>);

        if let Some(genesis) = self.genesis {
            debug!(target: "devnet::node", accounts = genesis.len(), "loading genesis state");
            store.load_state(genesis).await?;
        }

        Ok(DevNode::new(Arc::new(config), store))
    }
}
