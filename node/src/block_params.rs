use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::trace;

use config::BlockParamsConfig;

/// Overrides that apply to the next mined block only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NextBlockOverrides {
    pub timestamp: Option<u64>,
    pub gas_limit: Option<u64>,
    pub base_fee_per_gas: Option<u128>,
}

impl NextBlockOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Block-parameter overrides consulted by the block builder.
///
/// `min_gas_price` and `block_timestamp_interval` persist across blocks; the
/// next-block fields are cleared together by
/// [`BlockParams::clear_next_block_overrides`].
#[derive(Debug, Clone)]
pub struct BlockParams {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Clone, Default)]
struct Inner {
    next: NextBlockOverrides,
    min_gas_price: Option<u128>,
    block_timestamp_interval: Option<u64>,
}

impl From<&BlockParamsConfig> for Inner {
    fn from(config: &BlockParamsConfig) -> Self {
        Inner {
            next: NextBlockOverrides {
                timestamp: config.next_block_timestamp,
                gas_limit: config.next_block_gas_limit,
                base_fee_per_gas: config.next_block_base_fee_per_gas,
            },
            min_gas_price: config.min_gas_price,
            block_timestamp_interval: config.block_timestamp_interval,
        }
    }
}

impl Default for BlockParams {
    fn default() -> Self {
        Self::new(&BlockParamsConfig::default())
    }
}

impl BlockParams {
    pub fn new(config: &BlockParamsConfig) -> Self {
        Self::from_cells(Arc::new(RwLock::new(Inner::from(config))))
    }

    fn from_cells(inner: Arc<RwLock<Inner>>) -> Self {
        Self { inner }
    }

    // next block timestamp

    pub async fn get_next_block_timestamp(&self) -> Option<u64> {
        self.inner.read().await.next.timestamp
    }

    pub async fn set_next_block_timestamp(&self, timestamp: Option<u64>) {
        self.inner.write().await.next.timestamp = timestamp;
    }

    // next block gas limit

    pub async fn get_next_block_gas_limit(&self) -> Option<u64> {
        self.inner.read().await.next.gas_limit
    }

    pub async fn set_next_block_gas_limit(&self, gas_limit: Option<u64>) {
        self.inner.write().await.next.gas_limit = gas_limit;
    }

    // next block base fee

    pub async fn get_next_block_base_fee_per_gas(&self) -> Option<u128> {
        self.inner.read().await.next.base_fee_per_gas
    }

    pub async fn set_next_block_base_fee_per_gas(&self, base_fee: Option<u128>) {
        self.inner.write().await.next.base_fee_per_gas = base_fee;
    }

    // persistent parameters

    pub async fn get_min_gas_price(&self) -> Option<u128> {
        self.inner.read().await.min_gas_price
    }

    pub async fn set_min_gas_price(&self, price: Option<u128>) {
        self.inner.write().await.min_gas_price = price;
    }

    pub async fn get_block_timestamp_interval(&self) -> Option<u64> {
        self.inner.read().await.block_timestamp_interval
    }

    pub async fn set_block_timestamp_interval(&self, interval: Option<u64>) {
        self.inner.write().await.block_timestamp_interval = interval;
    }

    // next block group

    pub async fn next_block_overrides(&self) -> NextBlockOverrides {
        self.inner.read().await.next
    }

    pub async fn clear_next_block_overrides(&self) {
        self.inner.write().await.next = NextBlockOverrides::default();
        trace!(target: "devnet::block_params", "next block overrides cleared");
    }

    /// Returns the next-block overrides and clears them in the same step.
    pub async fn take_next_block_overrides(&self) -> NextBlockOverrides {
        let overrides = std::mem::take(&mut self.inner.write().await.next);
        trace!(target: "devnet::block_params", ?overrides, "next block overrides consumed");
        overrides
    }

    pub async fn deep_copy(&self) -> Self {
        let inner = self.inner.read().await.clone();
        Self::from_cells(Arc::new(RwLock::new(inner)))
    }
}
