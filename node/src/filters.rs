use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::B256;
use alloy::rpc::types::{Filter as LogFilter, Log};
use tokio::sync::RwLock;
use tracing::debug;

use common::types::FilterId;
use config::DEFAULT_FILTER_EXPIRATION_SECS;

use crate::errors::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Log,
    Block,
    PendingTransaction,
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formatted = match self {
            Self::Log => "log",
            Self::Block => "block",
            Self::PendingTransaction => "pending transaction",
        };

        write!(f, "{formatted}")
    }
}

/// An installed filter and the changes buffered since it was last polled.
#[derive(Debug, Clone)]
pub struct Filter {
    pub id: FilterId,
    pub kind: FilterKind,
    pub created: Instant,
    pub last_accessed: Instant,
    pub criteria: Option<LogFilter>,
    pub logs: Vec<Log>,
    pub blocks: Vec<B256>,
    pub transactions: Vec<B256>,
}

impl Filter {
    fn new(id: FilterId, kind: FilterKind, criteria: Option<LogFilter>) -> Self {
        let now = Instant::now();
        Self {
            id,
            kind,
            created: now,
            last_accessed: now,
            criteria,
            logs: Vec::new(),
            blocks: Vec::new(),
            transactions: Vec::new(),
        }
    }
}

/// Registry of installed event filters.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: Arc<RwLock<BTreeMap<FilterId, Filter>>>,
    next_id: Arc<AtomicU64>,
    expiration: Duration,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_FILTER_EXPIRATION_SECS))
    }
}

impl FilterRegistry {
    pub fn new(expiration: Duration) -> Self {
        Self::from_cells(Arc::default(), Arc::new(AtomicU64::new(1)), expiration)
    }

    fn from_cells(
        filters: Arc<RwLock<BTreeMap<FilterId, Filter>>>,
        next_id: Arc<AtomicU64>,
        expiration: Duration,
    ) -> Self {
        Self {
            filters,
            next_id,
            expiration,
        }
    }

    async fn install(&self, kind: FilterKind, criteria: Option<LogFilter>) -> FilterId {
        let id = FilterId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.filters
            .write()
            .await
            .insert(id, Filter::new(id, kind, criteria));

        debug!(target: "devnet::filters", %id, %kind, "filter installed");
        id
    }

    pub async fn create_log_filter(&self, criteria: Option<LogFilter>) -> FilterId {
        self.install(FilterKind::Log, criteria).await
    }

    pub async fn create_block_filter(&self) -> FilterId {
        self.install(FilterKind::Block, None).await
    }

    pub async fn create_pending_transaction_filter(&self) -> FilterId {
        self.install(FilterKind::PendingTransaction, None).await
    }

    pub async fn get(&self, id: FilterId) -> Option<Filter> {
        self.filters.read().await.get(&id).cloned()
    }

    /// Uninstalls a filter, returning whether it existed.
    pub async fn remove(&self, id: FilterId) -> bool {
        self.filters.write().await.remove(&id).is_some()
    }

    /// Runs `f` on the filter under a single write guard after checking its
    /// kind.
    async fn with_filter<T>(
        &self,
        id: FilterId,
        expected: FilterKind,
        f: impl FnOnce(&mut Filter) -> T,
    ) -> Result<T, FilterError> {
        let mut filters = self.filters.write().await;
        let filter = filters.get_mut(&id).ok_or(FilterError::NotFound(id))?;
        if filter.kind != expected {
            return Err(FilterError::InvalidFilterType { id, expected });
        }

        Ok(f(filter))
    }

    // polling

    pub async fn get_changes(&self, id: FilterId) -> Result<Vec<Log>, FilterError> {
        self.with_filter(id, FilterKind::Log, |filter| {
            filter.last_accessed = Instant::now();
            std::mem::take(&mut filter.logs)
        })
        .await
    }

    pub async fn get_block_changes(&self, id: FilterId) -> Result<Vec<B256>, FilterError> {
        self.with_filter(id, FilterKind::Block, |filter| {
            filter.last_accessed = Instant::now();
            std::mem::take(&mut filter.blocks)
        })
        .await
    }

    pub async fn get_pending_transaction_changes(
        &self,
        id: FilterId,
    ) -> Result<Vec<B256>, FilterError> {
        self.with_filter(id, FilterKind::PendingTransaction, |filter| {
            filter.last_accessed = Instant::now();
            std::mem::take(&mut filter.transactions)
        })
        .await
    }

    // delivery

    pub async fn add_log(&self, id: FilterId, log: Log) -> Result<(), FilterError> {
        self.with_filter(id, FilterKind::Log, |filter| filter.logs.push(log))
            .await
    }

    pub async fn add_block(&self, id: FilterId, block_hash: B256) -> Result<(), FilterError> {
        self.with_filter(id, FilterKind::Block, |filter| filter.blocks.push(block_hash))
            .await
    }

    pub async fn add_pending_transaction(
        &self,
        id: FilterId,
        tx_hash: B256,
    ) -> Result<(), FilterError> {
        self.with_filter(id, FilterKind::PendingTransaction, |filter| {
            filter.transactions.push(tx_hash)
        })
        .await
    }

    /// Buffers `block_hash` on every block filter.
    pub async fn notify_block(&self, block_hash: B256) {
        self.filters
            .write()
            .await
            .values_mut()
            .filter(|filter| filter.kind == FilterKind::Block)
            .for_each(|filter| filter.blocks.push(block_hash));
    }

    /// Buffers `tx_hash` on every pending transaction filter.
    pub async fn notify_pending_transaction(&self, tx_hash: B256) {
        self.filters
            .write()
            .await
            .values_mut()
            .filter(|filter| filter.kind == FilterKind::PendingTransaction)
            .for_each(|filter| filter.transactions.push(tx_hash));
    }

    pub async fn get_all_filters(&self) -> BTreeMap<FilterId, Filter> {
        self.filters.read().await.clone()
    }

    /// Removes filters that have not been polled for `expiration` (the
    /// registry default when `None`), returning how many were removed.
    pub async fn cleanup_expired_filters(&self, expiration: Option<Duration>) -> usize {
        let expiration = expiration.unwrap_or(self.expiration);
        let mut filters = self.filters.write().await;

        let before = filters.len();
        filters.retain(|_, filter| filter.last_accessed.elapsed() < expiration);
        let removed = before - filters.len();

        if removed > 0 {
            debug!(target: "devnet::filters", removed, "expired filters removed");
        }

        removed
    }

    pub async fn deep_copy(&self) -> Self {
        let filters = self.filters.read().await;
        let next_id = self.next_id.load(Ordering::SeqCst);

        Self::from_cells(
            Arc::new(RwLock::new(filters.clone())),
            Arc::new(AtomicU64::new(next_id)),
            self.expiration,
        )
    }
}
