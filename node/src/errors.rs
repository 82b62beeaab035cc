use alloy::primitives::B256;
use thiserror::Error;

use common::types::{FilterId, SnapshotId};
use state::errors::StoreError;

use crate::filters::FilterKind;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot {0} not found")]
    NotFound(SnapshotId),

    #[error("failed to restore state root {state_root}: {source}")]
    StateRootRestoration {
        state_root: B256,
        #[source]
        source: StoreError,
    },

    #[error("{message}")]
    StorageOperation {
        message: String,
        #[source]
        source: StoreError,
    },
}

impl SnapshotError {
    pub(crate) fn storage(id: SnapshotId, operation: &str, source: StoreError) -> Self {
        SnapshotError::StorageOperation {
            message: format!("Failed to take snapshot {id}: {operation} failed: {source}"),
            source,
        }
    }

    /// Whether the caller can retry the same request once the condition
    /// clears. Storage failures point at a broken store instead.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SnapshotError::NotFound(_) | SnapshotError::StateRootRestoration { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("filter {0} not found")]
    NotFound(FilterId),

    #[error("filter {id} is not a {expected} filter")]
    InvalidFilterType { id: FilterId, expected: FilterKind },
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("state store error: {0}")]
    Store(#[from] StoreError),
}
