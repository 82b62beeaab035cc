use alloy::primitives::B256;
use eyre::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no open checkpoint")]
    NoCheckpoint,
    #[error("unknown state root: {0}")]
    UnknownStateRoot(B256),
    #[error("{0:#}")]
    Other(Report),
}

impl From<Report> for StoreError {
    fn from(report: Report) -> Self {
        StoreError::Other(report)
    }
}
