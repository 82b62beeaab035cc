use std::time::Duration;

use alloy::primitives::{address, B256};
use alloy::rpc::types::{Filter as LogFilter, Log};

use common::types::FilterId;
use node::errors::FilterError;
use node::filters::{FilterKind, FilterRegistry};

fn log_with_index(index: u64) -> Log {
    Log {
        log_index: Some(index),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_filter_ids_are_sequential_hex() {
    let filters = FilterRegistry::default();

    let log = filters.create_log_filter(None).await;
    let block = filters.create_block_filter().await;
    let pending = filters.create_pending_transaction_filter().await;

    assert_eq!(log.to_string(), "0x1");
    assert_eq!(block.to_string(), "0x2");
    assert_eq!(pending.to_string(), "0x3");

    assert_eq!(filters.get(block).await.unwrap().kind, FilterKind::Block);
}

#[tokio::test]
async fn test_log_filter_keeps_criteria() {
    let filters = FilterRegistry::default();
    let criteria = LogFilter::new().address(address!("1234567890123456789012345678901234567890"));

    let id = filters.create_log_filter(Some(criteria.clone())).await;

    assert_eq!(filters.get(id).await.unwrap().criteria, Some(criteria));
}

#[tokio::test]
async fn test_log_changes_drain_on_poll() {
    let filters = FilterRegistry::default();
    let id = filters.create_log_filter(None).await;

    filters.add_log(id, log_with_index(0)).await.unwrap();
    filters.add_log(id, log_with_index(1)).await.unwrap();

    let changes = filters.get_changes(id).await.unwrap();
    assert_eq!(changes, vec![log_with_index(0), log_with_index(1)]);
    assert!(filters.get_changes(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notify_reaches_matching_filters_only() {
    let filters = FilterRegistry::default();
    let first = filters.create_block_filter().await;
    let second = filters.create_block_filter().await;
    let pending = filters.create_pending_transaction_filter().await;
    let log = filters.create_log_filter(None).await;

    let block_hash = B256::with_last_byte(0xbb);
    let tx_hash = B256::with_last_byte(0xcc);
    filters.notify_block(block_hash).await;
    filters.notify_pending_transaction(tx_hash).await;

    assert_eq!(filters.get_block_changes(first).await.unwrap(), vec![block_hash]);
    assert_eq!(filters.get_block_changes(second).await.unwrap(), vec![block_hash]);
    assert_eq!(
        filters.get_pending_transaction_changes(pending).await.unwrap(),
        vec![tx_hash]
    );
    assert!(filters.get_changes(log).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_direct_delivery() {
    let filters = FilterRegistry::default();
    let block = filters.create_block_filter().await;
    let pending = filters.create_pending_transaction_filter().await;

    filters.add_block(block, B256::with_last_byte(1)).await.unwrap();
    filters
        .add_pending_transaction(pending, B256::with_last_byte(2))
        .await
        .unwrap();

    assert_eq!(
        filters.get_block_changes(block).await.unwrap(),
        vec![B256::with_last_byte(1)]
    );
    assert_eq!(
        filters.get_pending_transaction_changes(pending).await.unwrap(),
        vec![B256::with_last_byte(2)]
    );
}

#[tokio::test]
async fn test_wrong_kind_is_rejected() {
    let filters = FilterRegistry::default();
    let block = filters.create_block_filter().await;

    let err = filters.get_changes(block).await.unwrap_err();
    assert!(matches!(
        err,
        FilterError::InvalidFilterType { id, expected: FilterKind::Log } if id == block
    ));

    let err = filters.add_log(block, Log::default()).await.unwrap_err();
    assert!(matches!(err, FilterError::InvalidFilterType { .. }));
}

#[tokio::test]
async fn test_unknown_filter() {
    let filters = FilterRegistry::default();
    let missing = FilterId::new(0x42);

    let err = filters.get_block_changes(missing).await.unwrap_err();
    assert!(matches!(err, FilterError::NotFound(id) if id == missing));
    assert!(err.to_string().contains("0x42"));
    assert!(!filters.remove(missing).await);
}

#[tokio::test]
async fn test_remove() {
    let filters = FilterRegistry::default();
    let id = filters.create_block_filter().await;

    assert!(filters.remove(id).await);
    assert!(filters.get(id).await.is_none());
    assert!(!filters.remove(id).await);

    // ids are never reused
    assert_eq!(filters.create_block_filter().await, FilterId::new(2));
}

#[tokio::test]
async fn test_cleanup_expired_filters() {
    let filters = FilterRegistry::new(Duration::ZERO);
    filters.create_block_filter().await;
    filters.create_log_filter(None).await;

    assert_eq!(
        filters
            .cleanup_expired_filters(Some(Duration::from_secs(3600)))
            .await,
        0
    );
    assert_eq!(filters.cleanup_expired_filters(None).await, 2);
    assert!(filters.get_all_filters().await.is_empty());
}

#[tokio::test]
async fn test_polling_refreshes_last_access() {
    let filters = FilterRegistry::default();
    let id = filters.create_block_filter().await;
    let installed = filters.get(id).await.unwrap().last_accessed;

    tokio::time::sleep(Duration::from_millis(5)).await;
    filters.get_block_changes(id).await.unwrap();

    assert!(filters.get(id).await.unwrap().last_accessed > installed);
}

#[tokio::test]
async fn test_deep_copy_is_independent() {
    let filters = FilterRegistry::default();
    let id = filters.create_block_filter().await;
    filters.notify_block(B256::with_last_byte(1)).await;

    let copy = filters.deep_copy().await;

    assert_eq!(
        filters.get_block_changes(id).await.unwrap(),
        vec![B256::with_last_byte(1)]
    );
    // draining the original leaves the copy's buffer alone
    assert_eq!(
        copy.get_block_changes(id).await.unwrap(),
        vec![B256::with_last_byte(1)]
    );

    assert_eq!(copy.create_block_filter().await, FilterId::new(2));
    assert_eq!(filters.get_all_filters().await.len(), 1);
    assert_eq!(copy.get_all_filters().await.len(), 2);
}
