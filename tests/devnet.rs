use std::io::Write;
use std::sync::Arc;

use alloy::primitives::{address, Address, U256};
use tracing_test::traced_test;

use devnet::prelude::*;
use devnet::state::AccountRecord;

const DEPLOYER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

#[tokio::test]
async fn test_node_from_config_file() -> eyre::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        r#"
filter_expiration_secs = 60

[block_params]
min_gas_price = 1000000000
block_timestamp_interval = 12

[impersonation]
account = "{DEPLOYER:#x}"
"#
    )?;

    let overrides = ConfigOverrides {
        auto_impersonate: Some(true),
        ..Default::default()
    };
    let config = Config::from_file(file.path(), &overrides)?;
    let node = NodeBuilder::new().config(config).build().await?;

    assert_eq!(
        node.block_params().get_min_gas_price().await,
        Some(1_000_000_000)
    );
    assert_eq!(node.block_params().get_block_timestamp_interval().await, Some(12));
    assert_eq!(
        node.impersonation().get_impersonated_account().await,
        Some(DEPLOYER)
    );
    assert!(node.impersonation().get_auto_impersonate().await);
    assert_eq!(node.config.filter_expiration_secs, 60);

    Ok(())
}

#[tokio::test]
async fn test_mine_revert_cycle() -> eyre::Result<()> {
    let store = MemoryStore::new();
    let node = NodeBuilder::new()
        .store(Arc::new(store.clone()))
        .build()
        .await?;

    store
        .put_account(DEPLOYER, AccountRecord::with_balance(U256::from(10)))
        .await;
    let before = node.snapshots().take_snapshot().await?;

    // a block is mined with the pending overrides, which are then consumed
    node.block_params().set_next_block_timestamp(Some(2_000)).await;
    let overrides = node.block_params().take_next_block_overrides().await;
    assert_eq!(overrides.timestamp, Some(2_000));
    store
        .put_account(DEPLOYER, AccountRecord::with_balance(U256::from(3)))
        .await;
    node.filters().notify_block(Default::default()).await;

    node.snapshots().revert_to_snapshot(before).await?;

    assert_eq!(
        store.get_account(&DEPLOYER).await.map(|account| account.balance),
        Some(U256::from(10))
    );
    assert!(node.snapshots().get_snapshot(before).await.is_none());
    assert!(node.block_params().next_block_overrides().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_snapshot_id_parsing() {
    let id: SnapshotId = "0x1".parse().unwrap();
    assert_eq!(id.counter(), 1);
    assert!("0x01".parse::<SnapshotId>().is_err());
    assert!("1".parse::<SnapshotId>().is_err());
}

#[tokio::test]
#[traced_test]
async fn test_fork_is_logged() -> eyre::Result<()> {
    let node = NodeBuilder::new().build().await?;
    node.deep_copy().await?;

    assert!(logs_contain("node state copied"));
    Ok(())
}
