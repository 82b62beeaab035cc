use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::RwLock;
use tracing::debug;

use config::ImpersonationConfig;

/// Impersonation session consulted by the transaction validator.
#[derive(Debug, Clone, Default)]
pub struct Impersonation {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Inner {
    account: Option<Address>,
    auto_impersonate: bool,
}

impl Impersonation {
    pub fn new(config: &ImpersonationConfig) -> Self {
        Self::from_cells(Arc::new(RwLock::new(Inner {
            account: config.account,
            auto_impersonate: config.auto_impersonate,
        })))
    }

    fn from_cells(inner: Arc<RwLock<Inner>>) -> Self {
        Self { inner }
    }

    pub async fn get_impersonated_account(&self) -> Option<Address> {
        self.inner.read().await.account
    }

    /// Starts impersonating `account`, or stops when `None`.
    pub async fn set_impersonated_account(&self, account: Option<Address>) {
        self.inner.write().await.account = account;
        match account {
            Some(account) => debug!(target: "devnet::impersonation", %account, "impersonating"),
            None => debug!(target: "devnet::impersonation", "impersonation cleared"),
        }
    }

    pub async fn get_auto_impersonate(&self) -> bool {
        self.inner.read().await.auto_impersonate
    }

    pub async fn set_auto_impersonate(&self, enabled: bool) {
        self.inner.write().await.auto_impersonate = enabled;
        debug!(target: "devnet::impersonation", enabled, "auto impersonation");
    }

    /// Whether a transaction from `sender` may skip signature checks.
    pub async fn is_impersonated(&self, sender: &Address) -> bool {
        let inner = self.inner.read().await;
        inner.auto_impersonate || inner.account.as_ref() == Some(sender)
    }

    /// Both fields are read under one guard.
    pub async fn deep_copy(&self) -> Self {
        let inner = *self.inner.read().await;
        Self::from_cells(Arc::new(RwLock::new(inner)))
    }
}
