use alloy::primitives::Address;
use figment::{
    providers::Serialized,
    value::{Dict, Value},
};
use serde::{Deserialize, Serialize};

/// Highest-precedence configuration layer, typically filled from command line
/// flags by the embedding process.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub next_block_timestamp: Option<u64>,
    pub next_block_gas_limit: Option<u64>,
    pub next_block_base_fee_per_gas: Option<u128>,
    pub min_gas_price: Option<u128>,
    pub block_timestamp_interval: Option<u64>,
    pub impersonate: Option<Address>,
    pub auto_impersonate: Option<bool>,
    pub filter_expiration_secs: Option<u64>,
}

impl ConfigOverrides {
    pub fn as_provider(&self) -> Serialized<Dict> {
        let mut block_params = Dict::new();

        if let Some(timestamp) = self.next_block_timestamp {
            block_params.insert("next_block_timestamp".into(), Value::from(timestamp));
        }

        if let Some(gas_limit) = self.next_block_gas_limit {
            block_params.insert("next_block_gas_limit".into(), Value::from(gas_limit));
        }

        if let Some(base_fee) = self.next_block_base_fee_per_gas {
            block_params.insert(
                "next_block_base_fee_per_gas".into(),
                Value::from(base_fee.to_string()),
            );
        }

        // figment has no u128; the config types parse these back from strings
        if let Some(price) = self.min_gas_price {
            block_params.insert("min_gas_price".into(), Value::from(price.to_string()));
        }

        if let Some(interval) = self.block_timestamp_interval {
            block_params.insert("block_timestamp_interval".into(), Value::from(interval));
        }

        let mut impersonation = Dict::new();

        if let Some(account) = &self.impersonate {
            impersonation.insert("account".into(), Value::from(format!("{account:#x}")));
        }

        if let Some(auto) = self.auto_impersonate {
            impersonation.insert("auto_impersonate".into(), Value::from(auto));
        }

        let mut user_dict = Dict::new();

        if !block_params.is_empty() {
            user_dict.insert("block_params".into(), Value::from(block_params));
        }

        if !impersonation.is_empty() {
            user_dict.insert("impersonation".into(), Value::from(impersonation));
        }

        if let Some(secs) = self.filter_expiration_secs {
            user_dict.insert("filter_expiration_secs".into(), Value::from(secs));
        }

        Serialized::defaults(user_dict)
    }
}
