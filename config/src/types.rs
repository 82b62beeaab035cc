use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use common::utils::{
    address_opt_deserialize, address_opt_serialize, u128_opt_deserialize, u128_opt_serialize,
};

/// Initial block-parameter overrides.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BlockParamsConfig {
    pub next_block_timestamp: Option<u64>,
    pub next_block_gas_limit: Option<u64>,
    #[serde(
        deserialize_with = "u128_opt_deserialize",
        serialize_with = "u128_opt_serialize"
    )]
    pub next_block_base_fee_per_gas: Option<u128>,
    #[serde(
        deserialize_with = "u128_opt_deserialize",
        serialize_with = "u128_opt_serialize"
    )]
    pub min_gas_price: Option<u128>,
    pub block_timestamp_interval: Option<u64>,
}

/// Initial impersonation session.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ImpersonationConfig {
    #[serde(
        deserialize_with = "address_opt_deserialize",
        serialize_with = "address_opt_serialize"
    )]
    pub account: Option<Address>,
    pub auto_impersonate: bool,
}
