use alloy::primitives::Address;
use eyre::Result;
use serde::de::{self, Unexpected, Visitor};

use crate::errors::HexError;

/// Decodes a hex byte string, with or without the `0x` prefix.
///
/// Odd-length payloads are left-padded with a single `0` nibble before being
/// split into byte pairs, so `0xabc` decodes to `[0x0a, 0xbc]`.
pub fn hex_str_to_bytes(s: &str) -> Result<Vec<u8>> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    if stripped.len() % 2 == 1 {
        Ok(hex::decode(format!("0{stripped}"))?)
    } else {
        Ok(hex::decode(stripped)?)
    }
}

pub fn hex_str_to_address(s: &str) -> Result<Address> {
    let bytes = hex_str_to_bytes(s)?;
    if bytes.len() != 20 {
        return Err(HexError::InvalidLength {
            expected: 20,
            actual: bytes.len(),
        }
        .into());
    }

    Ok(Address::from_slice(&bytes))
}

pub fn u64_to_hex_string(val: u64) -> String {
    format!("0x{val:x}")
}

/// Parses a canonical hex quantity: `0x` prefix, lowercase or uppercase
/// digits, and no leading zeros (`0x0` is the only quantity allowed to start
/// with `0`).
pub fn parse_hex_quantity(s: &str) -> Result<u64, HexError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| HexError::MissingPrefix(s.to_string()))?;

    if digits.is_empty() {
        return Err(HexError::Empty);
    }

    if digits.len() > 1 && digits.starts_with('0') {
        return Err(HexError::LeadingZeros(s.to_string()));
    }

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HexError::InvalidDigits(s.to_string()));
    }

    u64::from_str_radix(digits, 16).map_err(|_| HexError::Overflow(s.to_string()))
}

pub fn address_opt_deserialize<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let address: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    address
        .map(|address| hex_str_to_address(&address).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn address_opt_serialize<S>(address: &Option<Address>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match address {
        Some(address) => s.serialize_some(&format!("{address:#x}")),
        None => s.serialize_none(),
    }
}

/// Deserializes an optional `u128` from an integer, a decimal string or a
/// `0x` hex string. Config providers such as figment have no native `u128`.
pub fn u128_opt_deserialize<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<U128Quantity> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.map(|quantity| quantity.0))
}

/// Serializes an optional `u128` as a decimal string.
pub fn u128_opt_serialize<S>(value: &Option<u128>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(value) => s.serialize_some(&value.to_string()),
        None => s.serialize_none(),
    }
}

pub fn parse_u128_str(s: &str) -> Option<u128> {
    match s.strip_prefix("0x") {
        Some(digits) => u128::from_str_radix(digits, 16).ok(),
        None => s.parse().ok(),
    }
}

struct U128Quantity(u128);

impl<'de> serde::Deserialize<'de> for U128Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer
            .deserialize_any(U128QuantityVisitor)
            .map(U128Quantity)
    }
}

struct U128QuantityVisitor;

impl<'de> Visitor<'de> for U128QuantityVisitor {
    type Value = u128;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an unsigned integer, a decimal string or a 0x-prefixed hex string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
        Ok(v.into())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
        u128::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
        parse_u128_str(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}
