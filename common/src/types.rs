use std::fmt::Display;
use std::str::FromStr;

use serde::{de::Error, Deserialize, Serialize};

use crate::errors::HexError;
use crate::utils::{parse_hex_quantity, u64_to_hex_string};

/// Defines a handle backed by a `u64` counter that renders as a `0x` hex
/// quantity. Ordering follows the counter, not the rendered string.
macro_rules! quantity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(counter: u64) -> Self {
                Self(counter)
            }

            pub const fn counter(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(counter: u64) -> Self {
                Self(counter)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", u64_to_hex_string(self.0))
            }
        }

        impl FromStr for $name {
            type Err = HexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex_quantity(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let id: String = serde::Deserialize::deserialize(deserializer)?;
                id.parse().map_err(D::Error::custom)
            }
        }
    };
}

quantity_id!(
    /// Identifier of a registered state snapshot, e.g. `0x1`, `0x10`.
    SnapshotId
);

quantity_id!(
    /// Identifier of an installed event filter.
    FilterId
);
