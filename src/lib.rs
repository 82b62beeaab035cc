#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]
#![deny(rustdoc::broken_intra_doc_links)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! # State management core of a local Ethereum development node.
//!
//! devnet holds the mutable state a development chain keeps next to its ledger:
//! state snapshots that can be reverted, overrides for the next mined block,
//! account impersonation and installed event filters. Every service can be
//! deep-copied to fork the node.
//!
//! ## Quickstart: `prelude`
//!
//! The prelude imports the node, its services and their errors.
//!
//! ```no_run
//! # #[allow(unused)]
//! use devnet::prelude::*;
//! ```
//!
//! ## Breakdown of exported devnet modules
//!
//! ### `node`
//!
//! `NodeBuilder` configures and builds a `DevNode`, which owns the ledger store
//! and one instance of every service.
//!
//! ### `services`
//!
//! `SnapshotManager`, `BlockParams`, `Impersonation` and `FilterRegistry`. Each
//! is a cheap handle over shared state; clones observe the same values, while
//! `deep_copy` produces an independent instance.
//!
//! ### `state`
//!
//! The `StateStore` trait the snapshot service drives, an in-memory
//! implementation and a fault-injecting mock for tests.
//!
//! ### `config`
//!
//! Layered node configuration loaded from a TOML file and `DEVNET_` prefixed
//! environment variables.
//!
//! ### `errors`
//!
//! Errors used across devnet.

pub mod node {
    pub use ::node::{DevNode, NodeBuilder};
}

pub mod services {
    pub use ::node::block_params::{BlockParams, NextBlockOverrides};
    pub use ::node::filters::{Filter, FilterKind, FilterRegistry};
    pub use ::node::impersonation::Impersonation;
    pub use ::node::snapshot::{Snapshot, SnapshotManager};
}

pub mod state {
    pub use ::state::store::mock::Operation;
    pub use ::state::types::*;
    pub use ::state::{MemoryStore, MockStore, StateStore};
}

pub mod config {
    pub use ::config::*;
}

pub mod types {
    pub use ::common::types::{FilterId, SnapshotId};
}

pub mod errors {
    pub use ::common::errors::*;
    pub use ::config::ConfigError;
    pub use ::node::errors::*;
    pub use ::state::errors::*;
}

pub mod prelude {
    pub use crate::config::{Config, ConfigOverrides};
    pub use crate::errors::*;
    pub use crate::node::*;
    pub use crate::services::*;
    pub use crate::state::{MemoryStore, StateStore};
    pub use crate::types::*;
}
