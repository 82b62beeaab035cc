pub mod block_params;
pub mod errors;
pub mod filters;
pub mod impersonation;
pub mod snapshot;

mod builder;
pub use crate::builder::*;

mod node;
pub use crate::node::*;
