/// Core Config
pub mod config;
pub use crate::config::*;

/// Programmatic Overrides
pub mod overrides;
pub use overrides::*;

/// Service Config Types
pub mod types;
pub use types::*;

/// Config Errors
pub mod errors;
pub use errors::*;
