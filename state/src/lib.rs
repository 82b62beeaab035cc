pub mod errors;
pub mod store;
pub mod types;

pub use store::{memory::MemoryStore, mock::MockStore, StateStore};
