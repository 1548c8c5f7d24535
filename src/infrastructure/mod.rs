//! Infrastructure layer: storage implementations
//!
//! This layer implements the storage boundary traits consumed by the
//! application services.

pub mod error;
pub mod memory;
pub mod toml_store;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use memory::InMemoryNodeStore;
pub use toml_store::TomlNodeStore;
pub use traits::{NodeStore, StoreError, StoreResult};
