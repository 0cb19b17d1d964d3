pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use catalog::{Catalog, CatalogSnapshot, LoadOutcome, PersistOutcome, SnapshotStore};
pub use config::CatalogConfig;
pub use error::{FactoscopeError, Result};
pub use registry::{CatalogRegistry, global_registry};
