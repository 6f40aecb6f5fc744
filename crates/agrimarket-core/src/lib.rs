pub mod analytics;
pub mod config;
pub mod error;
pub mod farmer;
pub mod id;
pub mod product;
pub mod repository;
pub mod store;
pub mod validation;

// Re-export common types
pub use error::{MarketError, Result};
pub use repository::MarketRepository;
pub use store::{KeyValueStore, MemoryStore, StoreKey};
