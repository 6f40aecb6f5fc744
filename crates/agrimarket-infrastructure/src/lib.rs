pub mod config_service;
pub mod dto;
pub mod enrichment;
pub mod json_file_store;
pub mod paths;

// Re-export commonly used types
pub use config_service::{ConfigService, resolve_store_dir};
pub use enrichment::{DeviceProbe, Enricher, PostalLocation};
pub use json_file_store::JsonFileStore;
pub use paths::AgrimarketPaths;
