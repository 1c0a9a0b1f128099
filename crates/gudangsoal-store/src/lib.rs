//! gudangsoal-store — question content stores.
//!
//! Implements the `ContentStore` trait for TOML question banks and
//! PostgREST endpoints, plus a mock store for tests.

pub mod bank;
pub mod config;
pub mod mock;
pub mod postgrest;

pub use config::{create_store, load_config, load_config_from, GudangsoalConfig, StoreConfig};
pub use gudangsoal_core::error::StoreError;
