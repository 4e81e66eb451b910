//! # leadgen-store
//!
//! Storage backends for leadgen.
//!
//! - **PgStore** - Postgres via sqlx, with embedded migrations
//! - **MemoryStore** - process-local, for tests and local runs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leadgen_store::{PgStore, StoreConfig};
//!
//! let store = PgStore::connect(&StoreConfig::from_env()?).await?;
//! store.migrate().await?;
//! ```

pub mod config;
pub mod memory;
pub mod postgres;

// Re-exports
pub use config::StoreConfig;
pub use memory::MemoryStore;
pub use postgres::PgStore;
