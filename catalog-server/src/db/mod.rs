//! Database layer - connection pool, schema, stores and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - Record graphs are read with JOINs - no N+1 queries
//! - Every write that touches more than one table is one transaction
//! - Association sets are replaced by diff, not delete-all-then-insert

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pg;
pub mod pool;
pub mod records;
pub mod repos;
pub mod store;

pub use error::DbError;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use pool::{create_pool, create_pool_with_options};
pub use records::{Category, CategoryRef, Product, ProductSummary, Tag, TagRef};
pub use store::CatalogStore;
