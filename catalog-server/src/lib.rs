//! catalog-server: product catalog HTTP API
//!
//! Categories, products and tags over Postgres (or an in-memory store),
//! with products and tags linked through a product_tag join table.

pub mod db;
pub mod http;
pub mod models;
pub mod seed;

pub use db::{CatalogStore, DbError, MemoryStore, PgStore};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
