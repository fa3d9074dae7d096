//! PostgreSQL access layer for invctl.
//!
//! Owns the sqlx connection pool, the schema (tables plus the named
//! performance indexes), the store operations the CLI drives, and the
//! maintenance/statistics queries.

pub mod error;
pub mod pool;
pub mod schema;
pub mod stats;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{connect, test_connection};
pub use sqlx::PgPool;
