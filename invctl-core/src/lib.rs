//! Core library for invctl - inventory database operations tooling
//!
//! Holds the pieces shared by the db layer and the CLI:
//! - Domain models (products, suppliers, purchase orders)
//! - Connection and pool configuration resolved from the environment
//! - Structured error types

pub mod config;
pub mod error;
pub mod models;

pub use config::{ConnectionSettings, InvctlConfig, PoolSettings};
pub use error::{CoreError, Result};
