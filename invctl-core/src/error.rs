//! Structured error types for invctl-core.
//!
//! Uses `thiserror` for better API surface and error composition.
//! The binary crate (invctl-cli) can still use `anyhow` for convenience,
//! but library consumers get structured, composable errors.

use thiserror::Error;

/// Main error type for invctl-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration is missing or inconsistent
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// DATABASE_URL (or assembled PG* parts) could not be parsed
    #[error("Invalid connection string '{value}': {reason}")]
    InvalidConnectionString { value: String, reason: String },

    /// Order status outside pending/delivered/cancelled
    #[error("Invalid order status '{value}'")]
    InvalidStatus { value: String },
}

/// Result type alias for invctl-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create an invalid connection string error
    pub fn invalid_connection_string(
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConnectionString {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::config("PGDATABASE not set");
        assert_eq!(err.to_string(), "Configuration error: PGDATABASE not set");

        let err = CoreError::invalid_connection_string("mysql://x", "unsupported scheme");
        assert!(err.to_string().contains("mysql://x"));
        assert!(err.to_string().contains("unsupported scheme"));
    }
}
