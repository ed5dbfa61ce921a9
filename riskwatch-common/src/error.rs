//! Shared failure taxonomy
//!
//! One error type for everything that crosses the crate boundary:
//! persistence, the filesystem work around it, configuration, and the
//! lookups and validations the web layer maps onto HTTP statuses.
//! Inference and geolocation failures are deliberately absent here: the
//! inference client carries its own error enum in the web crate, and
//! geolocation never fails, it degrades to a sentinel country.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// SQLite query or pool failure
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Filesystem failure, typically while preparing the data directory
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable configuration or startup wiring
    #[error("configuration: {0}")]
    Config(String),

    /// Lookup missed: unknown domain slug, expired session, absent row
    #[error("missing: {0}")]
    Missing(String),

    /// Caller-supplied data rejected before any external call is made
    #[error("rejected: {0}")]
    Rejected(String),

    /// A stored row that no longer parses back into its model
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = Error::Rejected("Email already registered".to_string());
        assert_eq!(err.to_string(), "rejected: Email already registered");

        let err = Error::Missing("session".to_string());
        assert_eq!(err.to_string(), "missing: session");
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
