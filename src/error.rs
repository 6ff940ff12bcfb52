//! Centralized error handling for Inkpad
//!
//! This module provides a unified error type that covers every failure the
//! editor can surface: password validation and verification, storage reads
//! and writes, remote uploads, and configuration I/O.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // User-facing Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Invalid user input (short password, mismatch, empty filename)
    Validation(String),

    /// Password did not verify against the stored hash
    Auth(String),

    /// Document content was requested while the editor is locked
    Locked,

    // ─────────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Reading from the active editing surface failed
    StorageRead(String),

    /// Writing a key to the persistent store failed
    PersistenceWrite {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Remote Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Network or HTTP failure while uploading to a gist/paste service
    RemoteService(String),

    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration or stored data (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic application error with a message
    Application(String),
}

impl Error {
    /// Whether this error should be shown as a transient warning rather than
    /// a blocking modal.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::PersistenceWrite { .. } | Error::StorageRead(_))
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Error::RemoteService(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::Auth(msg) => write!(f, "{}", msg),
            Error::Locked => write!(f, "Editor is locked"),

            Error::StorageRead(msg) => write!(f, "Could not read editor content: {}", msg),
            Error::PersistenceWrite { key, source } => {
                write!(f, "Failed to save '{}': {}", key, source)
            }

            Error::RemoteService(msg) => write!(f, "Upload failed: {}", msg),

            Error::Io(err) => write!(f, "I/O error: {}", err),

            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid data format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::PersistenceWrite { source, .. } => Some(source.as_ref()),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Validation(_)
            | Error::Auth(_)
            | Error::Locked
            | Error::StorageRead(_)
            | Error::RemoteService(_)
            | Error::ConfigDirNotFound
            | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::Validation("Passwords do not match".to_string());
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_persistence_write_display_names_key() {
        let err = Error::PersistenceWrite {
            key: "editorData".to_string(),
            source: Box::new(io::Error::new(io::ErrorKind::Other, "disk full")),
        };
        let msg = err.to_string();
        assert!(msg.contains("editorData"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_display_config_dir_not_found() {
        let err = Error::ConfigDirNotFound;
        assert_eq!(format!("{}", err), "Configuration directory not found");
    }

    #[test]
    fn test_error_source() {
        use std::error::Error as StdError;
        let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "not found"));
        assert!(err.source().is_some());

        assert!(Error::Locked.source().is_none());
        assert!(Error::Auth("wrong".to_string()).source().is_none());
    }

    #[test]
    fn test_warning_classification() {
        assert!(Error::StorageRead("x".to_string()).is_warning());
        assert!(!Error::Auth("x".to_string()).is_warning());
        assert!(!Error::RemoteService("x".to_string()).is_warning());
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let ok: Result<i32> = Ok(42);
        assert_eq!(ok.unwrap_or_warn_default(0, "test context"), 42);

        let err: Result<i32> = Err(Error::Application("test".to_string()));
        assert_eq!(err.unwrap_or_warn_default(0, "test context"), 0);
    }
}
