//! Errors returned by the storage and color-scheme seams.
//!
//! None of these escape [`ThemeStore`](crate::ThemeStore)'s core operations:
//! the store logs them and falls back to a default.

use std::path::PathBuf;

use thiserror::Error;

/// A string that is not one of `"light"`, `"dark"` or `"system"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid theme preference '{value}', expected light, dark or system")]
pub struct ParsePreferenceError {
    pub value: String,
}

/// Failure reading or writing the persisted preference.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt storage file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing store is disabled or otherwise cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure querying the OS color scheme.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("color scheme signal unavailable")]
    Unavailable,

    #[error("color scheme detection failed: {0}")]
    Detector(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParsePreferenceError {
            value: "sepia".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sepia"));
        assert!(msg.contains("light, dark or system"));
    }

    #[test]
    fn test_storage_io_error_display() {
        let err = StorageError::Io {
            path: PathBuf::from("/tmp/prefs.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/prefs.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_signal_error_display() {
        assert_eq!(
            SignalError::Detector("no portal".to_string()).to_string(),
            "color scheme detection failed: no portal"
        );
        assert_eq!(
            SignalError::Unavailable.to_string(),
            "color scheme signal unavailable"
        );
    }
}
