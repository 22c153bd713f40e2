//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the persistence backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a valid store document.
    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store file was written by an incompatible format version.
    #[error("unsupported store format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A scripted failure from the mock store.
    #[error("injected failure: {0}")]
    Injected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = StoreError::UnsupportedVersion {
            found: 4,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "unsupported store format version 4 (expected 1)"
        );
        assert_eq!(
            StoreError::Injected("save rejected".into()).to_string(),
            "injected failure: save rejected"
        );
    }
}
