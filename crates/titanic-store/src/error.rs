//! Error types for passenger storage backends.

use std::path::PathBuf;

use thiserror::Error;
use titanic_model::{Field, FieldKind, ModelError};

/// Errors returned by every [`PassengerStore`](crate::PassengerStore) operation.
///
/// None of these are retried internally; each one terminates the request
/// that triggered it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record carries the requested identifier.
    #[error("passenger not found with ID {id}")]
    NotFound { id: i64 },

    /// A requested attribute is not one of the canonical fields.
    #[error("unknown attribute: {name}")]
    UnknownAttribute { name: String },

    /// A projection was requested without attributes.
    #[error("attributes cannot be empty")]
    EmptyProjection,

    /// A stored value cannot be converted to its field's declared type.
    #[error("cannot convert {value:?} to {expected} for {field}")]
    TypeConversion {
        field: Field,
        value: String,
        expected: FieldKind,
    },

    /// A flat-file row is malformed (wrong field count or unparseable number).
    #[error("malformed row at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// The underlying file or database failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A histogram was requested over zero fare values.
    #[error("no fare values to build a histogram from")]
    EmptyDataset,
}

impl StoreError {
    /// True for errors caused by the request itself rather than the data or
    /// the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::UnknownAttribute { .. } | Self::EmptyProjection
        )
    }
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownAttribute { name } => Self::UnknownAttribute { name },
            ModelError::EmptyProjection => Self::EmptyProjection,
            ModelError::TypeConversion {
                field,
                value,
                expected,
            } => Self::TypeConversion {
                field,
                value,
                expected,
            },
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(BackendError::Sqlite(err))
    }
}

/// Connectivity, I/O and query failures, wrapping their cause.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "passenger not found with ID 42");

        let err = StoreError::Parse {
            line: 3,
            message: "expected 12 fields, found 11".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed row at line 3: expected 12 fields, found 11"
        );
    }

    #[test]
    fn test_error_from_model() {
        let err: StoreError = ModelError::UnknownAttribute {
            name: "Deck".to_string(),
        }
        .into();
        assert!(matches!(err, StoreError::UnknownAttribute { ref name } if name == "Deck"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_error_from_sqlite() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(
            err,
            StoreError::Backend(BackendError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
        ));
        assert!(!err.is_client_error());
    }
}
