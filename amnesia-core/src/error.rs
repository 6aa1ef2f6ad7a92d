//! Error types and result types for document store operations.
//!
//! Errors fall into three classes:
//!
//! - **Usage errors** - the caller handed the store something it cannot accept
//!   (a non-record value, a non-string `id`, an unusable collection name).
//! - **State errors** - the request is well formed but does not fit the stored
//!   data (updating a document that does not exist, a document without `id`).
//! - **Medium errors** - the storage medium failed (I/O, corrupt files).
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.

use std::{io, path::PathBuf};

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// A value that is not a record (string, number, bool, null, array) was
    /// passed where a document is required. Carries the kind of value received.
    #[error("Cannot store a {0} as a document, expected a record")]
    NotARecord(&'static str),
    /// The document carries an `id` field whose value is not a non-empty string.
    #[error("`id` must be a non-empty string")]
    InvalidIdentifierType,
    /// The collection name cannot be mapped onto the storage medium.
    #[error("Invalid collection name: {0:?}")]
    InvalidCollectionName(String),
    /// The document violates structural constraints of the operation.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The document has no `id` field.
    #[error("`id` not found on document")]
    IdentifierMissing,
    /// The requested document was not found in the collection.
    #[error("Document {id} not found in collection {collection}")]
    DocumentNotFound {
        /// The identifier that was looked up.
        id: String,
        /// The collection that was searched.
        collection: String,
    },
    /// An I/O operation against the storage medium failed.
    #[error("Failed to {operation} {path} in collection {collection}: {source}")]
    Io {
        /// What the backend was doing (`"read"`, `"write"`, `"remove"`, ...).
        operation: &'static str,
        /// The collection the operation targeted.
        collection: String,
        /// The path on the medium.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A stored document could not be parsed.
    #[error("Corrupt document {path} in collection {collection}: {source}")]
    Corrupt {
        /// The collection the document belongs to.
        collection: String,
        /// The path of the unreadable document.
        path: PathBuf,
        #[source]
        source: SerdeJsonError,
    },
    /// Serialization/deserialization error when converting between typed values and documents.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The store configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// An error raised by a host-supplied backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl DocumentStoreError {
    /// Returns `true` when the error is caused by invalid caller input rather
    /// than by stored state or the storage medium.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DocumentStoreError::NotARecord(_)
                | DocumentStoreError::InvalidIdentifierType
                | DocumentStoreError::InvalidCollectionName(_)
                | DocumentStoreError::InvalidDocument(_)
        )
    }

    /// Returns `true` when the error reports a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentStoreError::DocumentNotFound { .. })
    }
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_are_classified() {
        assert!(DocumentStoreError::NotARecord("string").is_usage_error());
        assert!(DocumentStoreError::InvalidIdentifierType.is_usage_error());
        assert!(!DocumentStoreError::IdentifierMissing.is_usage_error());
        assert!(
            !DocumentStoreError::DocumentNotFound {
                id: "a".into(),
                collection: "b".into(),
            }
            .is_usage_error()
        );
    }

    #[test]
    fn io_error_message_names_collection_and_operation() {
        let err = DocumentStoreError::Io {
            operation: "write",
            collection: "people".into(),
            path: PathBuf::from("/tmp/people/1.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        let message = err.to_string();
        assert!(message.contains("write"));
        assert!(message.contains("people"));
        assert!(message.contains("denied"));
    }
}
