//! Declarative store construction.
//!
//! A [`StoreConfig`] names the backend a host wants and carries its
//! parameters. It can be deserialized from configuration files:
//!
//! ```json
//! { "backend": "memory" }
//! { "backend": "file", "base_directory": "/var/lib/myapp/data" }
//! ```
//!
//! Hosts with their own storage pass it in programmatically with
//! [`StoreConfig::custom`].

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

use amnesia_core::{
    backend::{DynStoreBackend, StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    id::IdGenerator,
    store::DynDocumentStore,
};
use amnesia_file::FileStore;
use amnesia_memory::InMemoryStore;

/// Which backend a store is built on.
#[derive(Debug, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Documents are kept in process memory only.
    Memory,
    /// Documents are persisted under `base_directory`.
    File {
        #[serde(alias = "baseDirectory")]
        base_directory: PathBuf,
    },
    /// A host-supplied backend. Only available programmatically.
    #[serde(skip)]
    Custom(DynStoreBackend),
}

impl StoreConfig {
    /// Configuration for an in-memory store.
    pub fn memory() -> Self {
        StoreConfig::Memory
    }

    /// Configuration for a file store rooted at `base_directory`.
    pub fn file(base_directory: impl Into<PathBuf>) -> Self {
        StoreConfig::File { base_directory: base_directory.into() }
    }

    /// Configuration wrapping a host-supplied backend.
    pub fn custom(backend: impl StoreBackend + 'static) -> Self {
        StoreConfig::Custom(Box::new(backend))
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Config`] if the JSON does not describe a
    /// known backend.
    pub fn from_json_str(json: &str) -> DocumentStoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| DocumentStoreError::Config(err.to_string()))
    }

    /// Builds the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be built, for example when the
    /// file backend's base directory is an existing regular file.
    pub fn open(self) -> DocumentStoreResult<DynDocumentStore> {
        self.open_with_ids(IdGenerator::default())
    }

    /// Builds the configured store, minting identifiers with `ids`.
    ///
    /// `ids` is ignored for custom backends, which generate their own.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::open`].
    pub fn open_with_ids(self, ids: IdGenerator) -> DocumentStoreResult<DynDocumentStore> {
        let backend: DynStoreBackend = match self {
            StoreConfig::Memory => {
                info!("opening in-memory document store");
                Box::new(InMemoryStore::builder().id_generator(ids).build()?)
            }
            StoreConfig::File { base_directory } => {
                info!("opening file document store at {}", base_directory.display());
                Box::new(FileStore::builder(base_directory).id_generator(ids).build()?)
            }
            StoreConfig::Custom(backend) => {
                info!("opening document store on custom backend {backend:?}");
                backend
            }
        };

        Ok(DynDocumentStore::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_memory_and_file_backends() {
        assert!(matches!(
            StoreConfig::from_json_str(r#"{ "backend": "memory" }"#).unwrap(),
            StoreConfig::Memory
        ));

        match StoreConfig::from_json_str(r#"{ "backend": "file", "base_directory": "/data" }"#)
            .unwrap()
        {
            StoreConfig::File { base_directory } => assert_eq!(base_directory, PathBuf::from("/data")),
            other => panic!("unexpected config {other:?}"),
        }

        assert!(matches!(
            StoreConfig::from_json_str(r#"{ "backend": "file", "baseDirectory": "d" }"#).unwrap(),
            StoreConfig::File { .. }
        ));
    }

    #[test]
    fn rejects_unknown_or_incomplete_configs() {
        for json in [
            r#"{ "backend": "custom" }"#,
            r#"{ "backend": "postgres" }"#,
            r#"{ "backend": "file" }"#,
            r#"{}"#,
        ] {
            assert!(
                matches!(StoreConfig::from_json_str(json), Err(DocumentStoreError::Config(_))),
                "{json} should be rejected"
            );
        }
    }
}
