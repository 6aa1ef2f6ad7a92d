//! Main amnesia crate: a small embedded document store.
//!
//! amnesia groups schema-less JSON documents into named collections, persists
//! them through a pluggable backend and finds them again with flat equality
//! filters. It is meant for single-process, low-volume use: configuration
//! stores, test fixtures and small tools.
//!
//! This crate re-exports the core types and both bundled backends.
//!
//! # Quick Start
//!
//! ```ignore
//! use amnesia::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> DocumentStoreResult<()> {
//!     let store = StoreConfig::file("./data").open()?;
//!     let people = store.collection("people");
//!
//!     let id = people.insert(&json!({ "name": "John Doe", "age": 30 }))?;
//!     people.insert(&json!({ "name": "Jane Smith", "age": 25 }))?;
//!
//!     let jane = people.find(&Filter::new().eq("name", "Jane Smith"))?;
//!     assert_eq!(jane.len(), 1);
//!
//!     people.update(into_document(json!({ "id": id, "name": "Updated Name", "age": 35 }))?)?;
//!     people.delete(&Filter::by_id(&id))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Typed collections
//!
//! ```ignore
//! use amnesia::prelude::*;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Person {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     pub id: Option<String>,
//!     pub name: String,
//! }
//!
//! impl Model for Person {
//!     fn collection_name() -> &'static str { "people" }
//! }
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let people = store.typed_collection::<Person>();
//! let id = people.insert(&Person { id: None, name: "Alice".into() })?;
//! # Ok::<(), DocumentStoreError>(())
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Process-memory storage for tests and fixtures
//! - [`file`] - One JSON file per document under a base directory
//!
//! Any other storage can be plugged in by implementing
//! [`StoreBackend`](backend::StoreBackend) and passing it to
//! [`DocumentStore::new`](store::DocumentStore::new) or
//! [`StoreConfig::custom`](config::StoreConfig::custom).

pub mod config;
pub mod prelude;

pub use amnesia_core::{backend, collection, document, error, filter, id, store};

pub use serde_json;

/// In-memory storage backend.
pub mod memory {
    pub use amnesia_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// Filesystem storage backend.
pub mod file {
    pub use amnesia_file::{DOCUMENT_EXTENSION, FileStore, FileStoreBuilder};
}
