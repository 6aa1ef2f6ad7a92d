//! Storage backend abstraction for the document store.
//!
//! This module defines the trait that every storage strategy implements. The
//! store and its collections are written purely against [`StoreBackend`], so a
//! memory map, a directory of JSON files or a host-supplied database can be
//! plugged in without the facade noticing.
//!
//! # Examples
//!
//! ```ignore
//! use amnesia::backend::StoreBackend;
//! use amnesia::memory::InMemoryStore;
//! use amnesia::filter::Filter;
//! use serde_json::json;
//!
//! let backend = InMemoryStore::new();
//! let doc = amnesia::document::into_document(json!({ "name": "Alice" }))?;
//!
//! let id = backend.write("users", doc)?;
//! backend.delete("users", &Filter::by_id(id))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{fmt::Debug, sync::Arc};

use crate::{
    document::Document,
    error::DocumentStoreResult,
    filter::Filter,
};

/// Abstract interface for document storage backends.
///
/// All operations are synchronous and keyed by collection name. Collections
/// come into existence on first write and are never removed by the backend.
///
/// # Concurrency
///
/// Implementations must be `Send + Sync` so a store can be shared, but they are
/// not required to make sequences of operations atomic. Two callers writing to
/// the same collection at once get whatever the medium gives them; hosts that
/// need more must serialize access themselves.
///
/// # Error Handling
///
/// Operations return [`DocumentStoreResult<T>`](crate::error::DocumentStoreResult).
/// Backends never retry; medium failures are returned to the caller unchanged.
pub trait StoreBackend: Send + Sync + Debug {
    /// Persists a document, assigning an identifier first if it has none.
    ///
    /// An existing document with the same identifier is overwritten.
    ///
    /// # Returns
    ///
    /// The identifier of the stored document.
    ///
    /// # Errors
    ///
    /// - [`InvalidIdentifierType`](crate::error::DocumentStoreError::InvalidIdentifierType)
    ///   if `id` is present but not a non-empty string
    /// - a medium error if the document cannot be persisted
    fn write(&self, collection: &str, document: Document) -> DocumentStoreResult<String>;

    /// Returns every document in the collection, in unspecified order.
    ///
    /// A collection that was never written yields an empty vector, not an error.
    fn read(&self, collection: &str) -> DocumentStoreResult<Vec<Document>>;

    /// Replaces an existing document entirely.
    ///
    /// # Errors
    ///
    /// - [`IdentifierMissing`](crate::error::DocumentStoreError::IdentifierMissing)
    ///   if the document has no `id`
    /// - [`InvalidIdentifierType`](crate::error::DocumentStoreError::InvalidIdentifierType)
    ///   if `id` is not a non-empty string
    /// - [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound)
    ///   if no document with that `id` is stored in the collection
    fn update(&self, collection: &str, document: Document) -> DocumentStoreResult<()>;

    /// Removes every document in the collection matching `filter`.
    ///
    /// Matching nothing is not an error. If removing one document fails the
    /// backend stops and returns that error; documents removed before the
    /// failure stay removed.
    fn delete(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<()>;
}

impl<B> StoreBackend for &B
where
    B: StoreBackend + ?Sized,
{
    fn write(&self, collection: &str, document: Document) -> DocumentStoreResult<String> {
        (**self).write(collection, document)
    }

    fn read(&self, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        (**self).read(collection)
    }

    fn update(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        (**self).update(collection, document)
    }

    fn delete(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<()> {
        (**self).delete(collection, filter)
    }
}

impl<B> StoreBackend for Box<B>
where
    B: StoreBackend + ?Sized,
{
    fn write(&self, collection: &str, document: Document) -> DocumentStoreResult<String> {
        (**self).write(collection, document)
    }

    fn read(&self, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        (**self).read(collection)
    }

    fn update(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        (**self).update(collection, document)
    }

    fn delete(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<()> {
        (**self).delete(collection, filter)
    }
}

impl<B> StoreBackend for Arc<B>
where
    B: StoreBackend + ?Sized,
{
    fn write(&self, collection: &str, document: Document) -> DocumentStoreResult<String> {
        (**self).write(collection, document)
    }

    fn read(&self, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        (**self).read(collection)
    }

    fn update(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        (**self).update(collection, document)
    }

    fn delete(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<()> {
        (**self).delete(collection, filter)
    }
}

/// A boxed backend chosen at runtime.
pub type DynStoreBackend = Box<dyn StoreBackend>;

/// Factory trait for creating backend instances.
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    /// Builds the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable.
    fn build(self) -> DocumentStoreResult<Self::Backend>;
}
