//! Collection types for document store operations.
//!
//! A collection binds a name to the store's backend and forwards every call to
//! it. It holds no cache, so two handles on the same name always observe the
//! same data.
//!
//! # Collection Types
//!
//! - [`Collection`] - Untyped collection working with [`Document`]s
//! - [`TypedCollection`] - Serde-typed view for a [`Model`]
//!
//! # Example
//!
//! ```ignore
//! use amnesia::prelude::*;
//! use serde_json::json;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let people = store.collection("people");
//!
//! let id = people.insert(&json!({ "name": "Jane Smith", "age": 25 }))?;
//! let jane = people.find_one(&Filter::by_id(&id))?;
//! # Ok::<(), DocumentStoreError>(())
//! ```

use std::marker::PhantomData;

use log::debug;
use serde::Serialize;

use crate::{
    backend::StoreBackend,
    document::{self, Document, ID_FIELD, Model, ModelExt},
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
};

/// An untyped collection with a reference to a storage backend.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend + ?Sized> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend + ?Sized> Collection<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every document in the collection.
    ///
    /// A collection that was never written returns an empty vector.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the backend cannot read the collection.
    pub fn find_all(&self) -> DocumentStoreResult<Vec<Document>> {
        self.backend.read(self.name())
    }

    /// Returns the documents matching `filter`, in backend order.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the backend cannot read the collection.
    pub fn find(&self, filter: &Filter) -> DocumentStoreResult<Vec<Document>> {
        Ok(filter.apply(self.find_all()?))
    }

    /// Returns the first document matching `filter`, in backend order.
    ///
    /// Backend order is unspecified, so when several documents match there is
    /// no guarantee which one is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the backend cannot read the collection.
    pub fn find_one(&self, filter: &Filter) -> DocumentStoreResult<Option<Document>> {
        Ok(self
            .find_all()?
            .into_iter()
            .find(|doc| filter.matches(doc)))
    }

    /// Counts the documents matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the backend cannot read the collection.
    pub fn count(&self, filter: &Filter) -> DocumentStoreResult<usize> {
        Ok(self
            .find_all()?
            .iter()
            .filter(|doc| filter.matches(doc))
            .count())
    }

    /// Inserts any record-shaped value and returns its identifier.
    ///
    /// The value is serialized into a [`Document`] first. If it carries no `id`
    /// one is generated.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::NotARecord`] if `value` is not record-shaped
    /// - [`DocumentStoreError::InvalidIdentifierType`] if its `id` is not a string
    /// - any backend error
    pub fn insert<T: Serialize + ?Sized>(&self, value: &T) -> DocumentStoreResult<String> {
        self.backend
            .write(self.name(), document::to_document(value)?)
    }

    /// Replaces a stored document with `document`.
    ///
    /// `document` must carry the `id` of the target and every field that should
    /// remain; fields it lacks are gone afterwards.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::IdentifierMissing`] if `document` has no `id`
    /// - [`DocumentStoreError::DocumentNotFound`] if nothing with that `id` exists
    /// - any backend error
    pub fn update(&self, document: Document) -> DocumentStoreResult<()> {
        self.backend.update(self.name(), document)
    }

    /// Merges `patch` into every document matching `filter` and stores the
    /// results, returning how many documents were updated.
    ///
    /// Fields absent from `patch` are kept. Each matching document is written
    /// back through [`StoreBackend::update`]; a failure stops the operation and
    /// earlier documents keep their new contents.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::InvalidDocument`] if `patch` carries an `id`
    /// - any backend error
    pub fn update_where(&self, filter: &Filter, patch: Document) -> DocumentStoreResult<usize> {
        if patch.contains_key(ID_FIELD) {
            return Err(DocumentStoreError::InvalidDocument(
                "a patch cannot change the document `id`".to_string(),
            ));
        }

        let matches = self.find(filter)?;
        let count = matches.len();

        for mut doc in matches {
            document::apply_patch(&mut doc, &patch);
            self.backend.update(self.name(), doc)?;
        }

        debug!("patched {count} document(s) in collection {}", self.name);

        Ok(count)
    }

    /// Removes every document matching `filter`.
    ///
    /// Deleting nothing is not an error, so repeating a delete is harmless.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; documents removed before it stay removed.
    pub fn delete(&self, filter: &Filter) -> DocumentStoreResult<()> {
        self.backend.delete(self.name(), filter)
    }
}

/// A typed collection converting between a [`Model`] and stored documents.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend + ?Sized, M: Model> {
    inner: Collection<'a, B>,
    _marker: PhantomData<M>,
}

impl<'a, B: StoreBackend + ?Sized, M: Model> TypedCollection<'a, B, M> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { inner: Collection::new(name, backend), _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the untyped view of this collection.
    pub fn untyped(&self) -> &Collection<'a, B> {
        &self.inner
    }

    /// Converts this typed collection to a different model type.
    pub fn with_type<T: Model>(&self) -> TypedCollection<'a, B, T> {
        TypedCollection {
            inner: Collection::new(self.inner.name.clone(), self.inner.backend),
            _marker: PhantomData,
        }
    }

    /// Returns every stored model.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if reading or deserialization fails.
    pub fn find_all(&self) -> DocumentStoreResult<Vec<M>> {
        self.inner
            .find_all()?
            .into_iter()
            .map(M::from_document)
            .collect()
    }

    /// Returns the models whose documents match `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if reading or deserialization fails.
    pub fn find(&self, filter: &Filter) -> DocumentStoreResult<Vec<M>> {
        self.inner
            .find(filter)?
            .into_iter()
            .map(M::from_document)
            .collect()
    }

    /// Returns the first model whose document matches `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if reading or deserialization fails.
    pub fn find_one(&self, filter: &Filter) -> DocumentStoreResult<Option<M>> {
        self.inner
            .find_one(filter)?
            .map(M::from_document)
            .transpose()
    }

    /// Inserts a model and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if serialization or the write fails.
    pub fn insert(&self, model: &M) -> DocumentStoreResult<String> {
        self.inner.insert(model)
    }

    /// Replaces the stored document of `model`, which must serialize an `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if serialization or the update fails.
    pub fn update(&self, model: &M) -> DocumentStoreResult<()> {
        self.inner.update(model.to_document()?)
    }

    /// Removes every model whose document matches `filter`.
    ///
    /// # Errors
    ///
    /// Returns the first backend error.
    pub fn delete(&self, filter: &Filter) -> DocumentStoreResult<()> {
        self.inner.delete(filter)
    }
}
