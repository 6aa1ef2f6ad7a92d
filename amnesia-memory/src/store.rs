//! In-memory storage implementation for document stores.
//!
//! Documents live in nested hash maps keyed by collection name and then by
//! document identifier, guarded by a read-write lock.

use std::{collections::HashMap, sync::Arc};

use log::{debug, trace};
use parking_lot::RwLock;

use amnesia_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{self, Document},
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
    id::IdGenerator,
};

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// Nothing is written to disk; the data is gone when the last clone is
/// dropped. Documents are stored per collection, so the same identifier may be
/// used in two collections without either one seeing the other's document.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state.
/// Multiple clones of the same instance share the same underlying data.
///
/// Every operation scans at most one collection and never fails except on
/// identifier errors.
///
/// # Example
///
/// ```ignore
/// use amnesia_memory::InMemoryStore;
/// use amnesia_core::{backend::StoreBackend, document::into_document, filter::Filter};
/// use serde_json::json;
///
/// let store = InMemoryStore::new();
///
/// let id = store.write("users", into_document(json!({ "name": "Alice" }))?)?;
/// assert_eq!(store.read("users")?.len(), 1);
///
/// store.delete("users", &Filter::by_id(id))?;
/// # Ok::<(), amnesia_core::error::DocumentStoreError>(())
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection name -> (document id -> document)
    store: Arc<RwLock<StoreMap>>,
    ids: IdGenerator,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns the number of documents stored in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.store
            .read()
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Returns `true` if the collection holds no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl StoreBackend for InMemoryStore {
    fn write(&self, collection: &str, mut document: Document) -> DocumentStoreResult<String> {
        let id = document::ensure_id(&mut document, &self.ids)?;

        self.store
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);

        debug!("wrote document {id} to memory collection {collection}");

        Ok(id)
    }

    fn read(&self, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read();
        let documents = match store.get(collection) {
            Some(col) => col.values().cloned().collect::<Vec<_>>(),
            None => vec![],
        };

        trace!("read {} document(s) from memory collection {collection}", documents.len());

        Ok(documents)
    }

    fn update(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        let id = document::document_id(&document)?.to_string();
        let mut store = self.store.write();

        match store
            .get_mut(collection)
            .and_then(|col| col.get_mut(&id))
        {
            Some(slot) => *slot = document,
            None => {
                return Err(DocumentStoreError::DocumentNotFound {
                    id,
                    collection: collection.to_string(),
                });
            }
        }

        debug!("updated document {id} in memory collection {collection}");

        Ok(())
    }

    fn delete(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<()> {
        let mut store = self.store.write();
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(()),
        };

        let before = collection_map.len();
        collection_map.retain(|_, doc| !filter.matches(doc));

        debug!(
            "deleted {} document(s) from memory collection {collection}",
            before - collection_map.len()
        );

        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use amnesia_memory::InMemoryStore;
/// use amnesia_core::{backend::StoreBackendBuilder, id::{IdGenerator, SeededRandom}};
///
/// let store = InMemoryStore::builder()
///     .id_generator(IdGenerator::new(SeededRandom::new(42)))
///     .build()?;
/// # Ok::<(), amnesia_core::error::DocumentStoreError>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    ids: Option<IdGenerator>,
}

impl InMemoryStoreBuilder {
    /// Sets the generator used for documents written without an `id`.
    pub fn id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = Some(ids);
        self
    }
}

impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore {
            store: Arc::default(),
            ids: self.ids.unwrap_or_default(),
        })
    }
}
