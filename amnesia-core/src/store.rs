//! Main document store interface.
//!
//! A [`DocumentStore`] owns exactly one backend for its whole life and hands out
//! collections that borrow it. Use [`DynDocumentStore`] when the backend is
//! chosen at runtime, for example from configuration.
//!
//! # Example
//!
//! ```ignore
//! use amnesia::store::DocumentStore;
//! use amnesia::memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let people = store.collection("people");
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::{Collection, TypedCollection},
    document::Model,
};

/// A document store bound to a backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

/// A document store whose backend is selected at runtime.
pub type DynDocumentStore = DocumentStore<DynStoreBackend>;

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a collection with the given name.
    ///
    /// Nothing is created on the medium until the first insert.
    pub fn collection(&self, name: &str) -> Collection<'_, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Gets a typed collection for the specified model type.
    ///
    /// The collection name is determined by [`Model::collection_name`].
    pub fn typed_collection<M: Model>(&self) -> TypedCollection<'_, B, M> {
        TypedCollection::new(M::collection_name().to_string(), &self.backend)
    }

    /// Returns the backend this store was built with.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the store and returns its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: StoreBackend + 'static> DocumentStore<B> {
    /// Erases the backend type.
    pub fn into_dyn(self) -> DynDocumentStore {
        let backend: DynStoreBackend = Box::new(self.backend);
        DocumentStore::new(backend)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use serde::{Deserialize, Serialize};
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        document::{self, Document, ID_FIELD},
        error::{DocumentStoreError, DocumentStoreResult},
        filter::Filter,
        id::{IdGenerator, SeededRandom},
    };

    /// Insertion-ordered backend so facade ordering is observable.
    #[derive(Debug)]
    struct VecBackend {
        ids: IdGenerator,
        rows: Mutex<Vec<(String, Document)>>,
    }

    impl VecBackend {
        fn new() -> Self {
            Self { ids: IdGenerator::new(SeededRandom::new(3)), rows: Mutex::new(Vec::new()) }
        }
    }

    impl StoreBackend for VecBackend {
        fn write(&self, collection: &str, mut doc: Document) -> DocumentStoreResult<String> {
            let id = document::ensure_id(&mut doc, &self.ids)?;
            let mut rows = self.rows.lock();
            rows.retain(|(c, d)| !(c == collection && d[ID_FIELD] == json!(id)));
            rows.push((collection.to_string(), doc));
            Ok(id)
        }

        fn read(&self, collection: &str) -> DocumentStoreResult<Vec<Document>> {
            Ok(self
                .rows
                .lock()
                .iter()
                .filter(|(c, _)| c == collection)
                .map(|(_, d)| d.clone())
                .collect())
        }

        fn update(&self, collection: &str, doc: Document) -> DocumentStoreResult<()> {
            let id = document::document_id(&doc)?.to_string();
            let mut rows = self.rows.lock();
            let slot = rows
                .iter_mut()
                .find(|(c, d)| c == collection && d[ID_FIELD] == json!(id))
                .ok_or_else(|| DocumentStoreError::DocumentNotFound {
                    id: id.clone(),
                    collection: collection.to_string(),
                })?;
            slot.1 = doc;
            Ok(())
        }

        fn delete(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<()> {
            self.rows
                .lock()
                .retain(|(c, d)| !(c == collection && filter.matches(d)));
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Person {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        age: u32,
    }

    impl Model for Person {
        fn collection_name() -> &'static str {
            "people"
        }
    }

    fn patch(value: Value) -> Document {
        document::into_document(value).unwrap()
    }

    #[test]
    fn find_one_returns_first_match_in_backend_order() {
        let store = DocumentStore::new(VecBackend::new());
        let people = store.collection("people");

        people.insert(&json!({ "id": "a", "team": "red" })).unwrap();
        people.insert(&json!({ "id": "b", "team": "red" })).unwrap();

        let first = people.find_one(&Filter::new().eq("team", "red")).unwrap().unwrap();
        assert_eq!(first[ID_FIELD], json!("a"));
        assert_eq!(people.count(&Filter::new().eq("team", "red")).unwrap(), 2);
        assert!(people.find_one(&Filter::new().eq("team", "blue")).unwrap().is_none());
    }

    #[test]
    fn insert_rejects_primitives_before_reaching_the_backend() {
        let store = DocumentStore::new(VecBackend::new());
        let things = store.collection("things");

        let err = things.insert(&123).unwrap_err();
        assert!(matches!(err, DocumentStoreError::NotARecord("number")));
        assert!(err.is_usage_error());
        assert!(things.find_all().unwrap().is_empty());
    }

    #[test]
    fn collections_are_isolated() {
        let store = DocumentStore::new(VecBackend::new());

        store.collection("a").insert(&json!({ "id": "same" })).unwrap();
        store.collection("b").insert(&json!({ "id": "same", "b": true })).unwrap();

        assert_eq!(store.collection("a").find_all().unwrap().len(), 1);
        assert!(!store.collection("a").find_all().unwrap()[0].contains_key("b"));
    }

    #[test]
    fn update_where_merges_fields_into_every_match() {
        let store = DocumentStore::new(VecBackend::new());
        let people = store.collection("people");

        people.insert(&json!({ "id": "1", "team": "red", "name": "a" })).unwrap();
        people.insert(&json!({ "id": "2", "team": "red", "name": "b" })).unwrap();
        people.insert(&json!({ "id": "3", "team": "blue", "name": "c" })).unwrap();

        let updated = people
            .update_where(&Filter::new().eq("team", "red"), patch(json!({ "score": 10 })))
            .unwrap();

        assert_eq!(updated, 2);
        assert_eq!(people.find(&Filter::new().eq("score", 10)).unwrap().len(), 2);

        let first = people.find_one(&Filter::by_id("1")).unwrap().unwrap();
        assert_eq!(first["name"], json!("a"));
    }

    #[test]
    fn update_where_refuses_to_change_ids() {
        let store = DocumentStore::new(VecBackend::new());
        let people = store.collection("people");

        people.insert(&json!({ "id": "1" })).unwrap();

        let err = people
            .update_where(&Filter::new(), patch(json!({ "id": "2" })))
            .unwrap_err();
        assert!(matches!(err, DocumentStoreError::InvalidDocument(_)));
    }

    #[test]
    fn typed_collections_round_trip_models() {
        let store = DocumentStore::new(VecBackend::new());
        let people = store.typed_collection::<Person>();
        assert_eq!(people.name(), "people");

        let id = people
            .insert(&Person { id: None, name: "John Doe".into(), age: 30 })
            .unwrap();

        let mut john = people.find_one(&Filter::by_id(&id)).unwrap().unwrap();
        assert_eq!(john.id.as_deref(), Some(id.as_str()));

        john.age = 31;
        people.update(&john).unwrap();

        assert_eq!(people.find(&Filter::new().eq("age", 31)).unwrap(), vec![john]);

        people.delete(&Filter::by_id(&id)).unwrap();
        assert!(people.find_all().unwrap().is_empty());
    }

    #[test]
    fn dyn_store_forwards_to_boxed_backend() {
        let store = DocumentStore::new(VecBackend::new()).into_dyn();

        let id = store.collection("x").insert(&json!({ "k": 1 })).unwrap();
        assert!(store.collection("x").find_one(&Filter::by_id(id)).unwrap().is_some());
    }

    #[test]
    fn into_backend_keeps_stored_documents() {
        let store = DocumentStore::new(VecBackend::new());
        store.collection("x").insert(&json!({ "id": "1" })).unwrap();

        let backend = store.into_backend();
        assert_eq!(backend.read("x").unwrap().len(), 1);

        let reopened = DocumentStore::new(backend);
        assert!(reopened.collection("x").find_one(&Filter::by_id("1")).unwrap().is_some());
    }
}
