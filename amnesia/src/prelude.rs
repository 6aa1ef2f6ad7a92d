//! Convenient re-exports of commonly used types from amnesia.
//!
//! ```ignore
//! use amnesia::prelude::*;
//! ```

pub use amnesia_core::{
    backend::{DynStoreBackend, StoreBackend, StoreBackendBuilder},
    collection::{Collection, TypedCollection},
    document::{Document, ID_FIELD, Model, ModelExt, from_document, into_document, to_document},
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
    id::{IdGenerator, OsRandom, RandomSource, SeededRandom},
    store::{DocumentStore, DynDocumentStore},
};
pub use amnesia_file::FileStore;
pub use amnesia_memory::InMemoryStore;

pub use crate::config::StoreConfig;
