//! Filesystem document storage backend for amnesia.
//!
//! Documents are stored one JSON file each, grouped in one directory per
//! collection. The layout is plain enough to inspect, diff or hand-edit:
//!
//! ```text
//! data/
//! └── people/
//!     ├── 0b6cbd0e-8a52-4d6e-9a3e-51f1c1f6a0e2.json
//!     └── 5f0e3a9c-2b8d-4c71-b0a4-7d9e12c4f8a1.json
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use amnesia::{prelude::*, file::FileStore};
//! use serde_json::json;
//!
//! let store = DocumentStore::new(FileStore::builder("./data").build()?);
//! let people = store.collection("people");
//!
//! people.insert(&json!({ "name": "Alice" }))?;
//! # Ok::<(), DocumentStoreError>(())
//! ```

#[allow(unused_extern_crates)]
extern crate self as amnesia_file;

pub mod store;

pub use store::{DOCUMENT_EXTENSION, FileStore, FileStoreBuilder};
