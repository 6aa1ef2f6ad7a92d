//! In-memory document storage backend for amnesia.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is meant for tests, fixtures and short-lived tools where durability does not matter.
//!
//! # Quick Start
//!
//! ```ignore
//! use amnesia::{prelude::*, memory::InMemoryStore};
//! use serde_json::json;
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build()?);
//! let people = store.collection("people");
//!
//! let id = people.insert(&json!({ "name": "Alice" }))?;
//! assert!(people.find_one(&Filter::by_id(id))?.is_some());
//! # Ok::<(), DocumentStoreError>(())
//! ```

#[allow(unused_extern_crates)]
extern crate self as amnesia_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
