//! The core of the amnesia embedded document store.
//!
//! This crate provides:
//!
//! - **Document model** ([`document`]) - The untyped document type and conversions from typed values
//! - **Filters** ([`filter`]) - Flat equality predicates and by-value matching
//! - **Identifiers** ([`id`]) - Random identifier generation with an injectable random source
//! - **Store backend abstraction** ([`backend`]) - The trait every storage strategy implements
//! - **Collections interface** ([`collection`]) - Find, insert, update and delete on a named collection
//! - **Document store** ([`store`]) - The root object binding one backend to all its collections
//! - **Error handling** ([`error`]) - Error taxonomy and result types
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
//! people.insert(&json!({ "name": "John Doe", "age": 30 }))?;
//! people.insert(&json!({ "name": "Jane Smith", "age": 25 }))?;
//!
//! let jane = people.find(&Filter::new().eq("name", "Jane Smith"))?;
//! assert_eq!(jane.len(), 1);
//! # Ok::<(), DocumentStoreError>(())
//! ```

#[allow(unused_extern_crates)]
extern crate self as amnesia_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod filter;
pub mod id;
pub mod store;
