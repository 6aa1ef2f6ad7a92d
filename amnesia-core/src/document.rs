//! The untyped document model and conversions into and out of it.
//!
//! A [`Document`] is a JSON object: a map from field names to dynamically typed
//! [`Value`]s. The reserved field [`ID_FIELD`] carries the document identifier,
//! which must be a non-empty string.
//!
//! Typed records enter and leave the store through [`to_document`] and
//! [`from_document`], or through the [`Model`] trait for types bound to a
//! collection.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    id::IdGenerator,
};

/// A schema-less record. Field order is not significant.
pub type Document = Map<String, Value>;

/// The reserved identifier field.
pub const ID_FIELD: &str = "id";

/// Returns a short name for the kind of a JSON value, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts a JSON value into a document.
///
/// # Errors
///
/// Returns [`DocumentStoreError::NotARecord`] for anything but an object.
pub fn into_document(value: Value) -> DocumentStoreResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DocumentStoreError::NotARecord(value_kind(&other))),
    }
}

/// Serializes any record-shaped value into a document.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Serialization`] if `serde` rejects the value
/// and [`DocumentStoreError::NotARecord`] if it serializes to a primitive or a
/// sequence.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> DocumentStoreResult<Document> {
    into_document(serde_json::to_value(value)?)
}

/// Deserializes a document into a typed value.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Serialization`] if the document does not fit `T`.
pub fn from_document<T: DeserializeOwned>(document: Document) -> DocumentStoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Returns the identifier of a document.
///
/// # Errors
///
/// - [`DocumentStoreError::IdentifierMissing`] if there is no `id` field
/// - [`DocumentStoreError::InvalidIdentifierType`] if `id` is not a non-empty string
pub fn document_id(document: &Document) -> DocumentStoreResult<&str> {
    match document.get(ID_FIELD) {
        None => Err(DocumentStoreError::IdentifierMissing),
        Some(Value::String(id)) if !id.is_empty() => Ok(id),
        Some(_) => Err(DocumentStoreError::InvalidIdentifierType),
    }
}

/// Returns the identifier of a document, minting and storing one if absent.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidIdentifierType`] if the document
/// already carries an `id` that is not a non-empty string. It is never coerced.
pub fn ensure_id(document: &mut Document, ids: &IdGenerator) -> DocumentStoreResult<String> {
    if !document.contains_key(ID_FIELD) {
        let id = ids.new_id();
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        return Ok(id);
    }

    document_id(document).map(str::to_owned)
}

/// Merges the top-level fields of `patch` into `document`, replacing values
/// that already exist.
pub fn apply_patch(document: &mut Document, patch: &Document) {
    for (field, value) in patch {
        document.insert(field.clone(), value.clone());
    }
}

/// A typed record bound to a collection.
///
/// # Example
///
/// ```ignore
/// use amnesia::document::Model;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Person {
///     #[serde(skip_serializing_if = "Option::is_none")]
///     pub id: Option<String>,
///     pub name: String,
///     pub age: u32,
/// }
///
/// impl Model for Person {
///     fn collection_name() -> &'static str {
///         "people"
///     }
/// }
/// ```
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Returns the name of the collection this model is stored in.
    fn collection_name() -> &'static str;
}

/// Extension trait providing document conversions for every [`Model`].
pub trait ModelExt: Model {
    /// Converts this model into a document.
    fn to_document(&self) -> DocumentStoreResult<Document>;

    /// Creates a model from a stored document.
    fn from_document(document: Document) -> DocumentStoreResult<Self>;
}

impl<M: Model> ModelExt for M {
    fn to_document(&self) -> DocumentStoreResult<Document> {
        to_document(self)
    }

    fn from_document(document: Document) -> DocumentStoreResult<Self> {
        from_document(document)
    }
}
