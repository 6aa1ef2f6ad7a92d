//! Equality filters over untyped documents.
//!
//! A [`Filter`] is a flat map from field name to required value. A document
//! matches when every filter field is present on the document with an equal
//! value. Equality is by value: numbers compare numerically regardless of how
//! they were written (`30` equals `30.0`), arrays compare element-wise and
//! objects key-wise under the same rule.
//!
//! # Example
//!
//! ```ignore
//! use amnesia::filter::Filter;
//!
//! let filter = Filter::new()
//!     .eq("name", "Jane Smith")
//!     .eq("age", 25);
//! ```

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::{
    document::{Document, ID_FIELD, value_kind},
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Borrowed view of a JSON value with by-value equality.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(&'a Number),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Value> for Comparable<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Comparable::Null,
            Value::Bool(value) => Comparable::Bool(*value),
            Value::Number(value) => Comparable::Number(value),
            Value::String(value) => Comparable::String(value),
            Value::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect()
            ),
            Value::Object(map) => Comparable::Map(
                map
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => numbers_equal(a, b),
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// Integers compare exactly, also against a float with no fractional part.
/// Two floats compare as `f64`.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (exact_integer(a), exact_integer(b)) {
        (Some(a), Some(b)) => a == b,
        (Some(int), None) => b.as_f64().and_then(integral_float) == Some(int),
        (None, Some(int)) => a.as_f64().and_then(integral_float) == Some(int),
        (None, None) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn exact_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// The float as an integer, if it holds one exactly.
fn integral_float(f: f64) -> Option<i128> {
    // 2^127 is the first float outside i128.
    let bound = 2f64.powi(127);

    (f.is_finite() && f.fract() == 0.0 && f.abs() < bound).then(|| f as i128)
}

/// Returns `true` when two values are equal under the filter equality rule.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    Comparable::from(left) == Comparable::from(right)
}

/// A flat equality predicate over document fields.
///
/// The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Creates an empty filter, which matches every document.
    pub fn new() -> Self {
        Filter(Map::new())
    }

    /// Creates a filter matching the document with the given identifier.
    pub fn by_id(id: impl Into<String>) -> Self {
        Filter::new().eq(ID_FIELD, id.into())
    }

    /// Requires `field` to equal `value`, replacing any earlier requirement on
    /// the same field.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Returns the required value for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the number of constrained fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field is constrained.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the `(field, value)` requirements.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Evaluates this filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| {
                document
                    .get(field)
                    .is_some_and(|actual| values_equal(actual, expected))
            })
    }

    /// Keeps the documents matching this filter, preserving their order.
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        documents
            .into_iter()
            .filter(|doc| self.matches(doc))
            .collect()
    }
}

impl From<Document> for Filter {
    fn from(map: Document) -> Self {
        Filter(map)
    }
}

impl TryFrom<Value> for Filter {
    type Error = DocumentStoreError;

    fn try_from(value: Value) -> DocumentStoreResult<Self> {
        match value {
            Value::Object(map) => Ok(Filter(map)),
            other => Err(DocumentStoreError::NotARecord(value_kind(&other))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (k, v)| filter.eq(k, v))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::into_document;

    fn doc(value: Value) -> Document {
        into_document(value).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().matches(&doc(json!({}))));
        assert!(Filter::new().matches(&doc(json!({ "id": "1", "a": [1, 2] }))));
    }

    #[test]
    fn every_field_must_be_present_and_equal() {
        let person = doc(json!({ "id": "1", "name": "Jane Smith", "age": 25 }));

        assert!(Filter::new().eq("name", "Jane Smith").matches(&person));
        assert!(Filter::new().eq("name", "Jane Smith").eq("age", 25).matches(&person));
        assert!(!Filter::new().eq("name", "Jane Smith").eq("age", 26).matches(&person));
        assert!(!Filter::new().eq("city", Value::Null).matches(&person));
        assert!(!Filter::new().eq("name", "jane smith").matches(&person));
    }

    #[test]
    fn null_matches_only_an_explicit_null() {
        let with_null = doc(json!({ "nick": null }));

        assert!(Filter::new().eq("nick", Value::Null).matches(&with_null));
        assert!(!Filter::new().eq("nick", Value::Null).matches(&doc(json!({}))));
    }

    #[test]
    fn numbers_compare_by_value() {
        let integral = doc(json!({ "age": 30 }));
        let float = doc(json!({ "age": 30.0 }));

        assert!(Filter::new().eq("age", 30.0).matches(&integral));
        assert!(Filter::new().eq("age", 30).matches(&float));
        assert!(!Filter::new().eq("age", 30.5).matches(&integral));
        assert!(!Filter::new().eq("age", "30").matches(&integral));
        assert!(Filter::new().eq("big", u64::MAX).matches(&doc(json!({ "big": u64::MAX }))));
        assert!(!Filter::new().eq("n", -1).matches(&doc(json!({ "n": u64::MAX }))));
    }

    #[test]
    fn large_integers_do_not_match_nearby_floats() {
        let above_f64_precision = doc(json!({ "n": 9_007_199_254_740_993_u64 }));
        let exact = doc(json!({ "n": 9_007_199_254_740_992_u64 }));

        assert!(!Filter::new().eq("n", 9_007_199_254_740_992.0).matches(&above_f64_precision));
        assert!(Filter::new().eq("n", 9_007_199_254_740_992.0).matches(&exact));
        assert!(!Filter::new().eq("n", 18_446_744_073_709_551_616.0).matches(&doc(json!({ "n": u64::MAX }))));
        assert!(!Filter::new().eq("n", f64::MIN).matches(&doc(json!({ "n": i64::MIN }))));
        assert!(Filter::new().eq("n", -9_223_372_036_854_775_808.0).matches(&doc(json!({ "n": i64::MIN }))));
    }

    #[test]
    fn nested_values_compare_structurally() {
        let document = doc(json!({
            "tags": ["a", "b"],
            "address": { "city": "Oslo", "zip": 150 },
        }));

        assert!(Filter::new().eq("tags", json!(["a", "b"])).matches(&document));
        assert!(!Filter::new().eq("tags", json!(["b", "a"])).matches(&document));
        assert!(
            Filter::new()
                .eq("address", json!({ "zip": 150.0, "city": "Oslo" }))
                .matches(&document)
        );
        assert!(!Filter::new().eq("address", json!({ "city": "Oslo" })).matches(&document));
    }

    #[test]
    fn apply_preserves_order() {
        let documents = vec![
            doc(json!({ "id": "1", "kind": "a" })),
            doc(json!({ "id": "2", "kind": "b" })),
            doc(json!({ "id": "3", "kind": "a" })),
        ];

        let ids = Filter::new()
            .eq("kind", "a")
            .apply(documents)
            .into_iter()
            .map(|d| d[ID_FIELD].clone())
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![json!("1"), json!("3")]);
    }

    #[test]
    fn filters_convert_from_values() {
        let filter = Filter::try_from(json!({ "id": "x" })).unwrap();
        assert_eq!(filter, Filter::by_id("x"));

        assert!(matches!(
            Filter::try_from(json!("x")),
            Err(DocumentStoreError::NotARecord("string"))
        ));

        let collected = [("a", 1), ("b", 2)].into_iter().collect::<Filter>();
        assert_eq!(collected.len(), 2);
    }
}
