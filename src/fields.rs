//! Structured fields attached to loggers.
//!
//! [`Fields`] is a small insertion-ordered map from key to JSON value. Keys
//! are usually string literals (zero allocation through `Cow::Borrowed`);
//! runtime keys are owned.
//!
//! # Collision Policy
//!
//! Inserting a key that already exists replaces its value in place. Merging
//! `b` into `a` therefore yields `a ∪ b` with `b` winning every collision,
//! which is exactly the contract of logger field derivation.
//!
//! # Canonical Keys
//!
//! Well-known fields use fixed keys so log ingestion can match them across
//! services: [`ERR_KEY`], [`CUSTOMER_ID_KEY`], [`USER_ID_KEY`],
//! [`TRACE_ID_KEY`], [`SPAN_ID_KEY`], [`PANIC_KEY`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use smallvec::SmallVec;
use std::borrow::Cow;

/// Key for a flattened error chain.
pub const ERR_KEY: &str = "error";
/// Key for the customer a request is acting for.
pub const CUSTOMER_ID_KEY: &str = "customer-id";
/// Key for the authenticated user.
pub const USER_ID_KEY: &str = "user-id";
/// Key for the B3 trace identifier.
pub const TRACE_ID_KEY: &str = "x-b3-traceid";
/// Key for the B3 span identifier.
pub const SPAN_ID_KEY: &str = "x-b3-spanid";
/// Key for a recovered panic payload.
pub const PANIC_KEY: &str = "panic";

/// Field key: borrowed for literals, owned for runtime strings.
pub type FieldKey = Cow<'static, str>;

/// Field value as rendered into a record.
pub type FieldValue = Value;

/// Convert any serializable value into a field value.
///
/// Values that cannot be represented as JSON (for example maps with
/// non-string keys) are kept as a string describing the failure, so attaching
/// a field never fails.
pub fn to_field_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|err| Value::String(format!("<unserializable field: {err}>")))
}

/// Insertion-ordered key/value set with override-on-collision.
///
/// Inline capacity covers the usual handful of request fields without a heap
/// allocation for the backing storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: SmallVec<[(FieldKey, Value); 4]>,
}

impl Fields {
    /// Empty field set.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Insert or replace `key` with a serializable value.
    #[inline]
    pub fn insert(&mut self, key: impl Into<FieldKey>, value: impl Serialize) {
        self.insert_value(key, to_field_value(value));
    }

    /// Insert or replace `key` with an already-built JSON value.
    pub fn insert_value(&mut self, key: impl Into<FieldKey>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[inline]
    pub fn with(mut self, key: impl Into<FieldKey>, value: impl Serialize) -> Self {
        self.insert(key, value);
        self
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    /// True when `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no field is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// New set holding `self ∪ other`, `other` winning collisions.
    /// Neither input is modified.
    pub fn merged(&self, other: &Fields) -> Fields {
        let mut out = self.clone();
        for (key, value) in &other.entries {
            out.insert_value(key.clone(), value.clone());
        }
        out
    }
}

impl<K> FromIterator<(K, Value)> for Fields
where
    K: Into<FieldKey>,
{
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        fields.extend(iter);
        fields
    }
}

impl<K> Extend<(K, Value)> for Fields
where
    K: Into<FieldKey>,
{
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_value(key, value);
        }
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_overrides_in_place() {
        let mut fields = Fields::new();
        fields.insert("a", 1);
        fields.insert("b", 2);
        fields.insert("a", 3);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("a"), Some(&json!(3)));
        let keys: Vec<_> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn merged_prefers_right_and_leaves_inputs() {
        let left = Fields::new().with("shared", "left").with("only-left", true);
        let right = Fields::new().with("shared", "right").with("only-right", 7);

        let merged = left.merged(&right);
        assert_eq!(merged.get("shared"), Some(&json!("right")));
        assert_eq!(merged.get("only-left"), Some(&json!(true)));
        assert_eq!(merged.get("only-right"), Some(&json!(7)));

        assert_eq!(left.get("shared"), Some(&json!("left")));
        assert!(!left.contains_key("only-right"));
    }

    #[test]
    fn owned_keys_match_borrowed() {
        let mut fields = Fields::new();
        fields.insert(String::from("customer-id"), "c-1");
        fields.insert(CUSTOMER_ID_KEY, "c-2");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(CUSTOMER_ID_KEY), Some(&json!("c-2")));
    }

    #[test]
    fn unserializable_value_becomes_string() {
        use std::collections::HashMap;
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple key");

        let value = to_field_value(&bad);
        let text = value.as_str().expect("string placeholder");
        assert!(text.starts_with("<unserializable field:"));
    }

    #[test]
    fn serializes_as_ordered_map() {
        let fields = Fields::new().with("z", 1).with("a", "x");
        let rendered = serde_json::to_string(&fields).expect("serialize");
        assert_eq!(rendered, r#"{"z":1,"a":"x"}"#);
    }

    #[test]
    fn collects_from_pairs() {
        let fields: Fields = vec![("k", json!(1)), ("k", json!(2))].into_iter().collect();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("k"), Some(&json!(2)));
    }
}
