//! Ordered string property bags.
//!
//! Bags are shared (`Arc<PropertyBag>`) between the object they configure and
//! any property-bag handles handed out for it, so all access goes through an
//! internal lock.

pub mod ids;

pub use ids::{per_language_endpoint_key, PropertyId};

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Default)]
pub struct PropertyBag {
    values: RwLock<IndexMap<String, String>>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    pub fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(name.into(), value.into());
    }

    /// `true` if `name` holds a non-empty value.
    pub fn has_string_value(&self, name: &str) -> bool {
        self.values
            .read()
            .get(name)
            .is_some_and(|value| !value.is_empty())
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.values.write().shift_remove(name)
    }

    pub fn get_property(&self, id: PropertyId) -> Option<String> {
        self.get(id.name())
    }

    pub fn set_property(&self, id: PropertyId, value: impl Into<String>) {
        self.set(id.name(), value);
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.values.read().clone()
    }

    /// Merge every entry of `source` into this bag.
    ///
    /// Source values win on collision; keys only present here are kept.
    /// Existing keys keep their position, new keys are appended in source order.
    pub fn copy_from(&self, source: &PropertyBag) {
        if std::ptr::eq(self, source) {
            return;
        }
        let incoming = source.snapshot();
        let mut values = self.values.write();
        for (name, value) in incoming {
            values.insert(name, value);
        }
    }
}

impl From<IndexMap<String, String>> for PropertyBag {
    fn from(values: IndexMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }
}

impl Serialize for PropertyBag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.values.read().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IndexMap::<String, String>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(&str, &str)]) -> PropertyBag {
        let bag = PropertyBag::new();
        for (k, v) in entries {
            bag.set(*k, *v);
        }
        bag
    }

    #[test]
    fn copy_from_overwrites_collisions_and_keeps_destination_keys() {
        let dest = bag(&[("a", "1"), ("b", "2")]);
        let src = bag(&[("b", "20"), ("c", "30")]);

        dest.copy_from(&src);

        let merged: Vec<_> = dest.snapshot().into_iter().collect();
        assert_eq!(
            merged,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "20".to_string()),
                ("c".to_string(), "30".to_string()),
            ]
        );
        assert_eq!(src.len(), 2);
    }

    #[test]
    fn copy_from_self_is_a_no_op() {
        let b = bag(&[("a", "1")]);
        b.copy_from(&b);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn empty_value_is_not_a_string_value() {
        let b = bag(&[("empty", ""), ("full", "x")]);
        assert!(!b.has_string_value("empty"));
        assert!(b.has_string_value("full"));
        assert!(!b.has_string_value("missing"));
    }

    #[test]
    fn typed_ids_use_their_string_keys() {
        let b = PropertyBag::new();
        b.set_property(PropertyId::SpeechServiceConnectionRegion, "westus");
        assert_eq!(b.get("SPEECH-Region").as_deref(), Some("westus"));
        assert_eq!(
            b.get_property(PropertyId::SpeechServiceConnectionRegion)
                .as_deref(),
            Some("westus")
        );
    }

    #[test]
    fn serializes_as_ordered_json_object() {
        let b = bag(&[("z", "1"), ("a", "2")]);
        let json = serde_json::to_string(&b).expect("serialize bag");
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);

        let parsed: PropertyBag = serde_json::from_str(&json).expect("deserialize bag");
        assert_eq!(parsed.get("a").as_deref(), Some("2"));
    }
}
