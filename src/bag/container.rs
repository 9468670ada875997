//! The property bag
//!
//! A [`Bag`] is a view over a shared mapping handle. Cloning a bag, wrapping
//! an existing handle, or reading a nested mapping through [`Bag::attr`] all
//! produce views over the same storage; [`Bag::copy`] and
//! [`Bag::deep_copy`] are the only ways to detach.
//!
//! ```
//! use propbag::Bag;
//!
//! let bag = Bag::from_pairs([("a", "b"), ("c", "d")]);
//! assert_eq!(bag.to_string(), r#"{"a": "b", "c": "d"}"#);
//!
//! bag.attr("b").attr("c").unwrap().attr("d").unwrap().set_attr("e", 42).unwrap();
//! assert_eq!(bag.to_string(), r#"{"a": "b", "c": "d", "b": {"c": {"d": {"e": 42}}}}"#);
//! ```

use crate::bag::attr::{Attr, Lookup};
use crate::bag::deferred::Deferred;
use crate::bag::iter::Keys;
use crate::core::config::{BagOptions, Fallback};
use crate::core::error::{Error, Result};
use crate::core::json::{self, JsonFormat};
use crate::core::types::{Key, Map, MapRef, Value};
use crate::path::Resolver;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Nested key-value container with compound-path access
#[derive(Clone, Default)]
pub struct Bag {
    map: MapRef,
    options: BagOptions,
}

impl Bag {
    /// Empty bag with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Bag over `map`
    ///
    /// A [`MapRef`] is shared, not copied; a plain [`Map`] is wrapped in a new
    /// handle.
    pub fn from_map(map: impl Into<MapRef>) -> Self {
        Self::with_options(map, BagOptions::default())
    }

    /// Bag over `map` with explicit options
    pub fn with_options(map: impl Into<MapRef>, options: BagOptions) -> Self {
        Self {
            map: map.into(),
            options,
        }
    }

    /// Empty bag with both default policies set
    pub fn with_defaults(default_string: impl Into<Fallback>, default_value: impl Into<Fallback>) -> Self {
        Self::with_options(
            MapRef::default(),
            BagOptions::with_defaults(default_string, default_value),
        )
    }

    /// New bag holding `pairs`
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new().with_entries(pairs)
    }

    /// Merge supplementary `pairs` into the mapping; they win on collision
    pub fn with_entries<K, V, I>(self, pairs: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        {
            let mut guard = self.map.write();
            for (k, v) in pairs {
                guard.insert(k.into(), v.into());
            }
        }
        self
    }

    /// Replace the default-string policy
    pub fn default_string(mut self, policy: impl Into<Fallback>) -> Self {
        self.options.default_string = policy.into();
        self
    }

    /// Replace the default-value policy
    pub fn default_value(mut self, policy: impl Into<Fallback>) -> Self {
        self.options.default_value = policy.into();
        self
    }

    /// Another view over the same mapping
    pub fn view(&self) -> Bag {
        self.clone()
    }

    /// View over the same mapping splitting paths on `separator`
    pub fn with_separator(&self, separator: impl Into<String>) -> Bag {
        Bag {
            map: self.map.clone(),
            options: self.options.clone().separator(separator),
        }
    }

    /// Options this bag was built with
    pub fn options(&self) -> &BagOptions {
        &self.options
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.options.separator)
    }

    fn child(&self, map: MapRef) -> Bag {
        Bag {
            map,
            options: self.options.clone(),
        }
    }

    // Item access: single level, strict

    /// Value stored under `key`
    pub fn get_item(&self, key: impl Into<Key>) -> Result<Value> {
        let key = key.into();
        let found = self.map.read().get(&key).cloned();
        found.ok_or_else(|| Error::key_not_found(&key))
    }

    /// Store `value` under `key`
    pub fn set_item(&self, key: impl Into<Key>, value: impl Into<Value>) {
        self.map.write().insert(key.into(), value.into());
    }

    /// Remove `key`
    pub fn del_item(&self, key: impl Into<Key>) -> Result<()> {
        let key = key.into();
        let removed = self.map.write().shift_remove(&key);
        removed.map(|_| ()).ok_or_else(|| Error::key_not_found(&key))
    }

    // Attribute access: single level, deferred on miss

    /// Read one attribute
    pub fn attr(&self, key: &str) -> Attr {
        let found = self.map.read().get(&Key::from(key)).cloned();
        match found {
            Some(Value::Map(map)) => Attr::Nested(self.child(map)),
            Some(value) => Attr::Found(value),
            None => Attr::Missing(Deferred::new(self.map.clone(), key, &self.options)),
        }
    }

    /// Read a chain of attributes, as `bag.a.b.c`
    ///
    /// An empty chain yields a view over this bag.
    pub fn attrs<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> Result<Attr> {
        keys.into_iter()
            .try_fold(Attr::Nested(self.view()), |attr, key| attr.attr(key))
    }

    /// Assign one attribute, overwriting whatever was there
    pub fn set_attr(&self, key: &str, value: impl Into<Value>) -> Value {
        let value = value.into();
        self.map.write().insert(Key::from(key), value.clone());
        value
    }

    /// Remove one attribute
    pub fn del_attr(&self, key: &str) -> Result<()> {
        self.del_item(key)
    }

    // Container protocol

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if there are no top-level keys
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// True if `key` is present at the top level
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.map.read().contains_key(&key.into())
    }

    /// Top-level keys in insertion order
    pub fn keys(&self) -> Keys {
        Keys::new(self.map.clone())
    }

    /// Alias for [`Bag::keys`]
    pub fn iter(&self) -> Keys {
        self.keys()
    }

    /// Snapshot of the top-level entries
    pub fn items(&self) -> Vec<(Key, Value)> {
        self.map
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of the top-level values
    pub fn values(&self) -> Vec<Value> {
        self.map.read().values().cloned().collect()
    }

    /// Remove every top-level key
    pub fn clear(&self) {
        self.map.write().clear();
    }

    /// Structural equality against a value
    ///
    /// Returns `None` when `other` is not a mapping and so cannot be compared.
    pub fn equals(&self, other: &Value) -> Option<bool> {
        other.as_map().map(|map| self.map == *map)
    }

    /// The backing mapping handle, shared
    pub fn as_dict(&self) -> MapRef {
        self.map.clone()
    }

    /// Bag over a shallow copy of the top level
    pub fn copy(&self) -> Bag {
        self.child(MapRef::new(self.map.snapshot()))
    }

    /// Bag over a fully independent copy
    pub fn deep_copy(&self) -> Bag {
        self.child(self.map.deep_clone())
    }

    // Compound-path operations

    /// Value at compound path `ks`, or `default`
    pub fn get(&self, ks: impl Into<Key>, default: impl Into<Value>) -> Value {
        self.resolver().get(&self.map, &ks.into(), default.into())
    }

    /// True if compound path `ks` resolves
    pub fn exists(&self, ks: impl Into<Key>) -> bool {
        self.resolver().exists(&self.map, &ks.into())
    }

    /// Assign `val` at compound path `ks`
    ///
    /// The empty path rebinds this bag to `val` when it is a mapping.
    pub fn set(&mut self, ks: impl Into<Key>, val: impl Into<Value>) -> Value {
        let resolver = Resolver::new(&self.options.separator);
        resolver.set(&mut self.map, &ks.into(), val.into())
    }

    /// Remove the value at compound path `ks`
    pub fn delete(&self, ks: impl Into<Key>) -> bool {
        self.resolver().delete(&self.map, &ks.into())
    }

    /// Like [`Bag::get`], wrapping a resolved mapping in a view
    pub fn bag(&self, ks: impl Into<Key>, default: impl Into<Value>) -> Lookup {
        match self.resolver().lookup(&self.map, &ks.into()) {
            Some(Value::Map(map)) => Lookup::Bag(self.child(map)),
            Some(value) => Lookup::Value(value),
            None => Lookup::Value(default.into()),
        }
    }

    /// Shallow-combine `other` into this bag
    pub fn merge(&self, other: impl AsRef<MapRef>, overwrite: bool) {
        self.resolver().merge(&self.map, other.as_ref(), overwrite);
    }

    /// Shallow in-place update from `other`
    pub fn update(&self, other: impl AsRef<MapRef>) {
        self.resolver().update(&self.map, other.as_ref());
    }

    // Serialization

    /// JSON text
    ///
    /// Compact output keeps insertion order; `indent` and `sort_keys` only
    /// apply when `pretty` is set.
    pub fn to_json(&self, pretty: bool, indent: usize, sort_keys: bool) -> Result<String> {
        self.to_json_with(&JsonFormat {
            pretty,
            indent,
            sort_keys,
        })
    }

    /// JSON text with explicit format settings
    pub fn to_json_with(&self, format: &JsonFormat) -> Result<String> {
        json::to_string(&Value::Map(self.map.clone()), format)
    }

    /// Replace the backing mapping with parsed JSON
    ///
    /// Other views keep the mapping they already had.
    pub fn from_json(&mut self, text: &str) -> Result<()> {
        match json::from_str(text)? {
            Value::Map(map) => {
                debug!(keys = map.len(), "loaded bag from JSON");
                self.map = map;
                Ok(())
            }
            other => Err(Error::invalid_input(format!(
                "expected a JSON object, found {}",
                other.type_name()
            ))),
        }
    }

    /// New bag from JSON text
    pub fn parse(text: &str) -> Result<Bag> {
        let mut bag = Bag::new();
        bag.from_json(text)?;
        Ok(bag)
    }

    /// Declarative form, e.g. `Bag(a="b", n={"x": 1})`
    pub fn repr(&self) -> String {
        let items: Vec<String> = self
            .map
            .read()
            .iter()
            .map(|(k, v)| format!("{}={}", k, literal(v)))
            .collect();
        format!("Bag({})", items.join(", "))
    }
}

/// JSON literal for `value`, quoting strings
fn literal(value: &Value) -> String {
    json::to_string(value, &JsonFormat::compact()).unwrap_or_else(|_| format!("{:?}", value))
}

impl From<MapRef> for Bag {
    fn from(map: MapRef) -> Self {
        Bag::from_map(map)
    }
}

impl From<Map> for Bag {
    fn from(map: Map) -> Self {
        Bag::from_map(map)
    }
}

impl From<&Bag> for Bag {
    fn from(bag: &Bag) -> Self {
        bag.view()
    }
}

impl From<Bag> for Value {
    fn from(bag: Bag) -> Self {
        Value::Map(bag.map)
    }
}

impl From<&Bag> for Value {
    fn from(bag: &Bag) -> Self {
        Value::Map(bag.map.clone())
    }
}

impl AsRef<MapRef> for Bag {
    fn as_ref(&self) -> &MapRef {
        &self.map
    }
}

impl<'a> IntoIterator for &'a Bag {
    type Item = Key;
    type IntoIter = Keys;

    fn into_iter(self) -> Keys {
        self.keys()
    }
}

impl PartialEq for Bag {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl PartialEq<Map> for Bag {
    fn eq(&self, other: &Map) -> bool {
        self.map == *other
    }
}

impl PartialEq<MapRef> for Bag {
    fn eq(&self, other: &MapRef) -> bool {
        self.map == *other
    }
}

impl fmt::Display for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_json_with(&JsonFormat::compact()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl Serialize for Bag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bag {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Map(map) => Ok(Bag::from_map(map)),
            other => Err(serde::de::Error::custom(format!(
                "expected a mapping, found {}",
                other.type_name()
            ))),
        }
    }
}
