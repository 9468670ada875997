//! Compound-path resolution over nested mappings
//!
//! A compound path is a string key split on a separator, e.g. `a.b.c`
//! addresses `root["a"]["b"]["c"]`. Non-string keys are opaque and address a
//! single level of the root.
//!
//! Reads are tolerant: an absent segment or a non-mapping intermediate makes
//! the whole lookup report "not found". Writes never fail; they create or
//! replace intermediate mappings as needed.

use crate::core::types::{Key, Map, MapRef, Value};
use tracing::{debug, trace};

/// Stateless path algorithms parameterized by a separator
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    separator: &'a str,
}

impl<'a> Resolver<'a> {
    /// Create a resolver splitting paths on `separator`
    pub fn new(separator: &'a str) -> Self {
        Self { separator }
    }

    /// Separator this resolver splits on
    pub fn separator(&self) -> &str {
        self.separator
    }

    /// Split a path string into segments
    ///
    /// An empty separator never splits.
    pub fn segments<'p>(&self, path: &'p str) -> Vec<&'p str> {
        if self.separator.is_empty() {
            vec![path]
        } else {
            path.split(self.separator).collect()
        }
    }

    /// Resolve `ks` against `root`
    ///
    /// The empty path resolves to the root itself.
    pub fn lookup(&self, root: &MapRef, ks: &Key) -> Option<Value> {
        let path = match ks {
            Key::Str(path) => path,
            opaque => return root.read().get(opaque).cloned(),
        };

        if path.is_empty() {
            return Some(Value::Map(root.clone()));
        }

        let mut current = Value::Map(root.clone());
        let mut depth = 0usize;
        for segment in self.segments(path) {
            current = child(&current, segment)?;
            depth += 1;
        }

        trace!(path = %path, depth, "resolved compound path");
        (depth > 0).then_some(current)
    }

    /// Value at `ks`, or `default` when the path does not resolve
    pub fn get(&self, root: &MapRef, ks: &Key, default: Value) -> Value {
        self.lookup(root, ks).unwrap_or(default)
    }

    /// True if `ks` resolves to a value
    ///
    /// The empty path never exists.
    pub fn exists(&self, root: &MapRef, ks: &Key) -> bool {
        match ks {
            Key::Str(path) if path.is_empty() => false,
            _ => self.lookup(root, ks).is_some(),
        }
    }

    /// Assign `val` at `ks`, creating intermediate mappings
    ///
    /// The empty path replaces `root` when `val` is a mapping and returns the
    /// root. Any other path returns the assigned value.
    pub fn set(&self, root: &mut MapRef, ks: &Key, val: Value) -> Value {
        let path = match ks {
            Key::Str(path) => path,
            opaque => {
                root.write().insert(opaque.clone(), val.clone());
                return val;
            }
        };

        if path.is_empty() {
            if let Value::Map(map) = val {
                debug!("replacing root mapping");
                *root = map;
            }
            return Value::Map(root.clone());
        }

        let mut segments = self.segments(path);
        let last = segments.pop().unwrap_or_default();

        let mut node = root.clone();
        for segment in segments {
            node = child_map(&node, Key::from(segment));
        }

        node.write().insert(Key::from(last), val.clone());
        trace!(path = %path, "assigned compound path");
        val
    }

    /// Remove the value at `ks`
    ///
    /// Returns false without mutating anything when the path does not
    /// resolve.
    pub fn delete(&self, root: &MapRef, ks: &Key) -> bool {
        let path = match ks {
            Key::Str(path) => path,
            opaque => return root.write().shift_remove(opaque).is_some(),
        };

        if path.is_empty() {
            return false;
        }

        let mut segments = self.segments(path);
        let last = segments.pop().unwrap_or_default();

        let parent = if segments.is_empty() {
            Some(Value::Map(root.clone()))
        } else {
            self.lookup(root, &Key::Str(segments.join(self.separator)))
        };

        match parent {
            Some(Value::Map(map)) => {
                let removed = map.write().shift_remove(&Key::from(last)).is_some();
                if removed {
                    trace!(path = %path, "deleted compound path");
                }
                removed
            }
            _ => false,
        }
    }

    /// Shallow-combine `other` into `root`
    ///
    /// With `overwrite` the incoming values win on collision, otherwise the
    /// existing ones do. Nested mappings are never merged recursively.
    pub fn merge(&self, root: &MapRef, other: &MapRef, overwrite: bool) {
        // Snapshot first so merging a mapping into itself cannot deadlock
        let incoming: Map = other.snapshot();
        let count = incoming.len();

        let mut guard = root.write();
        for (k, v) in incoming {
            if overwrite || !guard.contains_key(&k) {
                guard.insert(k, v);
            }
        }

        debug!(count, overwrite, "merged mapping");
    }

    /// Shallow in-place update; incoming values always win
    pub fn update(&self, root: &MapRef, other: &MapRef) {
        self.merge(root, other, true);
    }
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new(crate::core::config::DEFAULT_SEPARATOR)
    }
}

/// Value under `segment` when `node` is a mapping
fn child(node: &Value, segment: &str) -> Option<Value> {
    node.as_map()?.read().get(&Key::from(segment)).cloned()
}

/// Mapping stored under `key`, replacing anything that is not a mapping
fn child_map(node: &MapRef, key: Key) -> MapRef {
    let mut guard = node.write();
    if let Some(Value::Map(existing)) = guard.get(&key) {
        return existing.clone();
    }

    let fresh = MapRef::default();
    guard.insert(key, Value::Map(fresh.clone()));
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::json;

    fn root(text: &str) -> MapRef {
        match json::from_str(text).unwrap() {
            Value::Map(map) => map,
            other => panic!("expected a mapping, got {:?}", other),
        }
    }

    fn key(s: &str) -> Key {
        Key::from(s)
    }

    #[test]
    fn test_get_nested_value() {
        let r = Resolver::default();
        let map = root(r#"{"path": {"to": {"value": 42}}}"#);

        assert_eq!(r.get(&map, &key("path.to.value"), Value::Null), Value::Int(42));
        assert_eq!(r.get(&map, &key("path.to.missing"), Value::from("d")), Value::from("d"));
    }

    #[test]
    fn test_get_through_scalar_returns_default() {
        let r = Resolver::default();
        let map = root(r#"{"a": {"b": 5}}"#);

        assert_eq!(r.get(&map, &key("a.b.c"), Value::from("missing")), Value::from("missing"));
        assert!(!r.exists(&map, &key("a.b.c")));
    }

    #[test]
    fn test_get_empty_path_returns_root() {
        let r = Resolver::default();
        let map = root(r#"{"a": 1}"#);

        let resolved = r.get(&map, &key(""), Value::Null);
        assert!(resolved.as_map().is_some_and(|m| m.ptr_eq(&map)));
        assert!(!r.exists(&map, &key("")));
    }

    #[test]
    fn test_custom_separator() {
        let r = Resolver::new("/");
        let map = root(r#"{"a": {"b.c": 1, "b": {"c": 2}}}"#);

        assert_eq!(r.get(&map, &key("a/b.c"), Value::Null), Value::Int(1));
        assert_eq!(r.get(&map, &key("a/b/c"), Value::Null), Value::Int(2));
    }

    #[test]
    fn test_opaque_keys_are_single_level() {
        let r = Resolver::default();
        let mut map = root("{}");

        r.set(&mut map, &Key::from(7), Value::from("seven"));
        assert!(r.exists(&map, &Key::from(7)));
        assert_eq!(r.get(&map, &Key::from(7), Value::Null), Value::from("seven"));
        assert!(!r.exists(&map, &key("7")));

        assert!(r.delete(&map, &Key::from(7)));
        assert!(!r.delete(&map, &Key::from(7)));
    }

    #[test]
    fn test_set_creates_intermediates() {
        let r = Resolver::default();
        let mut map = root("{}");

        let assigned = r.set(&mut map, &key("b.c.d"), Value::from(42));
        assert_eq!(assigned, Value::Int(42));
        assert_eq!(r.get(&map, &key("b.c.d"), Value::Null), Value::Int(42));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let r = Resolver::default();
        let mut map = root("{}");

        r.set(&mut map, &key("b.c.d"), Value::from(42));
        r.set(&mut map, &key("b.c.d.e"), Value::from(42));

        assert_eq!(r.get(&map, &key("b.c.d"), Value::Null), Value::from(root(r#"{"e": 42}"#)));
    }

    #[test]
    fn test_set_keeps_key_position_on_replace() {
        let r = Resolver::default();
        let mut map = root(r#"{"a": 1, "b": 2}"#);

        r.set(&mut map, &key("a.x"), Value::from(true));

        let keys: Vec<Key> = map.read().keys().cloned().collect();
        assert_eq!(keys, vec![key("a"), key("b")]);
    }

    #[test]
    fn test_set_empty_path_replaces_root() {
        let r = Resolver::default();
        let original = root(r#"{"a": 1}"#);
        let mut map = original.clone();
        let replacement = root(r#"{"z": 26}"#);

        let result = r.set(&mut map, &key(""), Value::Map(replacement.clone()));

        assert!(map.ptr_eq(&replacement));
        assert!(result.as_map().is_some_and(|m| m.ptr_eq(&replacement)));
        assert_eq!(original.len(), 1);
    }

    #[test]
    fn test_set_empty_path_ignores_scalar() {
        let r = Resolver::default();
        let original = root(r#"{"a": 1}"#);
        let mut map = original.clone();

        r.set(&mut map, &key(""), Value::from(5));
        assert!(map.ptr_eq(&original));
    }

    #[test]
    fn test_delete_nested() {
        let r = Resolver::default();
        let map = root(r#"{"a": {"b": {"c": 1, "d": 2}}}"#);

        assert!(r.delete(&map, &key("a.b.c")));
        assert!(!r.exists(&map, &key("a.b.c")));
        assert!(r.exists(&map, &key("a.b.d")));
    }

    #[test]
    fn test_delete_failures_do_not_mutate() {
        let r = Resolver::default();
        let map = root(r#"{"a": {"b": 1}}"#);
        let before = map.deep_clone();

        assert!(!r.delete(&map, &key("a.b.c")));
        assert!(!r.delete(&map, &key("x.y")));
        assert!(!r.delete(&map, &key("a.zz")));
        assert!(!r.delete(&map, &key("")));
        assert_eq!(map, before);
    }

    #[test]
    fn test_merge_precedence() {
        let r = Resolver::default();
        let map = root(r#"{"a": 0, "keep": true}"#);

        r.merge(&map, &root(r#"{"a": 1, "new": "n"}"#), true);
        assert_eq!(r.get(&map, &key("a"), Value::Null), Value::Int(1));
        assert_eq!(r.get(&map, &key("new"), Value::Null), Value::from("n"));

        let map = root(r#"{"a": 7}"#);
        r.merge(&map, &root(r#"{"a": 1, "b": 2}"#), false);
        assert_eq!(r.get(&map, &key("a"), Value::Null), Value::Int(7));
        assert_eq!(r.get(&map, &key("b"), Value::Null), Value::Int(2));
    }

    #[test]
    fn test_merge_is_shallow() {
        let r = Resolver::default();
        let map = root(r#"{"n": {"x": 1, "y": 2}}"#);

        r.update(&map, &root(r#"{"n": {"x": 9}}"#));

        assert_eq!(r.get(&map, &key("n.x"), Value::Null), Value::Int(9));
        assert!(!r.exists(&map, &key("n.y")));
    }

    #[test]
    fn test_merge_with_itself() {
        let r = Resolver::default();
        let map = root(r#"{"a": 1}"#);

        r.merge(&map, &map, true);
        assert_eq!(map.len(), 1);
    }
}
