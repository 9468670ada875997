//! Placeholder for attribute reads of absent keys
//!
//! A [`Deferred`] records the chain of attribute names read past the point
//! where the mapping ran out. It never touches the mapping until it is
//! written to; then it materializes the whole chain as fresh nested mappings
//! under the mapping captured when it was created.
//!
//! Until written, it stands in for the configured default value: boolean,
//! numeric and comparison uses see `default_value`, text conversion sees
//! `default_string`. Either policy may instead raise its configured error.

use crate::core::config::{BagOptions, Fallback};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Key, MapRef, Value};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace};

/// Sentinel returned by [`Deferred::as_index`]
pub const MISSING_INDEX: i64 = -1;

/// Deferred write handle and typed-default stand-in for a missing path
#[derive(Clone)]
pub struct Deferred {
    root: MapRef,
    chain: Vec<String>,
    default_string: Fallback,
    default_value: Fallback,
}

impl Deferred {
    pub(crate) fn new(root: MapRef, key: &str, options: &BagOptions) -> Self {
        trace!(key, "attribute missing, deferring");
        Self {
            root,
            chain: vec![key.to_string()],
            default_string: options.default_string.clone(),
            default_value: options.default_value.clone(),
        }
    }

    /// Extend the chain by one more attribute
    pub fn attr(mut self, key: &str) -> Deferred {
        self.chain.push(key.to_string());
        self
    }

    /// Attribute names read so far
    pub fn segments(&self) -> &[String] {
        &self.chain
    }

    /// Dotted form of the chain
    pub fn path(&self) -> String {
        self.chain.join(".")
    }

    /// Materialize the chain and assign `value` under `key`
    pub fn set_attr(&self, key: &str, value: impl Into<Value>) -> Value {
        let value = value.into();
        let node = self.materialize(&self.chain);
        node.write().insert(Key::from(key), value.clone());
        debug!(path = %self.path(), key, "materialized deferred path");
        value
    }

    /// Assign `value` at the end of the chain
    ///
    /// The last attribute read becomes the key written; every earlier one is
    /// materialized as a nested mapping.
    pub fn assign(self, value: impl Into<Value>) -> Value {
        let value = value.into();
        let (last, parents) = match self.chain.split_last() {
            Some(split) => split,
            None => return value,
        };

        let node = self.materialize(parents);
        node.write().insert(Key::from(last.as_str()), value.clone());
        debug!(path = %self.path(), "materialized deferred path");
        value
    }

    /// Deleting through an unresolved chain always fails
    ///
    /// The error names the chain read so far; `key` itself was never reached.
    pub fn del_attr(&self, key: &str) -> Result<()> {
        trace!(path = %self.path(), key, "delete through missing chain");
        Err(Error::key_not_found(self.path()))
    }

    /// Invoking a placeholder always fails
    pub fn call(&self) -> Result<Value> {
        Err(Error::NotCallable { path: self.path() })
    }

    /// Boolean coercion of the default value
    pub fn as_bool(&self) -> Result<bool> {
        Ok(self.concrete()?.truthy())
    }

    /// Integer coercion of the default value
    pub fn as_int(&self) -> Result<i64> {
        self.concrete()?
            .to_int()
            .ok_or_else(|| self.coercion("int"))
    }

    /// Float coercion of the default value
    pub fn as_float(&self) -> Result<f64> {
        self.concrete()?
            .to_float()
            .ok_or_else(|| self.coercion("float"))
    }

    /// Index coercion
    ///
    /// There is no meaningful index for a missing path, so a successful
    /// coercion always yields [`MISSING_INDEX`].
    pub fn as_index(&self) -> Result<i64> {
        self.concrete()?;
        Ok(MISSING_INDEX)
    }

    /// Text conversion, governed by the default-string policy
    pub fn as_text(&self) -> Result<String> {
        match &self.default_string {
            Fallback::Raise(kind) => Err(self.raise(*kind)),
            Fallback::Value(value) => Ok(value.to_string()),
        }
    }

    /// Compare the default value with `other`
    ///
    /// Returns `Ok(None)` when `other` is not the same type as the default
    /// value.
    pub fn compare_to(&self, other: &Value) -> Result<Option<Ordering>> {
        let default = self.concrete()?;
        if !default.same_type(other) {
            return Ok(None);
        }
        Ok(default.partial_cmp(other))
    }

    /// `default == other`
    pub fn equals(&self, other: impl Into<Value>) -> Result<bool> {
        let other = other.into();
        let default = self.concrete()?;
        Ok(default.same_type(&other) && *default == other)
    }

    /// `default < other`
    pub fn lt(&self, other: impl Into<Value>) -> Result<bool> {
        self.ordered(other, |o| o == Ordering::Less)
    }

    /// `default <= other`
    pub fn le(&self, other: impl Into<Value>) -> Result<bool> {
        self.ordered(other, |o| o != Ordering::Greater)
    }

    /// `default > other`
    pub fn gt(&self, other: impl Into<Value>) -> Result<bool> {
        self.ordered(other, |o| o == Ordering::Greater)
    }

    /// `default >= other`
    pub fn ge(&self, other: impl Into<Value>) -> Result<bool> {
        self.ordered(other, |o| o != Ordering::Less)
    }

    fn ordered(&self, other: impl Into<Value>, test: impl Fn(Ordering) -> bool) -> Result<bool> {
        Ok(self.compare_to(&other.into())?.is_some_and(test))
    }

    fn concrete(&self) -> Result<&Value> {
        match &self.default_value {
            Fallback::Raise(kind) => Err(self.raise(*kind)),
            Fallback::Value(value) => Ok(value),
        }
    }

    fn raise(&self, kind: ErrorKind) -> Error {
        debug!(path = %self.path(), %kind, "raising configured default error");
        Error::Configured {
            kind,
            path: self.path(),
        }
    }

    fn coercion(&self, target: &'static str) -> Error {
        Error::Coercion {
            path: self.path(),
            target,
        }
    }

    /// Replace each segment with a fresh mapping, returning the innermost
    fn materialize(&self, segments: &[String]) -> MapRef {
        let mut node = self.root.clone();
        for segment in segments {
            let fresh = MapRef::default();
            node.write().insert(Key::from(segment.as_str()), Value::Map(fresh.clone()));
            node = fresh;
        }
        node
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("path", &self.path())
            .field("default_value", &self.default_value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deferred(options: &BagOptions) -> (MapRef, Deferred) {
        let root = MapRef::default();
        let d = Deferred::new(root.clone(), "a", options).attr("b").attr("c");
        (root, d)
    }

    #[test]
    fn test_chain_path() {
        let (_, d) = deferred(&BagOptions::default());

        assert_eq!(d.path(), "a.b.c");
        assert_eq!(d.segments().len(), 3);
    }

    #[test]
    fn test_reads_do_not_mutate() {
        let options = BagOptions::with_defaults(Fallback::value("x"), Fallback::value(0));
        let (root, d) = deferred(&options);

        let _ = d.as_bool();
        let _ = d.as_int();
        let _ = d.as_text();
        let _ = d.equals(0);

        assert!(root.is_empty());
    }

    #[test]
    fn test_set_attr_materializes_chain() {
        let (root, d) = deferred(&BagOptions::default());

        d.set_attr("d", 42);

        let text = crate::core::json::to_string(&Value::Map(root), &Default::default()).unwrap();
        assert_eq!(text, r#"{"a": {"b": {"c": {"d": 42}}}}"#);
    }

    #[test]
    fn test_assign_writes_last_segment() {
        let (root, d) = deferred(&BagOptions::default());

        d.assign("v");

        let text = crate::core::json::to_string(&Value::Map(root), &Default::default()).unwrap();
        assert_eq!(text, r#"{"a": {"b": {"c": "v"}}}"#);
    }

    #[test]
    fn test_write_overwrites_existing_scalar() {
        let root = MapRef::default();
        let d = Deferred::new(root.clone(), "a", &BagOptions::default());
        root.write().insert(Key::from("a"), Value::from(5));

        d.set_attr("b", 1);

        let a = root.read().get(&Key::from("a")).cloned();
        assert!(a.is_some_and(|v| v.is_map()));
    }

    #[test]
    fn test_delete_and_call_always_fail() {
        let (_, d) = deferred(&BagOptions::with_defaults(Fallback::value(1), Fallback::value(1)));

        let err = d.del_attr("x").unwrap_err();
        assert!(err.is_key_not_found());
        assert_eq!(err.to_string(), "No such key : a.b.c");

        let err = d.call().unwrap_err();
        assert_eq!(err.to_string(), "Not callable : a.b.c");
    }

    #[test]
    fn test_raising_policy() {
        let (_, d) = deferred(&BagOptions::default());

        for err in [
            d.as_bool().unwrap_err(),
            d.as_int().unwrap_err(),
            d.as_float().unwrap_err(),
            d.as_index().unwrap_err(),
            d.as_text().unwrap_err(),
            d.equals(1).unwrap_err(),
            d.lt(1).unwrap_err(),
        ] {
            assert_eq!(err.kind(), Some(ErrorKind::ValueError));
            assert!(err.to_string().contains("a.b.c"));
        }
    }

    #[test]
    fn test_typed_default_mimicry() {
        let options = BagOptions::with_defaults(Fallback::value(99), Fallback::value(99));
        let (_, d) = deferred(&options);

        assert!(d.equals(99).unwrap());
        assert!(!d.equals(98).unwrap());
        assert!(d.as_bool().unwrap());
        assert_eq!(d.as_int().unwrap(), 99);
        assert_eq!(d.as_float().unwrap(), 99.0);
        assert_eq!(d.as_index().unwrap(), MISSING_INDEX);
        assert_eq!(d.as_text().unwrap(), "99");
        assert!(d.lt(100).unwrap());
        assert!(d.ge(99).unwrap());
        assert!(!d.gt(99).unwrap());
    }

    #[test]
    fn test_type_mismatch_is_not_equal() {
        let options = BagOptions::with_defaults(Fallback::value(""), Fallback::value(99));
        let (_, d) = deferred(&options);

        assert!(!d.equals("99").unwrap());
        assert!(!d.equals(99.0).unwrap());
        assert!(!d.lt("zzz").unwrap());
        assert!(!d.ge(Value::Null).unwrap());
        assert_eq!(d.compare_to(&Value::from("99")).unwrap(), None);
    }

    #[test]
    fn test_null_default() {
        let options = BagOptions::with_defaults(ErrorKind::ValueError, Value::Null);
        let (_, d) = deferred(&options);

        assert!(!d.as_bool().unwrap());
        assert!(!d.gt(0).unwrap());
        assert!(!d.lt(0).unwrap());
        assert!(matches!(d.as_int(), Err(Error::Coercion { target: "int", .. })));
        assert!(d.as_text().is_err());
    }

    #[test]
    fn test_policies_are_independent() {
        let options = BagOptions::with_defaults(ErrorKind::TypeError, Fallback::value(0));
        let (_, d) = deferred(&options);

        assert_eq!(d.as_int().unwrap(), 0);
        assert_eq!(d.as_text().unwrap_err().kind(), Some(ErrorKind::TypeError));

        let options = BagOptions::with_defaults(Fallback::value("n/a"), ErrorKind::KeyError);
        let (_, d) = deferred(&options);

        assert_eq!(d.as_text().unwrap(), "n/a");
        assert_eq!(d.as_bool().unwrap_err().kind(), Some(ErrorKind::KeyError));
    }
}
