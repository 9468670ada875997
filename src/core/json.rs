//! JSON text rendering
//!
//! Compact output uses `", "` and `": "` separators, pretty output indents
//! with a configurable width and can sort keys.

use crate::core::error::{Error, Result};
use crate::core::types::{Key, MapRef, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io;

/// JSON output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormat {
    /// Multi-line, indented output
    pub pretty: bool,
    /// Indent width in spaces when pretty
    pub indent: usize,
    /// Sort object keys when pretty
    pub sort_keys: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
            sort_keys: true,
        }
    }
}

impl JsonFormat {
    /// Single-line output
    pub fn compact() -> Self {
        Self::default()
    }

    /// Indented output with sorted keys
    pub fn pretty(indent: usize) -> Self {
        Self {
            pretty: true,
            indent,
            sort_keys: true,
        }
    }
}

/// Single-line formatter with a space after every separator
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serializes a value with every object's keys in sorted order
struct SortedKeys<'a>(&'a Value);

impl Serialize for SortedKeys<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(&SortedKeys(item))?;
                }
                seq.end()
            }
            Value::Map(map) => SortedMap(map).serialize(serializer),
            other => other.serialize(serializer),
        }
    }
}

struct SortedMap<'a>(&'a MapRef);

impl Serialize for SortedMap<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries: Vec<(Key, Value)> = self
            .0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by_cached_key(|(k, _)| k.to_string());

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (k, v) in &entries {
            map.serialize_entry(k, &SortedKeys(v))?;
        }
        map.end()
    }
}

/// Render a value as JSON text
///
/// Key sorting only applies to pretty output; compact output keeps
/// insertion order.
pub fn to_string(value: &Value, format: &JsonFormat) -> Result<String> {
    let mut out = Vec::with_capacity(128);

    if format.pretty {
        let indent = vec![b' '; format.indent];
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        if format.sort_keys {
            SortedKeys(value).serialize(&mut ser)?;
        } else {
            value.serialize(&mut ser)?;
        }
    } else {
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        value.serialize(&mut ser)?;
    }

    String::from_utf8(out).map_err(|e| Error::invalid_input(e.to_string()))
}

/// Parse JSON text into a value
pub fn from_str(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        from_str(r#"{"b": {"y": 1, "x": [true, null]}, "a": "z"}"#).unwrap()
    }

    #[test]
    fn test_compact_keeps_insertion_order() {
        let text = to_string(&sample(), &JsonFormat::compact()).unwrap();

        assert_eq!(text, r#"{"b": {"y": 1, "x": [true, null]}, "a": "z"}"#);
    }

    #[test]
    fn test_pretty_sorts_nested_keys() {
        let text = to_string(&sample(), &JsonFormat::pretty(2)).unwrap();

        assert_eq!(
            text,
            "{\n  \"a\": \"z\",\n  \"b\": {\n    \"x\": [\n      true,\n      null\n    ],\n    \"y\": 1\n  }\n}"
        );
    }

    #[test]
    fn test_pretty_unsorted_with_wide_indent() {
        let format = JsonFormat {
            pretty: true,
            indent: 4,
            sort_keys: false,
        };
        let value = from_str(r#"{"b": 1, "a": 2}"#).unwrap();

        assert_eq!(to_string(&value, &format).unwrap(), "{\n    \"b\": 1,\n    \"a\": 2\n}");
    }

    #[test]
    fn test_empty_object() {
        let value = from_str("{}").unwrap();

        assert_eq!(to_string(&value, &JsonFormat::compact()).unwrap(), "{}");
        assert_eq!(to_string(&value, &JsonFormat::pretty(2)).unwrap(), "{}");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(from_str("{not json"), Err(Error::Json(_))));
    }
}
