//! Results of attribute-style navigation

use crate::bag::container::Bag;
use crate::bag::deferred::Deferred;
use crate::core::error::{Error, Result};
use crate::core::types::Value;

/// Outcome of reading one attribute
#[derive(Debug, Clone)]
pub enum Attr {
    /// Key present with a non-mapping value
    Found(Value),
    /// Key present with a mapping value, wrapped in a view
    Nested(Bag),
    /// Key absent
    Missing(Deferred),
}

impl Attr {
    /// Read the next attribute down the chain
    ///
    /// Fails only when the current value is present but is not a mapping.
    pub fn attr(self, key: &str) -> Result<Attr> {
        match self {
            Attr::Nested(bag) => Ok(bag.attr(key)),
            Attr::Missing(deferred) => Ok(Attr::Missing(deferred.attr(key))),
            Attr::Found(value) => Err(Error::NotNavigable {
                key: key.to_string(),
                found: value.type_name(),
            }),
        }
    }

    /// Assign `value` under `key` one level down
    pub fn set_attr(&self, key: &str, value: impl Into<Value>) -> Result<Value> {
        match self {
            Attr::Nested(bag) => Ok(bag.set_attr(key, value)),
            Attr::Missing(deferred) => Ok(deferred.set_attr(key, value)),
            Attr::Found(found) => Err(Error::NotNavigable {
                key: key.to_string(),
                found: found.type_name(),
            }),
        }
    }

    /// Delete `key` one level down
    pub fn del_attr(&self, key: &str) -> Result<()> {
        match self {
            Attr::Nested(bag) => bag.del_attr(key),
            Attr::Missing(deferred) => deferred.del_attr(key),
            Attr::Found(found) => Err(Error::NotNavigable {
                key: key.to_string(),
                found: found.type_name(),
            }),
        }
    }

    /// True if the attribute was absent
    pub fn is_missing(&self) -> bool {
        matches!(self, Attr::Missing(_))
    }

    /// Present value, nested mappings included
    pub fn value(&self) -> Option<Value> {
        match self {
            Attr::Found(value) => Some(value.clone()),
            Attr::Nested(bag) => Some(Value::Map(bag.as_dict())),
            Attr::Missing(_) => None,
        }
    }

    /// View over the nested mapping, if that is what was found
    pub fn into_bag(self) -> Option<Bag> {
        match self {
            Attr::Nested(bag) => Some(bag),
            _ => None,
        }
    }

    /// Placeholder, if the attribute was absent
    pub fn into_deferred(self) -> Option<Deferred> {
        match self {
            Attr::Missing(deferred) => Some(deferred),
            _ => None,
        }
    }

    /// Equality against `other`; missing attributes defer to the default
    pub fn equals(&self, other: impl Into<Value>) -> Result<bool> {
        let other = other.into();
        match self {
            Attr::Found(value) => Ok(*value == other),
            Attr::Nested(bag) => Ok(bag.equals(&other).unwrap_or(false)),
            Attr::Missing(deferred) => deferred.equals(other),
        }
    }

    /// Truthiness; missing attributes defer to the default
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Attr::Found(value) => Ok(value.truthy()),
            Attr::Nested(bag) => Ok(!bag.is_empty()),
            Attr::Missing(deferred) => deferred.as_bool(),
        }
    }

    /// Text form; missing attributes defer to the default string
    pub fn as_text(&self) -> Result<String> {
        match self {
            Attr::Found(value) => Ok(value.to_string()),
            Attr::Nested(bag) => bag.to_json(false, 0, false),
            Attr::Missing(deferred) => deferred.as_text(),
        }
    }
}

/// Outcome of [`Bag::bag`]
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Resolved to a non-mapping value, or to the supplied default
    Value(Value),
    /// Resolved to a mapping, wrapped in a view
    Bag(Bag),
}

impl Lookup {
    /// View over the resolved mapping
    pub fn into_bag(self) -> Option<Bag> {
        match self {
            Lookup::Bag(bag) => Some(bag),
            Lookup::Value(_) => None,
        }
    }

    /// Resolved value, mappings as shared handles
    pub fn into_value(self) -> Value {
        match self {
            Lookup::Value(value) => value,
            Lookup::Bag(bag) => Value::Map(bag.as_dict()),
        }
    }
}
