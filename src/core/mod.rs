//! Core types and foundations
//!
//! This module contains the value model, error handling, configuration and
//! JSON rendering shared by the path resolver and the bag.

pub mod types;
pub mod error;
pub mod config;
pub mod json;

// Re-export commonly used items
pub use types::{Key, Map, MapRef, Value};
pub use error::{Error, ErrorKind, Result};
pub use config::{BagOptions, Fallback, DEFAULT_SEPARATOR};
pub use json::JsonFormat;
