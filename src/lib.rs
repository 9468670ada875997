//! Propbag - nested property bags with dotted-path access
//!
//! A [`Bag`] wraps a shared, insertion-ordered mapping and adds compound-path
//! reads and writes (`a.b.c`), attribute-style navigation that creates
//! intermediate levels on write, a placeholder read mode that mimics a typed
//! default instead of failing, and JSON (de)serialization.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod path;
pub mod bag;

// Re-export commonly used items for convenience
pub use crate::core::{BagOptions, Error, ErrorKind, Fallback, JsonFormat, Key, Map, MapRef, Result, Value};
pub use bag::{Attr, Bag, Deferred, Keys, Lookup};
pub use path::Resolver;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Install a tracing subscriber filtered by `RUST_LOG`
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Initializing {} v{}", NAME, VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        assert_eq!(NAME, "propbag");
    }
}
