//! Property bag, attribute navigation and deferred placeholders

pub mod attr;
pub mod container;
pub mod deferred;
pub mod iter;

pub use attr::{Attr, Lookup};
pub use container::Bag;
pub use deferred::{Deferred, MISSING_INDEX};
pub use iter::Keys;
