//! Compound-path access over nested mappings

pub mod resolver;

pub use resolver::Resolver;
