//! Key iteration

use crate::core::types::{Key, MapRef};

/// Lazy iterator over the top-level keys of a mapping, in insertion order
///
/// Each step takes the read lock briefly; the mapping is not locked between
/// steps.
#[derive(Debug, Clone)]
pub struct Keys {
    map: MapRef,
    index: usize,
}

impl Keys {
    pub(crate) fn new(map: MapRef) -> Self {
        Self { map, index: 0 }
    }
}

impl Iterator for Keys {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        let key = self.map.read().get_index(self.index).map(|(k, _)| k.clone())?;
        self.index += 1;
        Some(key)
    }
}
