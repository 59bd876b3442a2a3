use std::collections::HashMap;

/// A per-attribute interned string id. Ids are dense, starting at zero for
/// every attribute; the same literal interned under two attributes gets two
/// unrelated ids.
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash, Debug)]
pub struct StringId(pub(crate) usize);

impl StringId {
    /// Sentinel for an event-side string the interner has never seen. It
    /// compares unequal to every interned id.
    pub(crate) const UNKNOWN: StringId = StringId(usize::MAX);
}

/// The string table of a single attribute.
#[derive(Default, Debug)]
pub(crate) struct StringTable {
    by_values: HashMap<String, usize>,
}

impl StringTable {
    pub(crate) fn new() -> Self {
        Self {
            by_values: HashMap::new(),
        }
    }

    /// Read-only lookup, used when decoding events. Unknown strings map to
    /// the [`StringId::UNKNOWN`] sentinel.
    pub(crate) fn get(&self, value: &str) -> StringId {
        self.by_values
            .get(value)
            .map(|index| StringId(*index))
            .unwrap_or(StringId::UNKNOWN)
    }

    pub(crate) fn get_or_insert(&mut self, value: &str) -> StringId {
        let next = self.by_values.len();
        let index = self.by_values.entry(value.to_string()).or_insert(next);
        StringId(*index)
    }

    pub(crate) fn contains(&self, value: &str) -> bool {
        self.by_values.contains_key(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_values.len()
    }
}
