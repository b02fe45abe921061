//! In-memory table of loaded modules.

use crate::format::ENTRY_POINT;

/// Ordered (name, bytes) pairs decoded from a container.
///
/// Built once when a container is loaded and read many times afterwards.
/// Lookup is a linear scan and the first matching name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleTable {
    modules: Vec<(String, Vec<u8>)>,
}

impl ModuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` modules.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            modules: Vec::with_capacity(capacity),
        }
    }

    /// Append a module.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.modules.push((name.into(), bytes));
    }

    /// Bytes of the first module named `name`.
    pub fn lookup(&self, name: &str) -> Option<&[u8]> {
        self.modules
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Whether a module named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// The program entry point, if the table has one.
    pub fn entry_point(&self) -> Option<&[u8]> {
        self.lookup(ENTRY_POINT)
    }

    /// Module names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|(n, _)| n.as_str())
    }

    /// (name, bytes) pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.modules.iter().map(|(n, b)| (n.as_str(), b.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<u8>)> for ModuleTable {
    fn from_iter<I: IntoIterator<Item = (N, Vec<u8>)>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().map(|(n, b)| (n.into(), b)).collect(),
        }
    }
}
