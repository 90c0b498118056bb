//! Chromosome lengths of the reference.

use log::warn;
use rustc_hash::FxHashMap;

/// Chromosome name to length in bp, one entry per reference sequence.
#[derive(Debug, Clone, Default)]
pub struct ChromosomeCatalog {
    lengths: FxHashMap<String, u64>,
}

impl ChromosomeCatalog {
    pub fn new() -> Self {
        ChromosomeCatalog::default()
    }

    /// Record a sequence length. Empty sequences carry no position and are skipped.
    pub fn insert(&mut self, name: impl Into<String>, length: u64) {
        let name = name.into();
        if length == 0 {
            warn!("Skipping empty sequence {}", name);
            return;
        }
        self.lengths.insert(name, length);
    }

    pub fn length(&self, name: &str) -> Option<u64> {
        self.lengths.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lengths.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ChromosomeCatalog {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut catalog = ChromosomeCatalog::new();
        for (name, length) in iter {
            catalog.insert(name, length);
        }
        catalog
    }
}
