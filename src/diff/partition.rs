use std::collections::HashSet;

use crate::core::types::RowKey;

/// Row keys split into those shared by both tables and those unique to one.
///
/// Each list holds distinct keys in the order they first appear in their
/// table (file 1 for `common`); reporting order is applied later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub common: Vec<RowKey>,
    pub unique_to_1: Vec<RowKey>,
    pub unique_to_2: Vec<RowKey>,
}

impl Partition {
    /// Partition the distinct keys of two tables by exact string equality
    #[must_use]
    pub fn new(keys1: &[RowKey], keys2: &[RowKey]) -> Self {
        let set1: HashSet<&RowKey> = keys1.iter().collect();
        let set2: HashSet<&RowKey> = keys2.iter().collect();

        let mut seen = HashSet::new();
        let mut partition = Self::default();

        for key in keys1 {
            if !seen.insert(key) {
                continue;
            }
            if set2.contains(key) {
                partition.common.push(key.clone());
            } else {
                partition.unique_to_1.push(key.clone());
            }
        }

        let mut seen = HashSet::new();
        for key in keys2 {
            if seen.insert(key) && !set1.contains(key) {
                partition.unique_to_2.push(key.clone());
            }
        }

        partition
    }

    /// Number of distinct keys across both tables
    #[must_use]
    pub fn total(&self) -> usize {
        self.common.len() + self.unique_to_1.len() + self.unique_to_2.len()
    }

    #[must_use]
    pub fn has_unique(&self) -> bool {
        !self.unique_to_1.is_empty() || !self.unique_to_2.is_empty()
    }
}
