use std::collections::hash_map::{Entry, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    AddedFirst,
    AddedAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    RemovedLast,
    RemovedButPresent,
    NotFound,
}

/// Hash-based multiset. Every stored element has a count of at least one;
/// an element whose count drops to zero is removed from the map.
#[derive(Debug, Clone)]
pub struct HashMultiSet<T> {
    counts: HashMap<T, usize>,
}

impl<T: Eq + Hash> HashMultiSet<T> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    pub fn add(&mut self, item: T) -> AddResult {
        match self.counts.entry(item) {
            Entry::Occupied(mut e) => {
                *e.get_mut() += 1;
                AddResult::AddedAgain
            }
            Entry::Vacant(e) => {
                e.insert(1);
                AddResult::AddedFirst
            }
        }
    }

    pub fn remove(&mut self, item: &T) -> RemoveResult {
        let Some(count) = self.counts.get_mut(item) else {
            return RemoveResult::NotFound;
        };
        if *count == 1 {
            self.counts.remove(item);
            RemoveResult::RemovedLast
        } else {
            *count -= 1;
            RemoveResult::RemovedButPresent
        }
    }

    /// Remove an element together with all of its occurrences.
    /// Returns the stored element and the count it had.
    pub fn take(&mut self, item: &T) -> Option<(T, usize)> {
        self.counts.remove_entry(item)
    }

    pub fn count(&self, item: &T) -> usize {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.counts.contains_key(item)
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct elements, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.counts.keys()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

impl<T: Eq + Hash> Default for HashMultiSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
