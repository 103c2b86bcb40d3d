//! Time-keyed dataset with frames derived on demand.
//!
//! The dataset is the only storage. Time keys are collected once from the
//! records (sorted, de-duplicated); a [`Frame`] is a filtered view that is
//! rebuilt each time it's asked for.

use super::traits::Item;
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::hash::Hash;

/// Records of one kind, partitioned by [`Item::time_key`]
#[derive(Clone, Debug)]
pub struct Dataset<I: Item> {
    items: Vec<I>,
}

/// Records sharing one time key (borrowed from the dataset)
#[derive(Clone, Debug)]
pub struct Frame<'a, I: Item> {
    pub key: I::Key,
    pub items: Vec<&'a I>,
}

impl<'a, I: Item> Frame<'a, I> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<I: Item> Dataset<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self { items }
    }

    /// Group records by `group`, merging members with `merge` in first-seen order.
    ///
    /// Mirrors the scatterplot's `(year, type)` roll-up that sums counts
    /// before any frame is derived.
    pub fn rollup<G, F, M>(items: Vec<I>, group: F, merge: M) -> Self
    where
        G: Hash + Eq,
        F: Fn(&I) -> G,
        M: Fn(&mut I, I),
    {
        let mut groups: IndexMap<G, I> = IndexMap::new();
        for item in items {
            match groups.entry(group(&item)) {
                Entry::Occupied(mut acc) => merge(acc.get_mut(), item),
                Entry::Vacant(slot) => {
                    slot.insert(item);
                }
            }
        }
        Self {
            items: groups.into_values().collect(),
        }
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct time keys, ascending
    pub fn time_keys(&self) -> Vec<I::Key> {
        let mut keys: Vec<I::Key> = self.items.iter().map(Item::time_key).collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Records with `time_key() == key`, in dataset order
    pub fn frame(&self, key: &I::Key) -> Frame<'_, I> {
        Frame {
            key: key.clone(),
            items: self.items.iter().filter(|i| &i.time_key() == key).collect(),
        }
    }

    /// Every record (the show-all view)
    pub fn all(&self) -> Vec<&I> {
        self.items.iter().collect()
    }

    /// Distinct identities in first-seen order (legend / band domain)
    pub fn identities(&self) -> Vec<String> {
        let mut seen: IndexMap<String, ()> = IndexMap::new();
        for item in &self.items {
            seen.entry(item.identity()).or_insert(());
        }
        seen.into_keys().collect()
    }
}
