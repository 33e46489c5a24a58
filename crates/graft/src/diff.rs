//! Identity based comparison of two versions of a collection.

use indexmap::IndexMap;
use std::{collections::BTreeSet, hash::Hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffState {
    /// Only in the modified collection.
    Added,

    /// In both collections. The instances may differ in content.
    Held,

    /// Only in the unmodified collection.
    Removed,
}

/// One element's fate between two versions of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDiff<T> {
    pub state: DiffState,

    /// Instance from the unmodified collection. `None` when added.
    pub source: Option<T>,

    /// Instance from the modified collection. `None` when removed.
    pub replacing: Option<T>,
}

/// A [`CollectionDiff`] of a list, with the positions the element occupies
/// on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDiff<T> {
    pub diff: CollectionDiff<T>,
    pub source_indexes: BTreeSet<usize>,
    pub replacer_indexes: BTreeSet<usize>,
}

impl<T> CollectionDiff<T> {
    fn new(source: Option<T>, replacing: Option<T>) -> CollectionDiff<T> {
        let state = match (&source, &replacing) {
            (Some(_), Some(_)) => DiffState::Held,
            (None, _) => DiffState::Added,
            (Some(_), None) => DiffState::Removed,
        };
        CollectionDiff {
            state,
            source,
            replacing,
        }
    }
}

impl<T> IndexedDiff<T> {
    /// True when the element occupies other positions than before.
    pub fn is_moved(&self) -> bool {
        self.diff.state == DiffState::Held && self.source_indexes != self.replacer_indexes
    }
}

/// Compares two unordered collections by `identity`.
///
/// Entries for the modified collection come first, in its order, followed
/// by the removed ones in their original order. When an identity occurs
/// more than once, its first instance represents it.
pub fn diff<T, K, F>(unmodified: &[T], modified: &[T], identity: F) -> Vec<CollectionDiff<T>>
where
    T: Clone,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    diff_list(unmodified, modified, identity)
        .into_iter()
        .map(|indexed| indexed.diff)
        .collect()
}

/// Compares two lists by `identity`, recording every index at which each
/// identity occurs on each side.
pub fn diff_list<T, K, F>(unmodified: &[T], modified: &[T], identity: F) -> Vec<IndexedDiff<T>>
where
    T: Clone,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let source = positions(unmodified, &identity);
    let mut replacer = positions(modified, &identity);

    let mut diffs = Vec::with_capacity(source.len().max(replacer.len()));

    for (key, (replacing, replacer_indexes)) in replacer.iter_mut() {
        let (source, source_indexes) = match source.get(key) {
            Some((source, indexes)) => (Some(source.clone()), indexes.clone()),
            None => (None, BTreeSet::new()),
        };
        diffs.push(IndexedDiff {
            diff: CollectionDiff::new(source, Some(replacing.clone())),
            source_indexes,
            replacer_indexes: std::mem::take(replacer_indexes),
        });
    }

    for (key, (source, source_indexes)) in source {
        if !replacer.contains_key(&key) {
            diffs.push(IndexedDiff {
                diff: CollectionDiff::new(Some(source), None),
                source_indexes,
                replacer_indexes: BTreeSet::new(),
            });
        }
    }

    diffs
}

fn positions<T, K, F>(items: &[T], identity: &F) -> IndexMap<K, (T, BTreeSet<usize>)>
where
    T: Clone,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut positions: IndexMap<K, (T, BTreeSet<usize>)> = IndexMap::new();
    for (index, item) in items.iter().enumerate() {
        positions
            .entry(identity(item))
            .or_insert_with(|| (item.clone(), BTreeSet::new()))
            .1
            .insert(index);
    }
    positions
}
