//! Two-sided many-to-many relation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A set of `(left, right)` pairs indexed from both sides.
///
/// Both indices are private and only mutated together, so the view from one side is
/// always the exact mirror of the view from the other side. Pairs are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation<L: Ord, R: Ord> {
    forward: BTreeMap<L, BTreeSet<R>>,
    backward: BTreeMap<R, BTreeSet<L>>,
}

impl<L: Ord, R: Ord> Default for Relation<L, R> {
    fn default() -> Self {
        Self {
            forward: BTreeMap::new(),
            backward: BTreeMap::new(),
        }
    }
}

impl<L, R> Relation<L, R>
where
    L: Ord + Clone,
    R: Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the pair was already present.
    pub fn insert(&mut self, left: L, right: R) -> bool {
        let inserted = self
            .forward
            .entry(left.clone())
            .or_default()
            .insert(right.clone());
        if inserted {
            self.backward.entry(right).or_default().insert(left);
        }
        inserted
    }

    /// Returns `false` when the pair was not present.
    pub fn remove(&mut self, left: &L, right: &R) -> bool {
        let removed = detach(&mut self.forward, left, right);
        if removed {
            detach(&mut self.backward, right, left);
        }
        removed
    }

    pub fn contains(&self, left: &L, right: &R) -> bool {
        self.forward
            .get(left)
            .is_some_and(|rights| rights.contains(right))
    }

    /// Right-hand values paired with `left`, in ascending order.
    pub fn rights<'a>(&'a self, left: &L) -> impl Iterator<Item = &'a R> + use<'a, L, R> {
        self.forward.get(left).into_iter().flatten()
    }

    /// Left-hand values paired with `right`, in ascending order.
    pub fn lefts<'a>(&'a self, right: &R) -> impl Iterator<Item = &'a L> + use<'a, L, R> {
        self.backward.get(right).into_iter().flatten()
    }

    pub fn right_count(&self, left: &L) -> usize {
        self.forward.get(left).map_or(0, BTreeSet::len)
    }

    pub fn left_count(&self, right: &R) -> usize {
        self.backward.get(right).map_or(0, BTreeSet::len)
    }

    /// Drop every pair whose left side is `left`; returns the detached right values.
    pub fn remove_left(&mut self, left: &L) -> Vec<R> {
        let rights: Vec<R> = self
            .forward
            .remove(left)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for right in &rights {
            detach(&mut self.backward, right, left);
        }
        rights
    }

    /// Drop every pair whose right side is `right`; returns the detached left values.
    pub fn remove_right(&mut self, right: &R) -> Vec<L> {
        let lefts: Vec<L> = self
            .backward
            .remove(right)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for left in &lefts {
            detach(&mut self.forward, left, right);
        }
        lefts
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Every pair, ordered by left then right.
    pub fn pairs(&self) -> impl Iterator<Item = (&L, &R)> {
        self.forward
            .iter()
            .flat_map(|(l, rights)| rights.iter().map(move |r| (l, r)))
    }

    #[cfg(test)]
    fn is_mirrored(&self) -> bool {
        let forward_pairs: BTreeSet<(L, R)> = self
            .pairs()
            .map(|(l, r)| (l.clone(), r.clone()))
            .collect();
        let backward_pairs: BTreeSet<(L, R)> = self
            .backward
            .iter()
            .flat_map(|(r, lefts)| lefts.iter().map(move |l| (l.clone(), r.clone())))
            .collect();
        let no_empty_buckets = self.forward.values().all(|s| !s.is_empty())
            && self.backward.values().all(|s| !s.is_empty());
        forward_pairs == backward_pairs && no_empty_buckets
    }
}

fn detach<K: Ord, V: Ord>(index: &mut BTreeMap<K, BTreeSet<V>>, key: &K, value: &V) -> bool {
    let Some(values) = index.get_mut(key) else {
        return false;
    };
    let removed = values.remove(value);
    if values.is_empty() {
        index.remove(key);
    }
    removed
}
