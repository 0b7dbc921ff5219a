// MIT License
//
// Copyright (c) 2026 Raja Lehtihet & Wael El Oraiby
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//
//! Search results: canonical document pairs and the deduplicated pair set.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::{Hash, Hasher};

/// Unordered document pair with its similarity.
///
/// IDs are stored with `id1 < id2`. Equality and hashing look at the IDs
/// only, so the same pair found twice with different scores is one pair.
#[derive(Debug, Clone, Copy)]
pub struct SimilarPair {
    id1: usize,
    id2: usize,
    similarity: f64,
}

impl SimilarPair {
    /// Creates a pair, ordering the IDs canonically.
    ///
    /// Returns `None` when `left == right`; a document is never paired with
    /// itself.
    pub fn new(left: usize, right: usize, similarity: f64) -> Option<Self> {
        match left.cmp(&right) {
            Ordering::Less => Some(Self {
                id1: left,
                id2: right,
                similarity,
            }),
            Ordering::Greater => Some(Self {
                id1: right,
                id2: left,
                similarity,
            }),
            Ordering::Equal => None,
        }
    }

    pub fn id1(&self) -> usize {
        self.id1
    }

    pub fn id2(&self) -> usize {
        self.id2
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    /// `(id1, id2)`, the identity of the pair.
    pub fn ids(&self) -> (usize, usize) {
        (self.id1, self.id2)
    }

    /// Orders by descending similarity, then ascending IDs.
    pub fn cmp_by_similarity_desc(&self, other: &Self) -> Ordering {
        other
            .similarity
            .total_cmp(&self.similarity)
            .then_with(|| self.ids().cmp(&other.ids()))
    }
}

impl PartialEq for SimilarPair {
    fn eq(&self, other: &Self) -> bool {
        self.ids() == other.ids()
    }
}

impl Eq for SimilarPair {}

impl Hash for SimilarPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ids().hash(state);
    }
}

/// Set of [`SimilarPair`]s keyed by `(id1, id2)`.
///
/// Inserting a pair that is already present keeps the first score.
///
/// # Example
/// ```rust
/// use neardup::pair::{PairSet, SimilarPair};
///
/// let mut pairs = PairSet::new();
/// assert!(pairs.insert(SimilarPair::new(3, 1, 0.8).unwrap()));
/// assert!(!pairs.insert(SimilarPair::new(1, 3, 0.9).unwrap()));
///
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs.get(3, 1).unwrap().similarity(), 0.8);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairSet {
    pairs: HashMap<(usize, usize), SimilarPair>,
}

impl PairSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Adds `pair` unless a pair with the same IDs exists.
    ///
    /// Returns `true` when the pair was new.
    pub fn insert(&mut self, pair: SimilarPair) -> bool {
        match self.pairs.entry(pair.ids()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(pair);
                true
            }
        }
    }

    /// Looks a pair up in either ID order.
    pub fn get(&self, left: usize, right: usize) -> Option<&SimilarPair> {
        self.pairs.get(&(left.min(right), left.max(right)))
    }

    pub fn contains(&self, left: usize, right: usize) -> bool {
        self.get(left, right).is_some()
    }

    /// Iterates in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SimilarPair> + '_ {
        self.pairs.values()
    }

    /// Pairs sorted by descending similarity, ties by ascending IDs.
    pub fn to_sorted_vec(&self) -> Vec<SimilarPair> {
        let mut sorted: Vec<SimilarPair> = self.pairs.values().copied().collect();
        sorted.sort_unstable_by(SimilarPair::cmp_by_similarity_desc);
        sorted
    }

    /// Moves every pair of `other` in, keeping existing scores on conflict.
    pub fn merge(&mut self, other: PairSet) {
        for pair in other.pairs.into_values() {
            self.insert(pair);
        }
    }
}

impl Extend<SimilarPair> for PairSet {
    fn extend<I: IntoIterator<Item = SimilarPair>>(&mut self, iter: I) {
        for pair in iter {
            self.insert(pair);
        }
    }
}

impl FromIterator<SimilarPair> for PairSet {
    fn from_iter<I: IntoIterator<Item = SimilarPair>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for PairSet {
    type Item = SimilarPair;
    type IntoIter = std::collections::hash_map::IntoValues<(usize, usize), SimilarPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_values()
    }
}
