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
//! Character shingling of documents into hashed shingle sets.

use crate::hash::murmur3_32;
use crate::{MAX_SHINGLES, Result, SearchError};

/// Seed of the MurmurHash3 call that maps a shingle string to its ID.
pub const SHINGLE_HASH_SEED: u32 = 1234;

/// Immutable set of shingle IDs for one document, kept sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShingleSet {
    ids: Vec<u32>,
}

impl ShingleSet {
    /// Returns the empty shingle set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Shingle IDs in ascending order.
    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Size of the intersection with `other`, by a merge walk of both sorted lists.
    pub fn intersection_len(&self, other: &Self) -> usize {
        let (mut left, mut right) = (0, 0);
        let mut shared = 0;
        while left < self.ids.len() && right < other.ids.len() {
            match self.ids[left].cmp(&other.ids[right]) {
                std::cmp::Ordering::Less => left += 1,
                std::cmp::Ordering::Greater => right += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    left += 1;
                    right += 1;
                }
            }
        }
        shared
    }
}

impl FromIterator<u32> for ShingleSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut ids: Vec<u32> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl<'a> IntoIterator for &'a ShingleSet {
    type Item = u32;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

/// Maps documents to sets of hashed `k`-character substrings.
///
/// # Example
/// ```rust
/// use neardup::shingle::Shingler;
///
/// let shingler = Shingler::new(3, 1_000).unwrap();
/// let shingles = shingler.shingle("abcde");
/// assert!(shingles.len() <= 3);
/// assert!(shingler.shingle("ab").is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shingler {
    k: usize,
    n_shingles: u32,
}

impl Shingler {
    /// Creates a shingler for `k`-character shingles hashed into `[0, n_shingles)`.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] when `k == 0`,
    /// `n_shingles == 0`, or `n_shingles > MAX_SHINGLES`.
    pub fn new(k: usize, n_shingles: u32) -> Result<Self> {
        if k == 0 {
            return Err(SearchError::InvalidParameter(
                "shingle_length must be greater than zero",
            ));
        }
        if n_shingles == 0 {
            return Err(SearchError::InvalidParameter(
                "n_shingles must be greater than zero",
            ));
        }
        if n_shingles > MAX_SHINGLES {
            return Err(SearchError::InvalidParameter(
                "n_shingles must not exceed 2^31 - 1",
            ));
        }
        Ok(Self { k, n_shingles })
    }

    pub fn shingle_length(&self) -> usize {
        self.k
    }

    pub fn n_shingles(&self) -> u32 {
        self.n_shingles
    }

    /// Maps one shingle string to its ID.
    pub fn shingle_id(&self, shingle: &str) -> u32 {
        let hash = murmur3_32(shingle.as_bytes(), SHINGLE_HASH_SEED) as i32;
        hash.unsigned_abs() % self.n_shingles
    }

    /// Returns the set of distinct shingle IDs of `doc`.
    ///
    /// Shingles are taken over characters, not bytes. A document shorter than
    /// `k` characters yields the empty set.
    pub fn shingle(&self, doc: &str) -> ShingleSet {
        let boundaries: Vec<usize> = doc
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(doc.len()))
            .collect();
        let chars = boundaries.len() - 1;
        if chars < self.k {
            return ShingleSet::new();
        }

        (0..=chars - self.k)
            .map(|start| self.shingle_id(&doc[boundaries[start]..boundaries[start + self.k]]))
            .collect()
    }
}
