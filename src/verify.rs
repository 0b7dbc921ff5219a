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
//! Similarity scores for candidate pairs and the threshold rule.

use serde::{Deserialize, Serialize};

use crate::shingle::ShingleSet;
use crate::signature::SignatureMatrix;

/// Common API for values that can report a Jaccard similarity in `[0, 1]`:
/// `0.0` for disjoint sets, `1.0` for identical non-empty sets.
///
/// # Example
/// ```rust
/// use neardup::shingle::ShingleSet;
/// use neardup::verify::JaccardIndex;
///
/// let left: ShingleSet = [1, 2, 3].into_iter().collect();
/// let right: ShingleSet = [2, 3, 4].into_iter().collect();
/// assert_eq!(left.jaccard_index(&right), 0.5);
/// ```
pub trait JaccardIndex {
    /// Returns `|A ∩ B| / |A ∪ B|`, or an estimate of it.
    fn jaccard_index(&self, other: &Self) -> f64;
}

impl JaccardIndex for ShingleSet {
    fn jaccard_index(&self, other: &Self) -> f64 {
        exact_jaccard(self, other)
    }
}

/// Exact Jaccard similarity; `0.0` when both sets are empty.
pub fn exact_jaccard(left: &ShingleSet, right: &ShingleSet) -> f64 {
    let shared = left.intersection_len(right);
    let union = left.len() + right.len() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

/// Fraction of signature rows on which `doc1` and `doc2` agree.
///
/// A document without shingles has an all-sentinel column; it scores `0.0`
/// against every document, itself and other empty documents included.
///
/// # Panics
/// Panics when `doc1` or `doc2` is not below `matrix.n_docs()`.
pub fn signature_similarity(matrix: &SignatureMatrix, doc1: usize, doc2: usize) -> f64 {
    if matrix.is_empty_column(doc1) || matrix.is_empty_column(doc2) {
        return 0.0;
    }
    let matching = matrix
        .column(doc1)
        .iter()
        .zip(matrix.column(doc2))
        .filter(|(left, right)| left == right)
        .count();
    matching as f64 / matrix.sig_rows() as f64
}

/// Pairs are kept only when strictly above the threshold; ties are dropped.
#[inline]
pub fn exceeds_threshold(similarity: f64, threshold: f64) -> bool {
    similarity > threshold
}

/// Score used to accept LSH candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    /// Agreement rate of the two MinHash signatures.
    #[default]
    Signature,
    /// Exact Jaccard over the retained shingle sets.
    Exact,
}
