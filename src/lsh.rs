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
//! Band bucketing over a signature matrix and candidate-pair generation.
//!
//! The `sig_rows = bands x rows` signature rows are cut into `bands`
//! contiguous bands. Within one band every document's sub-signature is hashed
//! to a bucket key, and documents that land in the same bucket become
//! candidate pairs. Two documents with Jaccard similarity `s` become a
//! candidate with probability `1 - (1 - s^rows)^bands`.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use crate::hash::murmur3_64;
use crate::signature::SignatureMatrix;
use crate::{Result, SearchError};

/// Bucket seed used when none is configured.
pub const DEFAULT_BUCKET_SEED: u32 = 9999;

/// How candidate pairs are produced from the signature matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateMode {
    /// Documents colliding in at least one band.
    Banded,
    /// A single band spans the whole signature, which would only pair exact
    /// signature duplicates. Every pair of non-empty documents is a candidate
    /// instead and is judged on its full signature.
    AllPairs,
}

/// Probability that two documents with similarity `similarity` share at least
/// one of `bands` buckets of `rows` rows each.
///
/// # Example
/// ```rust
/// use neardup::lsh::candidate_probability;
///
/// let low = candidate_probability(0.3, 5, 20);
/// let high = candidate_probability(0.9, 5, 20);
/// assert!(low < 0.1 && high > 0.99);
/// ```
pub fn candidate_probability(similarity: f64, rows: usize, bands: usize) -> f64 {
    let band_match = similarity.clamp(0.0, 1.0).powf(rows as f64);
    1.0 - (1.0 - band_match).powf(bands as f64)
}

/// Similarity at which the S-curve is steepest, approximately `(1/bands)^(1/rows)`.
pub fn s_curve_threshold(rows: usize, bands: usize) -> f64 {
    (1.0 / bands as f64).powf(1.0 / rows as f64)
}

/// Splits signatures into bands and groups documents by band bucket.
///
/// # Example
/// ```rust
/// use neardup::hash::HashFunctionFamily;
/// use neardup::lsh::LshBucketer;
/// use neardup::shingle::Shingler;
/// use neardup::signature::SignatureBuilder;
/// use neardup::source::TextSource;
///
/// let bucketer = LshBucketer::new(16, 2, 9999).unwrap();
/// let family = HashFunctionFamily::with_seed(bucketer.sig_rows(), 100_000, 5).unwrap();
/// let shingler = Shingler::new(3, 100_000).unwrap();
/// let docs = ["near duplicate text", "near duplicate text", "something else"];
///
/// let matrix = SignatureBuilder::new(&family)
///     .build(TextSource::new(docs, shingler))
///     .unwrap();
/// let candidates = bucketer.candidate_pairs(&matrix).unwrap();
/// assert!(candidates.contains(&(0, 1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LshBucketer {
    bands: usize,
    rows: usize,
    seed: u32,
}

impl LshBucketer {
    /// Creates a bucketer for `bands` bands of `rows` rows each.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] when either dimension is zero
    /// or their product overflows.
    pub fn new(bands: usize, rows: usize, seed: u32) -> Result<Self> {
        if bands == 0 {
            return Err(SearchError::InvalidParameter(
                "lsh_bands must be greater than zero",
            ));
        }
        if rows == 0 {
            return Err(SearchError::InvalidParameter(
                "lsh_rows must be greater than zero",
            ));
        }
        if bands.checked_mul(rows).is_none() {
            return Err(SearchError::InvalidParameter(
                "lsh_bands * lsh_rows overflows",
            ));
        }
        Ok(Self { bands, rows, seed })
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Signature rows this bucketer expects: `bands * rows`.
    pub fn sig_rows(&self) -> usize {
        self.bands * self.rows
    }

    pub fn mode(&self) -> CandidateMode {
        if self.bands == 1 {
            CandidateMode::AllPairs
        } else {
            CandidateMode::Banded
        }
    }

    /// Hashes one band of a signature to its bucket key.
    ///
    /// Every value is encoded as four big-endian bytes before hashing, so the
    /// boundary between rows is fixed and `[1, 23, 4]` can never encode like
    /// `[12, 3, 4]`.
    pub fn band_key(&self, band_values: &[u32]) -> u64 {
        let mut bytes = Vec::with_capacity(band_values.len() * 4);
        for value in band_values {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        murmur3_64(&bytes, self.seed)
    }

    /// Groups the non-empty documents of `band` by bucket key.
    ///
    /// Documents inside a bucket are in ascending ID order.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] when the matrix shape does not
    /// match this bucketer or `band` is out of range.
    pub fn buckets(&self, matrix: &SignatureMatrix, band: usize) -> Result<HashMap<u64, Vec<usize>>> {
        self.ensure_compatible(matrix)?;
        if band >= self.bands {
            return Err(SearchError::InvalidParameter("band index out of range"));
        }
        Ok(self.band_buckets(matrix, band))
    }

    /// Calls `visit(id1, id2)` with `id1 < id2` for every candidate pair of
    /// `band`. Pairs are visited once per band, but may recur across bands.
    ///
    /// In [`CandidateMode::AllPairs`] the single band yields every pair of
    /// non-empty documents.
    ///
    /// # Errors
    /// Same conditions as [`LshBucketer::buckets`].
    pub fn for_each_candidate<F>(&self, matrix: &SignatureMatrix, band: usize, mut visit: F) -> Result<()>
    where
        F: FnMut(usize, usize),
    {
        self.ensure_compatible(matrix)?;
        if band >= self.bands {
            return Err(SearchError::InvalidParameter("band index out of range"));
        }

        match self.mode() {
            CandidateMode::AllPairs => {
                let docs: Vec<usize> = (0..matrix.n_docs())
                    .filter(|&doc| !matrix.is_empty_column(doc))
                    .collect();
                visit_all_pairs(&docs, &mut visit);
            }
            CandidateMode::Banded => {
                let buckets = self.band_buckets(matrix, band);
                let largest = buckets.values().map(Vec::len).max().unwrap_or(0);
                debug!(band, buckets = buckets.len(), largest, "band bucketed");
                for docs in buckets.values() {
                    visit_all_pairs(docs, &mut visit);
                }
            }
        }
        Ok(())
    }

    /// Collects the distinct candidate pairs across all bands, bucketing the
    /// bands in parallel.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] when the matrix shape does not
    /// match this bucketer.
    pub fn candidate_pairs(&self, matrix: &SignatureMatrix) -> Result<HashSet<(usize, usize)>> {
        self.ensure_compatible(matrix)?;
        let per_band = (0..self.bands)
            .into_par_iter()
            .map(|band| -> Result<Vec<(usize, usize)>> {
                let mut pairs = Vec::new();
                self.for_each_candidate(matrix, band, |id1, id2| pairs.push((id1, id2)))?;
                Ok(pairs)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(per_band.into_iter().flatten().collect())
    }

    pub(crate) fn ensure_compatible(&self, matrix: &SignatureMatrix) -> Result<()> {
        if matrix.sig_rows() != self.sig_rows() {
            return Err(SearchError::InvalidParameter(
                "signature rows must equal lsh_bands * lsh_rows",
            ));
        }
        Ok(())
    }

    fn band_buckets(&self, matrix: &SignatureMatrix, band: usize) -> HashMap<u64, Vec<usize>> {
        let start = band * self.rows;
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        for doc in 0..matrix.n_docs() {
            if matrix.is_empty_column(doc) {
                continue;
            }
            let key = self.band_key(matrix.band(doc, start, self.rows));
            buckets.entry(key).or_default().push(doc);
        }
        buckets
    }
}

fn visit_all_pairs<F: FnMut(usize, usize)>(docs: &[usize], visit: &mut F) {
    for (index, &id1) in docs.iter().enumerate() {
        for &id2 in &docs[index + 1..] {
            visit(id1, id2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CandidateMode, LshBucketer, candidate_probability, s_curve_threshold};
    use crate::hash::HashFunctionFamily;
    use crate::shingle::ShingleSet;
    use crate::signature::{SignatureBuilder, SignatureMatrix};
    use crate::source::ShingleSetSource;

    fn matrix_for(bucketer: &LshBucketer, docs: Vec<ShingleSet>) -> SignatureMatrix {
        let family = HashFunctionFamily::with_seed(bucketer.sig_rows(), 1_000_000, 42).unwrap();
        SignatureBuilder::new(&family)
            .build(ShingleSetSource::new(docs))
            .unwrap()
    }

    fn range(start: u32, end: u32) -> ShingleSet {
        (start..end).collect()
    }

    #[test]
    fn constructor_validates_parameters() {
        assert!(LshBucketer::new(0, 4, 1).is_err());
        assert!(LshBucketer::new(4, 0, 1).is_err());
        assert!(LshBucketer::new(usize::MAX, 2, 1).is_err());
        let bucketer = LshBucketer::new(8, 4, 1).unwrap();
        assert_eq!(bucketer.sig_rows(), 32);
        assert_eq!(bucketer.mode(), CandidateMode::Banded);
        assert_eq!(LshBucketer::new(1, 32, 1).unwrap().mode(), CandidateMode::AllPairs);
    }

    #[test]
    fn band_key_separates_row_boundaries() {
        let bucketer = LshBucketer::new(2, 3, 9999).unwrap();
        assert_ne!(bucketer.band_key(&[1, 23, 4]), bucketer.band_key(&[12, 3, 4]));
        assert_eq!(bucketer.band_key(&[1, 23, 4]), bucketer.band_key(&[1, 23, 4]));
    }

    #[test]
    fn band_key_depends_on_seed() {
        let left = LshBucketer::new(2, 3, 1).unwrap();
        let right = LshBucketer::new(2, 3, 2).unwrap();
        assert_ne!(left.band_key(&[5, 6, 7]), right.band_key(&[5, 6, 7]));
    }

    #[test]
    fn rejects_mismatched_matrix() {
        let bucketer = LshBucketer::new(4, 4, 1).unwrap();
        let other = LshBucketer::new(4, 2, 1).unwrap();
        let matrix = matrix_for(&other, vec![range(0, 10)]);
        assert!(bucketer.candidate_pairs(&matrix).is_err());
        assert!(bucketer.buckets(&matrix, 0).is_err());

        let matrix = matrix_for(&bucketer, vec![range(0, 10)]);
        assert!(bucketer.buckets(&matrix, 4).is_err());
    }

    #[test]
    fn identical_documents_share_every_bucket() {
        let bucketer = LshBucketer::new(8, 4, 9999).unwrap();
        let matrix = matrix_for(&bucketer, vec![range(0, 50), range(0, 50), range(500, 550)]);

        for band in 0..bucketer.bands() {
            let buckets = bucketer.buckets(&matrix, band).unwrap();
            assert!(buckets.values().any(|docs| docs == &vec![0, 1]));
        }
        let candidates = bucketer.candidate_pairs(&matrix).unwrap();
        assert!(candidates.contains(&(0, 1)));
        assert!(candidates.iter().all(|&(id1, id2)| id1 < id2));
    }

    #[test]
    fn empty_documents_are_never_bucketed() {
        let bucketer = LshBucketer::new(4, 2, 9999).unwrap();
        let matrix = matrix_for(&bucketer, vec![ShingleSet::new(), ShingleSet::new(), range(0, 5)]);

        for band in 0..bucketer.bands() {
            let buckets = bucketer.buckets(&matrix, band).unwrap();
            assert!(buckets.values().flatten().all(|&doc| doc == 2));
        }
        assert!(bucketer.candidate_pairs(&matrix).unwrap().is_empty());
    }

    #[test]
    fn single_band_pairs_every_non_empty_document() {
        let bucketer = LshBucketer::new(1, 16, 9999).unwrap();
        let docs = vec![range(0, 40), range(2, 42), ShingleSet::new(), range(1000, 1040)];
        let matrix = matrix_for(&bucketer, docs);

        let candidates = bucketer.candidate_pairs(&matrix).unwrap();
        assert_eq!(candidates.len(), 3);
        assert!(candidates.contains(&(0, 1)));
        assert!(candidates.contains(&(0, 3)));
        assert!(candidates.contains(&(1, 3)));
    }

    #[test]
    fn s_curve_is_monotone_in_bands_and_rows() {
        for similarity in [0.2, 0.5, 0.8] {
            assert!(candidate_probability(similarity, 4, 10) < candidate_probability(similarity, 4, 20));
            assert!(candidate_probability(similarity, 6, 10) < candidate_probability(similarity, 4, 10));
        }
        assert_eq!(candidate_probability(0.0, 4, 10), 0.0);
        assert_eq!(candidate_probability(1.0, 4, 10), 1.0);
    }

    #[test]
    fn s_curve_handles_dimensions_beyond_i32() {
        let huge = i32::MAX as usize + 2;
        assert!(candidate_probability(0.5, huge, 1) < 1e-12);
        assert!(candidate_probability(0.5, 1, huge) > 1.0 - 1e-12);
    }

    #[test]
    fn s_curve_threshold_matches_formula() {
        let threshold = s_curve_threshold(5, 20);
        assert!((threshold - 0.05_f64.powf(0.2)).abs() < 1e-12);
        assert!(candidate_probability(threshold, 5, 20) > 0.5);
    }
}
