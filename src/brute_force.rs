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
//! Exhaustive all-pairs search over exact Jaccard similarity.
//!
//! Quadratic in the number of documents: meant for small corpora and as the
//! oracle the LSH search is measured against.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::pair::{PairSet, SimilarPair};
use crate::search::SimilaritySearch;
use crate::shingle::ShingleSet;
use crate::source::{DocumentSource, collect_documents};
use crate::verify::{exact_jaccard, exceeds_threshold};
use crate::{Result, validate_threshold};

/// Documents between two progress messages.
const PROGRESS_INTERVAL: usize = 10_000;

/// Compares every pair of documents from a source.
///
/// All shingle sets are held in memory at once.
#[derive(Debug)]
pub struct BruteForceSearch<S> {
    source: S,
    parallel: bool,
}

impl<S: DocumentSource> BruteForceSearch<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parallel: true,
        }
    }

    /// Spreads the outer loop over the rayon thread pool (default `true`).
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl<S: DocumentSource> SimilaritySearch for BruteForceSearch<S> {
    fn search(self, threshold: f64) -> Result<PairSet> {
        validate_threshold(threshold)?;
        let documents = collect_documents(self.source)?;
        let pairs = pairs_above_threshold(&documents, threshold, self.parallel);
        info!(docs = documents.len(), pairs = pairs.len(), "brute force search finished");
        Ok(pairs)
    }
}

/// Every pair `(i, j)`, `i < j`, of `documents` whose exact Jaccard similarity
/// is strictly above `threshold`.
pub fn pairs_above_threshold(documents: &[ShingleSet], threshold: f64, parallel: bool) -> PairSet {
    let row = |id1: usize| -> Vec<SimilarPair> {
        if id1 % PROGRESS_INTERVAL == 0 {
            debug!(doc = id1, "brute force progress");
        }
        let left = &documents[id1];
        documents[id1 + 1..]
            .iter()
            .enumerate()
            .filter_map(|(offset, right)| {
                let similarity = exact_jaccard(left, right);
                if exceeds_threshold(similarity, threshold) {
                    SimilarPair::new(id1, id1 + 1 + offset, similarity)
                } else {
                    None
                }
            })
            .collect()
    };

    if parallel {
        (0..documents.len())
            .into_par_iter()
            .map(row)
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    } else {
        (0..documents.len()).flat_map(row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{BruteForceSearch, pairs_above_threshold};
    use crate::search::SimilaritySearch;
    use crate::shingle::{ShingleSet, Shingler};
    use crate::source::{ShingleSetSource, TextSource};

    fn set(ids: &[u32]) -> ShingleSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn finds_pairs_strictly_above_threshold() {
        let documents = vec![set(&[1, 2, 3, 4]), set(&[1, 2, 3, 5]), set(&[1, 2, 3, 4]), set(&[9])];
        let pairs = pairs_above_threshold(&documents, 0.6, false);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.get(0, 2).unwrap().similarity(), 1.0);

        // 3 / 5 = 0.6 sits on the threshold and is excluded.
        assert!(!pairs.contains(0, 1));
        assert!(pairs_above_threshold(&documents, 0.59, false).contains(0, 1));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let documents: Vec<ShingleSet> = (0..40u32)
            .map(|doc| ((doc % 7)..(doc % 7 + 10)).collect())
            .collect();
        let sequential = pairs_above_threshold(&documents, 0.5, false);
        let parallel = pairs_above_threshold(&documents, 0.5, true);
        assert!(!sequential.is_empty());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn reference_scenario() {
        let shingler = Shingler::new(3, 1_000_000).unwrap();
        let source = TextSource::new(["abcde", "abcdf", "xyz12"], shingler);
        let pairs = BruteForceSearch::new(source).search(0.5).unwrap();

        // {abc, bcd, cde} vs {abc, bcd, cdf}: 2 / 4 = 0.5, not strictly above.
        assert!(pairs.is_empty());

        let source = TextSource::new(["abcde", "abcdf", "xyz12"], shingler);
        let pairs = BruteForceSearch::new(source).search(0.4).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.get(0, 1).unwrap().similarity(), 0.5);
    }

    #[test]
    fn trivial_corpora_have_no_pairs() {
        let single = ShingleSetSource::new(vec![set(&[1, 2])]);
        assert!(BruteForceSearch::new(single).search(0.0).unwrap().is_empty());

        let empty = ShingleSetSource::new(Vec::new());
        assert!(BruteForceSearch::new(empty).search(0.0).unwrap().is_empty());

        let blanks = ShingleSetSource::new(vec![ShingleSet::new(), ShingleSet::new()]);
        assert!(BruteForceSearch::new(blanks).search(0.0).unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_threshold() {
        let source = ShingleSetSource::new(vec![set(&[1])]);
        assert!(BruteForceSearch::new(source.clone()).search(-0.1).is_err());
        assert!(BruteForceSearch::new(source.clone()).search(1.5).is_err());
        assert!(BruteForceSearch::new(source).search(f64::NAN).is_err());
    }
}
