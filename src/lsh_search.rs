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
//! Signature-path search: MinHash matrix, band bucketing, verification.

use dashmap::DashSet;
use rayon::prelude::*;
use tracing::info;

use crate::config::SearchConfig;
use crate::hash::HashFunctionFamily;
use crate::lsh::{CandidateMode, LshBucketer};
use crate::pair::{PairSet, SimilarPair};
use crate::search::SimilaritySearch;
use crate::shingle::ShingleSet;
use crate::signature::{SignatureBuilder, SignatureMatrix};
use crate::source::DocumentSource;
use crate::verify::{Verification, exact_jaccard, exceeds_threshold, signature_similarity};
use crate::{Result, SearchError, validate_threshold};

/// Approximate search through MinHash signatures and banded LSH.
///
/// Pairs colliding in at least one band are scored (on their signatures, or
/// exactly with [`Verification::Exact`]) and kept when strictly above the
/// threshold. Pairs with similarity above the threshold can be missed when
/// they collide in no band.
///
/// # Example
/// ```rust
/// use neardup::hash::HashFunctionFamily;
/// use neardup::lsh::LshBucketer;
/// use neardup::lsh_search::LshSearch;
/// use neardup::search::SimilaritySearch;
/// use neardup::shingle::Shingler;
/// use neardup::source::TextSource;
///
/// let bucketer = LshBucketer::new(20, 5, 9999).unwrap();
/// let family = HashFunctionFamily::with_seed(bucketer.sig_rows(), 1_000_000, 3).unwrap();
/// let shingler = Shingler::new(3, 1_000_000).unwrap();
/// let docs = ["a b c d e f g h", "a b c d e f g h", "z y x w v u"];
///
/// let search = LshSearch::new(TextSource::new(docs, shingler), family, bucketer).unwrap();
/// let pairs = search.search(0.9).unwrap();
/// assert_eq!(pairs.len(), 1);
/// assert!(pairs.contains(0, 1));
/// ```
#[derive(Debug)]
pub struct LshSearch<S> {
    source: S,
    family: HashFunctionFamily,
    bucketer: LshBucketer,
    verification: Verification,
    parallel: bool,
    memoize: bool,
}

impl<S: DocumentSource> LshSearch<S> {
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] when the family size differs
    /// from `bucketer.sig_rows()`.
    pub fn new(source: S, family: HashFunctionFamily, bucketer: LshBucketer) -> Result<Self> {
        if family.len() != bucketer.sig_rows() {
            return Err(SearchError::InvalidParameter(
                "hash family size must equal lsh_bands * lsh_rows",
            ));
        }
        Ok(Self {
            source,
            family,
            bucketer,
            verification: Verification::Signature,
            parallel: true,
            memoize: true,
        })
    }

    /// Builds the search from a validated configuration, drawing the hash
    /// family from `config.seed` or from a random seed.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] for invalid parameters.
    pub fn from_config(config: &SearchConfig, source: S) -> Result<Self> {
        config.validate()?;
        let bucketer = config.bucketer()?;
        let family = match config.seed {
            Some(seed) => HashFunctionFamily::with_seed(bucketer.sig_rows(), config.n_shingles, seed)?,
            None => HashFunctionFamily::random(bucketer.sig_rows(), config.n_shingles)?,
        };
        Ok(Self::new(source, family, bucketer)?
            .verification(config.verification)
            .parallel(config.parallel)
            .memoize(config.memoize_shingle_hashes))
    }

    pub fn verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn family(&self) -> &HashFunctionFamily {
        &self.family
    }

    pub fn bucketer(&self) -> &LshBucketer {
        &self.bucketer
    }
}

impl<S: DocumentSource> SimilaritySearch for LshSearch<S> {
    fn search(self, threshold: f64) -> Result<PairSet> {
        validate_threshold(threshold)?;
        let builder = SignatureBuilder::new(&self.family)
            .parallel(self.parallel)
            .memoize(self.memoize);

        let (matrix, shingles) = match self.verification {
            Verification::Signature => (builder.build(self.source)?, None),
            Verification::Exact => {
                let (matrix, shingles) = builder.build_retaining(self.source)?;
                (matrix, Some(shingles))
            }
        };

        let pairs = verify_candidates(
            &self.bucketer,
            &matrix,
            shingles.as_deref(),
            threshold,
            self.parallel,
        )?;
        info!(
            docs = matrix.n_docs(),
            pairs = pairs.len(),
            "lsh search finished"
        );
        Ok(pairs)
    }
}

/// Scores every candidate pair of `matrix` once and keeps those strictly
/// above `threshold`.
///
/// With `shingles` the exact Jaccard similarity is used, otherwise the
/// signature estimate. A pair that collides in several bands is scored only
/// on its first collision, accepted or rejected: the score depends on the
/// fixed matrix alone. With a single band no pair can recur, and no record
/// of scored pairs is kept.
///
/// # Errors
/// Returns [`SearchError::InvalidParameter`] when the matrix does not match
/// the bucketer.
pub fn verify_candidates(
    bucketer: &LshBucketer,
    matrix: &SignatureMatrix,
    shingles: Option<&[ShingleSet]>,
    threshold: f64,
    parallel: bool,
) -> Result<PairSet> {
    bucketer.ensure_compatible(matrix)?;
    if shingles.is_some_and(|sets| sets.len() != matrix.n_docs()) {
        return Err(SearchError::InvalidParameter(
            "one shingle set per signature column is required",
        ));
    }

    let seen = scored_pairs_cache(bucketer);
    let score = |id1: usize, id2: usize| match shingles {
        Some(sets) => exact_jaccard(&sets[id1], &sets[id2]),
        None => signature_similarity(matrix, id1, id2),
    };
    let band_pairs = |band: usize| -> Result<(Vec<SimilarPair>, usize)> {
        let mut accepted = Vec::new();
        let mut scored = 0;
        bucketer.for_each_candidate(matrix, band, |id1, id2| {
            if seen.as_ref().is_some_and(|seen| !seen.insert((id1, id2))) {
                return;
            }
            scored += 1;
            let similarity = score(id1, id2);
            if exceeds_threshold(similarity, threshold) {
                accepted.extend(SimilarPair::new(id1, id2, similarity));
            }
        })?;
        Ok((accepted, scored))
    };

    let per_band: Vec<(Vec<SimilarPair>, usize)> = if parallel {
        (0..bucketer.bands())
            .into_par_iter()
            .map(band_pairs)
            .collect::<Result<_>>()?
    } else {
        (0..bucketer.bands()).map(band_pairs).collect::<Result<_>>()?
    };

    let candidates: usize = per_band.iter().map(|(_, scored)| scored).sum();
    info!(candidates, bands = bucketer.bands(), "candidates verified");
    Ok(per_band.into_iter().flat_map(|(pairs, _)| pairs).collect())
}

/// Record of pairs already scored, needed only when a pair can collide in
/// more than one band.
fn scored_pairs_cache(bucketer: &LshBucketer) -> Option<DashSet<(usize, usize)>> {
    match bucketer.mode() {
        CandidateMode::Banded => Some(DashSet::new()),
        CandidateMode::AllPairs => None,
    }
}
