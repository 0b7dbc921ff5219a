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
//! Accuracy of an approximate result set against the brute-force oracle.

use std::collections::HashSet;

use crate::pair::PairSet;

/// Confusion counts over all `n (n - 1) / 2` document pairs.
///
/// Only pairs with similarity strictly above `cutoff` count as positives, in
/// the oracle and in the approximate set alike.
///
/// # Example
/// ```rust
/// use neardup::evaluation::PairEvaluation;
/// use neardup::pair::{PairSet, SimilarPair};
///
/// let truth: PairSet = [SimilarPair::new(0, 1, 0.95).unwrap(), SimilarPair::new(2, 3, 0.92).unwrap()]
///     .into_iter()
///     .collect();
/// let found: PairSet = [SimilarPair::new(0, 1, 0.97).unwrap()].into_iter().collect();
///
/// let evaluation = PairEvaluation::compare(&found, &truth, 4, 0.9);
/// assert_eq!(evaluation.true_positives, 1);
/// assert_eq!(evaluation.false_negatives, 1);
/// assert_eq!(evaluation.recall(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairEvaluation {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl PairEvaluation {
    /// Compares `found` against `truth` for a corpus of `n_docs` documents.
    pub fn compare(found: &PairSet, truth: &PairSet, n_docs: usize, cutoff: f64) -> Self {
        let positives = |pairs: &PairSet| -> HashSet<(usize, usize)> {
            pairs
                .iter()
                .filter(|pair| pair.similarity() > cutoff)
                .map(|pair| pair.ids())
                .collect()
        };
        let found = positives(found);
        let truth = positives(truth);

        let true_positives = found.intersection(&truth).count();
        let false_positives = found.len() - true_positives;
        let false_negatives = truth.len() - true_positives;
        let total = n_docs * n_docs.saturating_sub(1) / 2;
        let true_negatives = total.saturating_sub(true_positives + false_positives + false_negatives);

        Self {
            true_positives,
            false_positives,
            false_negatives,
            true_negatives,
        }
    }

    /// `tp / (tp + fp)`; `1.0` when nothing was reported.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `tp / (tp + fn)`; `1.0` when there was nothing to find.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// `fp / (fp + tn)`; `0.0` when there are no negatives.
    pub fn false_positive_rate(&self) -> f64 {
        let negatives = self.false_positives + self.true_negatives;
        if negatives == 0 {
            return 0.0;
        }
        self.false_positives as f64 / negatives as f64
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 1.0;
    }
    numerator as f64 / denominator as f64
}
