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
//! Property-based tests for similarity, pairs, and bucketing.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Jaccard similarity is symmetric and within [0, 1]
//! - Pairs are canonical and deduplicated
//! - Band keys tell apart differing band values
//! - Brute-force results respect the strict threshold

use std::collections::HashSet;

use neardup::brute_force::pairs_above_threshold;
use neardup::lsh::LshBucketer;
use neardup::pair::{PairSet, SimilarPair};
use neardup::shingle::{ShingleSet, Shingler};
use neardup::verify::exact_jaccard;
use proptest::prelude::*;

prop_compose! {
    fn arb_shingle_set()(ids in prop::collection::vec(0u32..200, 0..40)) -> ShingleSet {
        ids.into_iter().collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn jaccard_is_symmetric_and_bounded(a in arb_shingle_set(), b in arb_shingle_set()) {
        let forward = exact_jaccard(&a, &b);
        let backward = exact_jaccard(&b, &a);
        prop_assert_eq!(forward, backward);
        prop_assert!((0.0..=1.0).contains(&forward));
    }

    #[test]
    fn jaccard_of_set_with_itself(a in arb_shingle_set()) {
        let expected = if a.is_empty() { 0.0 } else { 1.0 };
        prop_assert_eq!(exact_jaccard(&a, &a), expected);
    }

    #[test]
    fn shingling_never_panics_and_stays_in_range(
        text in "\\PC{0,60}",
        k in 1usize..6,
        n_shingles in 1u32..5_000,
    ) {
        let shingler = Shingler::new(k, n_shingles).unwrap();
        let set = shingler.shingle(&text);
        prop_assert!(set.len() <= text.chars().count().saturating_sub(k - 1));
        prop_assert!(set.iter().all(|id| id < n_shingles));
    }

    #[test]
    fn pairs_are_canonical(left in 0usize..1_000, right in 0usize..1_000, similarity in 0.0f64..=1.0) {
        match SimilarPair::new(left, right, similarity) {
            Some(pair) => {
                prop_assert!(pair.id1() < pair.id2());
                prop_assert_eq!(pair, SimilarPair::new(right, left, 0.0).unwrap());
            }
            None => prop_assert_eq!(left, right),
        }
    }

    #[test]
    fn pair_set_deduplicates(items in prop::collection::vec((0usize..20, 0usize..20, 0.0f64..1.0), 0..60)) {
        let set: PairSet = items
            .iter()
            .filter_map(|&(left, right, similarity)| SimilarPair::new(left, right, similarity))
            .collect();
        let distinct: HashSet<(usize, usize)> = items
            .iter()
            .filter(|(left, right, _)| left != right)
            .map(|&(left, right, _)| (left.min(right), left.max(right)))
            .collect();
        prop_assert_eq!(set.len(), distinct.len());
    }

    #[test]
    fn band_keys_differ_for_differing_bands(
        left in prop::collection::vec(any::<u32>(), 4),
        right in prop::collection::vec(any::<u32>(), 4),
        seed in any::<u32>(),
    ) {
        prop_assume!(left != right);
        let bucketer = LshBucketer::new(3, 4, seed).unwrap();
        prop_assert_ne!(bucketer.band_key(&left), bucketer.band_key(&right));
    }

    #[test]
    fn brute_force_respects_threshold(
        documents in prop::collection::vec(arb_shingle_set(), 0..12),
        threshold in 0.0f64..1.0,
    ) {
        let pairs = pairs_above_threshold(&documents, threshold, false);
        for pair in pairs.iter() {
            prop_assert!(pair.id1() < pair.id2());
            prop_assert!(pair.similarity() > threshold);
            prop_assert_eq!(pair.similarity(), exact_jaccard(&documents[pair.id1()], &documents[pair.id2()]));
        }
        for id1 in 0..documents.len() {
            for id2 in id1 + 1..documents.len() {
                let similarity = exact_jaccard(&documents[id1], &documents[id2]);
                prop_assert_eq!(pairs.contains(id1, id2), similarity > threshold);
            }
        }
    }
}
