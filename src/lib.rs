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
//! Near-duplicate document search over large text corpora.
//!
//! Documents are shingled into sets of hashed k-character substrings, and
//! similar pairs are found either exhaustively or through MinHash signatures
//! and banded locality-sensitive hashing.
//!
//! The crate currently exposes:
//! - [`shingle::Shingler`] for turning text into [`shingle::ShingleSet`]s.
//! - [`hash::HashFunctionFamily`] for the universal hash family behind signatures.
//! - [`signature::SignatureBuilder`] for building a [`signature::SignatureMatrix`].
//! - [`lsh::LshBucketer`] for band bucketing and candidate generation.
//! - [`verify`] for exact and signature-estimated Jaccard similarity.
//! - [`brute_force::BruteForceSearch`] and [`lsh_search::LshSearch`], the two
//!   interchangeable [`search::SimilaritySearch`] strategies.
//! - [`pair::PairSet`] of canonical [`pair::SimilarPair`]s as search output.
//! - [`reader::TsvSource`], [`output::write_pairs`], and [`evaluation`] for the
//!   batch runner.
//!
//! # Example
//! ```rust
//! use neardup::brute_force::BruteForceSearch;
//! use neardup::search::SimilaritySearch;
//! use neardup::shingle::Shingler;
//! use neardup::source::TextSource;
//!
//! let shingler = Shingler::new(3, 10_000).unwrap();
//! let docs = ["the quick brown fox", "the quick brown fax", "lorem ipsum"];
//! let source = TextSource::new(docs, shingler);
//!
//! let pairs = BruteForceSearch::new(source).search(0.5).unwrap();
//! assert_eq!(pairs.len(), 1);
//! assert!(pairs.contains(0, 1));
//! ```

use thiserror::Error;

pub mod brute_force;
pub mod config;
pub mod evaluation;
pub mod hash;
pub mod lsh;
pub mod lsh_search;
pub mod output;
pub mod pair;
pub mod reader;
pub mod search;
pub mod shingle;
pub mod signature;
pub mod source;
pub mod verify;

pub use config::SearchConfig;
pub use pair::{PairSet, SimilarPair};
pub use search::{Method, Searcher, SimilaritySearch};

/// Errors returned by constructors, searches, and the batch I/O helpers.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Returned when a constructor receives an invalid argument.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Returned when a similarity threshold lies outside `[0, 1]`.
    #[error("threshold must be finite and within [0, 1], got {0}")]
    InvalidThreshold(f64),
    /// Returned by the corpus reader and the result writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Returned when a JSON configuration file cannot be parsed.
    #[error("invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Largest accepted `n_shingles`. Shingle IDs and signature values stay
/// below the 31-bit Mersenne prime so the sentinel `n_shingles + 1` fits a `u32`.
pub const MAX_SHINGLES: u32 = hash::MERSENNE_31 as u32;

/// Fails with [`SearchError::InvalidThreshold`] unless `0 <= threshold <= 1`.
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(SearchError::InvalidThreshold(threshold));
    }
    Ok(())
}
