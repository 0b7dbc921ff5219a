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
//! The search entry point shared by both strategies.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::brute_force::BruteForceSearch;
use crate::config::SearchConfig;
use crate::lsh_search::LshSearch;
use crate::pair::PairSet;
use crate::source::DocumentSource;

/// Finds every document pair whose similarity is strictly above a threshold.
///
/// A search consumes its document source, so it runs once.
pub trait SimilaritySearch {
    /// # Errors
    /// Returns [`crate::SearchError::InvalidThreshold`] when `threshold` is
    /// outside `[0, 1]`, and propagates document source errors.
    fn search(self, threshold: f64) -> Result<PairSet>;
}

/// Search strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Exact all-pairs comparison.
    BruteForce,
    /// MinHash signatures with banded LSH.
    #[default]
    Lsh,
}

/// Either strategy behind one type, chosen at runtime.
///
/// # Example
/// ```rust
/// use neardup::{Method, SearchConfig, Searcher, SimilaritySearch};
/// use neardup::source::TextSource;
///
/// let config = SearchConfig {
///     method: Method::BruteForce,
///     ..SearchConfig::default()
/// };
/// let source = TextSource::new(["same text", "same text"], config.shingler().unwrap());
/// let pairs = Searcher::from_config(&config, source).unwrap().search(0.9).unwrap();
/// assert!(pairs.contains(0, 1));
/// ```
#[derive(Debug)]
pub enum Searcher<S> {
    BruteForce(BruteForceSearch<S>),
    Lsh(LshSearch<S>),
}

impl<S: DocumentSource> Searcher<S> {
    /// Builds the strategy named by `config.method`.
    ///
    /// # Errors
    /// Returns [`crate::SearchError::InvalidParameter`] for invalid
    /// configuration values.
    pub fn from_config(config: &SearchConfig, source: S) -> Result<Self> {
        config.validate()?;
        Ok(match config.method {
            Method::BruteForce => {
                Self::BruteForce(BruteForceSearch::new(source).parallel(config.parallel))
            }
            Method::Lsh => Self::Lsh(LshSearch::from_config(config, source)?),
        })
    }

    pub fn method(&self) -> Method {
        match self {
            Self::BruteForce(_) => Method::BruteForce,
            Self::Lsh(_) => Method::Lsh,
        }
    }
}

impl<S: DocumentSource> SimilaritySearch for Searcher<S> {
    fn search(self, threshold: f64) -> Result<PairSet> {
        match self {
            Self::BruteForce(search) => search.search(threshold),
            Self::Lsh(search) => search.search(threshold),
        }
    }
}
