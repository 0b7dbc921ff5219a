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
//! Run configuration: tunable parameters and their validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::lsh::{DEFAULT_BUCKET_SEED, LshBucketer};
use crate::search::Method;
use crate::shingle::Shingler;
use crate::verify::Verification;
use crate::{MAX_SHINGLES, Result, SearchError, validate_threshold};

/// Parameters of one search run.
///
/// Missing fields in a JSON file take their [`Default`] values.
///
/// # Example
/// ```rust
/// use neardup::{Method, SearchConfig};
///
/// let config = SearchConfig::from_json_str(r#"{ "method": "brute_force", "threshold": 0.8 }"#).unwrap();
/// assert_eq!(config.method, Method::BruteForce);
/// assert_eq!(config.shingle_length, 3);
/// assert_eq!(config.sig_rows().unwrap(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Characters per shingle (`k`).
    pub shingle_length: usize,
    /// Size of the shingle ID space and of the signature hash range.
    pub n_shingles: u32,
    /// Signature rows per LSH band.
    pub lsh_rows: usize,
    /// Number of LSH bands; signature rows are `lsh_rows * lsh_bands`.
    pub lsh_bands: usize,
    /// Pairs must score strictly above this.
    pub threshold: f64,
    pub method: Method,
    /// Upper bound on documents read from the corpus.
    pub max_docs: Option<usize>,
    /// Seed of the hash function family; drawn at random when absent.
    pub seed: Option<u64>,
    /// Seed of the band bucket hash.
    pub bucket_seed: u32,
    pub verification: Verification,
    /// Use the rayon thread pool for signatures, bands, and brute force.
    pub parallel: bool,
    /// Cache per-shingle hash vectors while building signatures.
    pub memoize_shingle_hashes: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            shingle_length: 3,
            n_shingles: 1_000_000,
            lsh_rows: 5,
            lsh_bands: 20,
            threshold: 0.9,
            method: Method::Lsh,
            max_docs: None,
            seed: None,
            bucket_seed: DEFAULT_BUCKET_SEED,
            verification: Verification::Signature,
            parallel: true,
            memoize_shingle_hashes: true,
        }
    }
}

impl SearchConfig {
    /// Parses a JSON configuration.
    ///
    /// # Errors
    /// Returns [`SearchError::Config`] for malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`SearchError::Io`] when the file cannot be read and
    /// [`SearchError::Config`] when it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every parameter.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] for a zero size parameter,
    /// an oversized `n_shingles`, or an overflowing signature size, and
    /// [`SearchError::InvalidThreshold`] for a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.shingle_length == 0 {
            return Err(SearchError::InvalidParameter(
                "shingle_length must be greater than zero",
            ));
        }
        if self.n_shingles == 0 {
            return Err(SearchError::InvalidParameter(
                "n_shingles must be greater than zero",
            ));
        }
        if self.n_shingles > MAX_SHINGLES {
            return Err(SearchError::InvalidParameter(
                "n_shingles must not exceed 2^31 - 1",
            ));
        }
        if self.max_docs == Some(0) {
            return Err(SearchError::InvalidParameter(
                "max_docs must be greater than zero",
            ));
        }
        self.bucketer()?;
        validate_threshold(self.threshold)
    }

    /// Total signature rows, `lsh_rows * lsh_bands`.
    ///
    /// # Errors
    /// Same LSH conditions as [`LshBucketer::new`].
    pub fn sig_rows(&self) -> Result<usize> {
        Ok(self.bucketer()?.sig_rows())
    }

    /// # Errors
    /// Same conditions as [`Shingler::new`].
    pub fn shingler(&self) -> Result<Shingler> {
        Shingler::new(self.shingle_length, self.n_shingles)
    }

    /// # Errors
    /// Same conditions as [`LshBucketer::new`].
    pub fn bucketer(&self) -> Result<LshBucketer> {
        LshBucketer::new(self.lsh_bands, self.lsh_rows, self.bucket_seed)
    }
}
