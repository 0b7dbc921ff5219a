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
//! Hashing primitives: MurmurHash3 wrappers and the universal hash family.
//!
//! Everything here is a pure function of its inputs, so the same seed always
//! reproduces the same shingle IDs, signatures, and bucket keys.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::{MAX_SHINGLES, Result, SearchError};

/// Mersenne prime `2^31 - 1`, larger than every shingle ID.
pub const MERSENNE_31: u64 = (1 << 31) - 1;

/// 32-bit MurmurHash3 (x86 variant) of `bytes`.
#[inline]
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    mur3::murmurhash3_x86_32(bytes, seed)
}

/// 64-bit MurmurHash3: the low half of the x64 128-bit digest.
#[inline]
pub fn murmur3_64(bytes: &[u8], seed: u32) -> u64 {
    mur3::murmurhash3_x64_128(bytes, seed).0
}

/// One member of the family `h(x) = ((a·x + b) mod p) mod n`.
///
/// Arithmetic is carried out in `u64`; with `a, b < p <= 2^31` and `x < 2^32`
/// the product never overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniversalHash {
    a: u64,
    b: u64,
    p: u64,
}

impl UniversalHash {
    /// Creates a hash function from explicit parameters.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] when `p < 2`, `p > 2^31`,
    /// `a` is not in `[1, p)`, or `b` is not in `[0, p)`.
    pub fn new(a: u64, b: u64, p: u64) -> Result<Self> {
        if !(2..=1 << 31).contains(&p) {
            return Err(SearchError::InvalidParameter(
                "prime modulus must be within [2, 2^31]",
            ));
        }
        if a == 0 || a >= p {
            return Err(SearchError::InvalidParameter("a must be within [1, p)"));
        }
        if b >= p {
            return Err(SearchError::InvalidParameter("b must be within [0, p)"));
        }
        Ok(Self { a, b, p })
    }

    /// Hashes `x` into `[0, n)`.
    ///
    /// # Panics
    /// Panics when `n == 0`. [`HashFunctionFamily`] never passes zero.
    #[inline]
    pub fn hash(&self, x: u32, n: u32) -> u32 {
        (((self.a * u64::from(x) + self.b) % self.p) % u64::from(n)) as u32
    }

    pub fn params(&self) -> (u64, u64, u64) {
        (self.a, self.b, self.p)
    }
}

/// `sig_rows` universal hash functions sharing the output range `[0, n_shingles)`.
///
/// Parameters are drawn once and never change, so every signature built from
/// one family is comparable with every other.
///
/// # Example
/// ```rust
/// use neardup::hash::HashFunctionFamily;
///
/// let left = HashFunctionFamily::with_seed(64, 1_000, 7).unwrap();
/// let right = HashFunctionFamily::with_seed(64, 1_000, 7).unwrap();
/// assert_eq!(left, right);
/// assert!(left.hash_all(42).iter().all(|&value| value < 1_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFunctionFamily {
    functions: Vec<UniversalHash>,
    n_shingles: u32,
}

impl HashFunctionFamily {
    /// Draws `len` functions from a generator seeded with `seed`.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] when `len == 0`,
    /// `n_shingles == 0`, or `n_shingles > MAX_SHINGLES`.
    pub fn with_seed(len: usize, n_shingles: u32, seed: u64) -> Result<Self> {
        Self::check_shape(len, n_shingles)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let functions = (0..len)
            .map(|_| UniversalHash {
                a: rng.random_range(1..MERSENNE_31),
                b: rng.random_range(0..MERSENNE_31),
                p: MERSENNE_31,
            })
            .collect();

        Ok(Self {
            functions,
            n_shingles,
        })
    }

    /// Draws `len` functions from a fresh random seed.
    ///
    /// The seed is logged at debug level so a run can be replayed with
    /// [`HashFunctionFamily::with_seed`].
    ///
    /// # Errors
    /// Same conditions as [`HashFunctionFamily::with_seed`].
    pub fn random(len: usize, n_shingles: u32) -> Result<Self> {
        let seed: u64 = rand::rng().random();
        debug!(seed, len, "drawing hash function family");
        Self::with_seed(len, n_shingles, seed)
    }

    /// Builds a family from explicit functions.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] for an empty list or an
    /// invalid `n_shingles`.
    pub fn from_functions(functions: Vec<UniversalHash>, n_shingles: u32) -> Result<Self> {
        Self::check_shape(functions.len(), n_shingles)?;
        Ok(Self {
            functions,
            n_shingles,
        })
    }

    fn check_shape(len: usize, n_shingles: u32) -> Result<()> {
        if len == 0 {
            return Err(SearchError::InvalidParameter(
                "hash family size must be greater than zero",
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
        Ok(())
    }

    /// Number of hash functions, i.e. signature rows.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn n_shingles(&self) -> u32 {
        self.n_shingles
    }

    pub fn functions(&self) -> &[UniversalHash] {
        &self.functions
    }

    /// Hashes `shingle` with function `h`.
    #[inline]
    pub fn hash(&self, h: usize, shingle: u32) -> u32 {
        self.functions[h].hash(shingle, self.n_shingles)
    }

    /// Hashes `shingle` with every function, in row order.
    pub fn hash_all(&self, shingle: u32) -> Vec<u32> {
        self.functions
            .iter()
            .map(|function| function.hash(shingle, self.n_shingles))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{HashFunctionFamily, MERSENNE_31, UniversalHash, murmur3_32, murmur3_64};

    #[test]
    fn murmur_is_deterministic_and_seeded() {
        assert_eq!(murmur3_32(b"abc", 1234), murmur3_32(b"abc", 1234));
        assert_ne!(murmur3_32(b"abc", 1234), murmur3_32(b"abc", 1235));
        assert_eq!(murmur3_64(b"abc", 9999), murmur3_64(b"abc", 9999));
        assert_ne!(murmur3_64(b"abc", 9999), murmur3_64(b"abd", 9999));
    }

    #[test]
    fn murmur_matches_reference_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514E_28B7);
    }

    #[test]
    fn universal_hash_validates_parameters() {
        assert!(UniversalHash::new(0, 1, 7).is_err());
        assert!(UniversalHash::new(7, 1, 7).is_err());
        assert!(UniversalHash::new(3, 7, 7).is_err());
        assert!(UniversalHash::new(3, 1, 1).is_err());
        assert!(UniversalHash::new(3, 1, 7).is_ok());
    }

    #[test]
    fn universal_hash_computes_formula() {
        let function = UniversalHash::new(3, 5, 11).unwrap();
        // ((3 * 4 + 5) % 11) % 4 = (17 % 11) % 4 = 6 % 4 = 2
        assert_eq!(function.hash(4, 4), 2);
        assert_eq!(function.params(), (3, 5, 11));
    }

    #[test]
    #[should_panic]
    fn empty_output_range_panics() {
        let function = UniversalHash::new(3, 5, 11).unwrap();
        let _ = function.hash(4, 0);
    }

    #[test]
    fn large_inputs_do_not_overflow() {
        let function = UniversalHash::new(MERSENNE_31 - 1, MERSENNE_31 - 1, MERSENNE_31).unwrap();
        let value = function.hash(u32::MAX, 1_000);
        assert!(value < 1_000);
    }

    #[test]
    fn family_validates_shape() {
        assert!(HashFunctionFamily::with_seed(0, 100, 1).is_err());
        assert!(HashFunctionFamily::with_seed(8, 0, 1).is_err());
        assert!(HashFunctionFamily::with_seed(8, u32::MAX, 1).is_err());
        assert!(HashFunctionFamily::from_functions(Vec::new(), 100).is_err());
        assert!(HashFunctionFamily::random(8, 100).is_ok());
    }

    #[test]
    fn family_is_reproducible_per_seed() {
        let first = HashFunctionFamily::with_seed(32, 5_000, 11).unwrap();
        let second = HashFunctionFamily::with_seed(32, 5_000, 11).unwrap();
        let other = HashFunctionFamily::with_seed(32, 5_000, 12).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.len(), 32);
        assert_eq!(first.n_shingles(), 5_000);
    }

    #[test]
    fn hash_all_matches_individual_hashes() {
        let family = HashFunctionFamily::with_seed(16, 777, 3).unwrap();
        let all = family.hash_all(12_345);
        for (h, value) in all.iter().enumerate() {
            assert_eq!(*value, family.hash(h, 12_345));
            assert!(*value < 777);
        }
    }
}
