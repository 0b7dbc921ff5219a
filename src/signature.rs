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
//! MinHash signature matrix and its builder.
//!
//! The matrix holds, for every hash function `h` and document `d`, the
//! smallest value `H_h(s)` over the shingles `s` of `d`. Cells start at the
//! sentinel `n_shingles + 1` and only ever decrease while the matrix is built.
//!
//! Storage is one flat buffer laid out document-major: the `sig_rows` values
//! of a document are contiguous, so a document's column (and any band of it)
//! is a plain slice and columns can be filled in parallel without locking.

use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::Result;
use crate::hash::HashFunctionFamily;
use crate::shingle::ShingleSet;
use crate::source::{DocumentSource, preallocated_docs};

/// Documents pulled from a source before a batch of columns is folded.
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Dense `sig_rows x n_docs` MinHash signature matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatrix {
    sig_rows: usize,
    n_docs: usize,
    sentinel: u32,
    values: Vec<u32>,
}

impl SignatureMatrix {
    fn empty(sig_rows: usize, sentinel: u32) -> Self {
        Self {
            sig_rows,
            n_docs: 0,
            sentinel,
            values: Vec::new(),
        }
    }

    /// Number of hash functions (rows).
    pub fn sig_rows(&self) -> usize {
        self.sig_rows
    }

    /// Number of documents (columns).
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    /// Value every cell starts from: `n_shingles + 1`.
    pub fn sentinel(&self) -> u32 {
        self.sentinel
    }

    /// Value of hash function `h` for document `doc`.
    ///
    /// # Panics
    /// Panics when `h >= sig_rows` or `doc >= n_docs`.
    pub fn get(&self, h: usize, doc: usize) -> u32 {
        assert!(h < self.sig_rows, "row out of bounds");
        self.column(doc)[h]
    }

    /// Full signature of `doc`.
    ///
    /// # Panics
    /// Panics when `doc >= n_docs`.
    pub fn column(&self, doc: usize) -> &[u32] {
        let start = doc * self.sig_rows;
        &self.values[start..start + self.sig_rows]
    }

    /// Rows `start..start + len` of the signature of `doc`.
    ///
    /// # Panics
    /// Panics when `doc >= n_docs` or `start + len > sig_rows`.
    pub fn band(&self, doc: usize, start: usize, len: usize) -> &[u32] {
        &self.column(doc)[start..start + len]
    }

    /// `true` when `doc` had no shingles; its column is all sentinels.
    ///
    /// Any real hash value is below `n_shingles`, so checking the first row
    /// is enough.
    ///
    /// # Panics
    /// Panics when `doc >= n_docs`.
    pub fn is_empty_column(&self, doc: usize) -> bool {
        self.column(doc)[0] == self.sentinel
    }

    /// Iterates over document columns in ID order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[u32]> + '_ {
        self.values.chunks_exact(self.sig_rows)
    }

    /// Signature matrix memory in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<u32>()
    }
}

/// Folds documents into a [`SignatureMatrix`] under a fixed hash family.
///
/// Per-shingle hash vectors are memoized for the duration of one build: a
/// shingle ID hashes to the same vector wherever it recurs, so the memo only
/// saves work and never changes a cell. The source and the memo are owned by
/// [`SignatureBuilder::build`] and dropped when it returns.
///
/// # Example
/// ```rust
/// use neardup::hash::HashFunctionFamily;
/// use neardup::shingle::Shingler;
/// use neardup::signature::SignatureBuilder;
/// use neardup::source::TextSource;
///
/// let family = HashFunctionFamily::with_seed(32, 10_000, 1).unwrap();
/// let shingler = Shingler::new(3, 10_000).unwrap();
/// let source = TextSource::new(["abcdef", "abcdeg", ""], shingler);
///
/// let matrix = SignatureBuilder::new(&family).build(source).unwrap();
/// assert_eq!(matrix.n_docs(), 3);
/// assert_eq!(matrix.sig_rows(), 32);
/// assert!(matrix.is_empty_column(2));
/// ```
#[derive(Debug, Clone)]
pub struct SignatureBuilder<'a> {
    family: &'a HashFunctionFamily,
    parallel: bool,
    memoize: bool,
    batch_size: usize,
}

impl<'a> SignatureBuilder<'a> {
    pub fn new(family: &'a HashFunctionFamily) -> Self {
        Self {
            family,
            parallel: true,
            memoize: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Folds columns on the rayon thread pool (default `true`).
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Caches each distinct shingle's hash vector (default `true`).
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Documents pulled per batch; values below one are raised to one.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Builds the matrix and drops every shingle set as soon as it is folded.
    ///
    /// # Errors
    /// Propagates errors from the document source.
    pub fn build<S: DocumentSource>(&self, source: S) -> Result<SignatureMatrix> {
        self.build_inner(source, None)
    }

    /// Builds the matrix and also returns every shingle set, for exact
    /// re-verification of candidates.
    ///
    /// # Errors
    /// Propagates errors from the document source.
    pub fn build_retaining<S: DocumentSource>(
        &self,
        source: S,
    ) -> Result<(SignatureMatrix, Vec<ShingleSet>)> {
        let mut retained = Vec::new();
        let matrix = self.build_inner(source, Some(&mut retained))?;
        Ok((matrix, retained))
    }

    fn build_inner<S: DocumentSource>(
        &self,
        mut source: S,
        mut retained: Option<&mut Vec<ShingleSet>>,
    ) -> Result<SignatureMatrix> {
        let started = Instant::now();
        let sig_rows = self.family.len();
        let sentinel = self.family.n_shingles() + 1;
        let mut matrix = SignatureMatrix::empty(sig_rows, sentinel);
        matrix
            .values
            .reserve(preallocated_docs(&source).saturating_mul(sig_rows));

        let mut memo: HashMap<u32, Box<[u32]>> = HashMap::new();
        let mut batch = Vec::with_capacity(self.batch_size);
        loop {
            batch.clear();
            while batch.len() < self.batch_size {
                match source.next_document()? {
                    Some(shingles) => batch.push(shingles),
                    None => break,
                }
            }
            if batch.is_empty() {
                break;
            }

            self.fold_batch(&mut matrix, &batch, &mut memo);
            if let Some(retained) = &mut retained {
                retained.append(&mut batch);
            }
        }

        info!(
            docs = matrix.n_docs,
            sig_rows,
            distinct_shingles = memo.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "signature matrix built"
        );
        Ok(matrix)
    }

    fn fold_batch(
        &self,
        matrix: &mut SignatureMatrix,
        batch: &[ShingleSet],
        memo: &mut HashMap<u32, Box<[u32]>>,
    ) {
        let sig_rows = matrix.sig_rows;
        let start = matrix.values.len();
        matrix
            .values
            .resize(start + batch.len() * sig_rows, matrix.sentinel);
        matrix.n_docs += batch.len();
        let columns = &mut matrix.values[start..];

        if self.memoize {
            self.extend_memo(batch, memo);
            let memo = &*memo;
            let fold = |(column, shingles): (&mut [u32], &ShingleSet)| {
                for shingle in shingles {
                    if let Some(hashes) = memo.get(&shingle) {
                        fold_min(column, hashes);
                    }
                }
            };
            if self.parallel {
                columns.par_chunks_mut(sig_rows).zip(batch.par_iter()).for_each(fold);
            } else {
                columns.chunks_mut(sig_rows).zip(batch.iter()).for_each(fold);
            }
        } else {
            let family = self.family;
            let fold = |(column, shingles): (&mut [u32], &ShingleSet)| {
                for shingle in shingles {
                    for (h, cell) in column.iter_mut().enumerate() {
                        *cell = (*cell).min(family.hash(h, shingle));
                    }
                }
            };
            if self.parallel {
                columns.par_chunks_mut(sig_rows).zip(batch.par_iter()).for_each(fold);
            } else {
                columns.chunks_mut(sig_rows).zip(batch.iter()).for_each(fold);
            }
        }
    }

    fn extend_memo(&self, batch: &[ShingleSet], memo: &mut HashMap<u32, Box<[u32]>>) {
        let mut unseen: Vec<u32> = batch
            .iter()
            .flat_map(|shingles| shingles.iter())
            .filter(|shingle| !memo.contains_key(shingle))
            .collect();
        unseen.sort_unstable();
        unseen.dedup();

        let family = self.family;
        let hashed: Vec<(u32, Box<[u32]>)> = if self.parallel {
            unseen
                .into_par_iter()
                .map(|shingle| (shingle, family.hash_all(shingle).into_boxed_slice()))
                .collect()
        } else {
            unseen
                .into_iter()
                .map(|shingle| (shingle, family.hash_all(shingle).into_boxed_slice()))
                .collect()
        };
        memo.extend(hashed);
    }
}

#[inline]
fn fold_min(column: &mut [u32], hashes: &[u32]) {
    for (cell, &value) in column.iter_mut().zip(hashes) {
        if value < *cell {
            *cell = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::SignatureBuilder;
    use crate::hash::HashFunctionFamily;
    use crate::reader::TsvSource;
    use crate::shingle::{ShingleSet, Shingler};
    use crate::source::ShingleSetSource;

    fn documents() -> Vec<ShingleSet> {
        vec![
            [1, 5, 9].into_iter().collect(),
            [2, 5, 9, 40].into_iter().collect(),
            ShingleSet::new(),
            [7].into_iter().collect(),
        ]
    }

    fn family() -> HashFunctionFamily {
        HashFunctionFamily::with_seed(24, 100, 99).unwrap()
    }

    #[test]
    fn cells_hold_minimum_hash_per_document() {
        let family = family();
        let docs = documents();
        let matrix = SignatureBuilder::new(&family)
            .build(ShingleSetSource::new(docs.clone()))
            .unwrap();

        for (doc, shingles) in docs.iter().enumerate() {
            for h in 0..family.len() {
                let expected = shingles
                    .iter()
                    .map(|shingle| family.hash(h, shingle))
                    .min()
                    .unwrap_or(matrix.sentinel());
                assert_eq!(matrix.get(h, doc), expected, "h={h} doc={doc}");
            }
        }
    }

    #[test]
    fn empty_documents_keep_sentinel_column() {
        let family = family();
        let matrix = SignatureBuilder::new(&family)
            .build(ShingleSetSource::new(documents()))
            .unwrap();

        assert_eq!(matrix.sentinel(), 101);
        assert!(matrix.is_empty_column(2));
        assert!(matrix.column(2).iter().all(|&value| value == 101));
        assert!(!matrix.is_empty_column(0));
        assert!(matrix.column(0).iter().all(|&value| value < 100));
    }

    #[test]
    fn every_build_mode_produces_the_same_matrix() {
        let family = family();
        let reference = SignatureBuilder::new(&family)
            .parallel(false)
            .memoize(false)
            .build(ShingleSetSource::new(documents()))
            .unwrap();

        for parallel in [false, true] {
            for memoize in [false, true] {
                for batch_size in [1, 3, 1024] {
                    let matrix = SignatureBuilder::new(&family)
                        .parallel(parallel)
                        .memoize(memoize)
                        .batch_size(batch_size)
                        .build(ShingleSetSource::new(documents()))
                        .unwrap();
                    assert_eq!(matrix, reference);
                }
            }
        }
    }

    #[test]
    fn empty_corpus_builds_empty_matrix() {
        let family = family();
        let matrix = SignatureBuilder::new(&family)
            .build(ShingleSetSource::new(Vec::new()))
            .unwrap();
        assert_eq!(matrix.n_docs(), 0);
        assert_eq!(matrix.columns().len(), 0);
        assert_eq!(matrix.memory_bytes(), 0);
    }

    #[test]
    fn retaining_build_returns_shingle_sets() {
        let family = family();
        let (matrix, retained) = SignatureBuilder::new(&family)
            .batch_size(2)
            .build_retaining(ShingleSetSource::new(documents()))
            .unwrap();
        assert_eq!(matrix.n_docs(), 4);
        assert_eq!(retained, documents());
    }

    #[test]
    fn document_bound_far_above_corpus_size() {
        let family = HashFunctionFamily::with_seed(100, 1_000_000, 4).unwrap();
        let shingler = Shingler::new(3, 1_000_000).unwrap();
        let source = TsvSource::new(Cursor::new("1\tu\tabcdef\n"), shingler).with_max_docs(1 << 60);

        let matrix = SignatureBuilder::new(&family).build(source).unwrap();
        assert_eq!(matrix.n_docs(), 1);
        assert_eq!(matrix.memory_bytes(), 100 * 4);
    }

    #[test]
    #[should_panic]
    fn band_past_the_signature_panics() {
        let family = family();
        let matrix = SignatureBuilder::new(&family)
            .build(ShingleSetSource::new(documents()))
            .unwrap();
        let _ = matrix.band(0, 20, 8);
    }

    #[test]
    fn identical_documents_share_signatures() {
        let family = family();
        let doc: ShingleSet = [3, 4, 5].into_iter().collect();
        let matrix = SignatureBuilder::new(&family)
            .build(ShingleSetSource::new(vec![doc.clone(), doc]))
            .unwrap();
        assert_eq!(matrix.column(0), matrix.column(1));
        assert_eq!(matrix.band(0, 4, 4), &matrix.column(0)[4..8]);
    }
}
