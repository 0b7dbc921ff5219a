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
//! Plain-text result files: one `id1,id2,similarity` line per pair.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Result;
use crate::pair::PairSet;

/// Writes `pairs` by descending similarity, ties by ascending IDs.
///
/// # Errors
/// Returns [`crate::SearchError::Io`] when writing fails.
///
/// # Example
/// ```rust
/// use neardup::output::write_pairs;
/// use neardup::pair::{PairSet, SimilarPair};
///
/// let pairs: PairSet = [SimilarPair::new(4, 2, 0.75).unwrap()].into_iter().collect();
/// let mut out = Vec::new();
/// write_pairs(&pairs, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "2,4,0.75\n");
/// ```
pub fn write_pairs<W: Write>(pairs: &PairSet, mut writer: W) -> Result<()> {
    for pair in pairs.to_sorted_vec() {
        writeln!(writer, "{},{},{}", pair.id1(), pair.id2(), pair.similarity())?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes `pairs` to it.
///
/// # Errors
/// Returns [`crate::SearchError::Io`] when the file cannot be created or written.
pub fn write_pairs_to_path(pairs: &PairSet, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    write_pairs(pairs, BufWriter::new(file))
}
