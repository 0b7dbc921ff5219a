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
//! Line-oriented corpus reader for tab-separated dumps.
//!
//! Each line is one document; its text lives in the third tab-separated
//! column. Lines without that column still count as a document (shingled as
//! a lone newline) so document IDs stay equal to zero-based line numbers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::Result;
use crate::shingle::{ShingleSet, Shingler};
use crate::source::DocumentSource;

/// Zero-based index of the text column.
pub const TEXT_COLUMN: usize = 2;

/// [`DocumentSource`] over a tab-separated reader.
#[derive(Debug)]
pub struct TsvSource<R> {
    reader: R,
    shingler: Shingler,
    max_docs: Option<usize>,
    current_doc: usize,
    line: String,
}

impl TsvSource<BufReader<File>> {
    /// Opens a corpus file.
    ///
    /// # Errors
    /// Returns [`crate::SearchError::Io`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, shingler: Shingler) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), shingler))
    }
}

impl<R: BufRead> TsvSource<R> {
    pub fn new(reader: R, shingler: Shingler) -> Self {
        Self {
            reader,
            shingler,
            max_docs: None,
            current_doc: 0,
            line: String::new(),
        }
    }

    /// Stops after `max_docs` lines.
    pub fn with_max_docs(mut self, max_docs: usize) -> Self {
        self.max_docs = Some(max_docs);
        self
    }

    /// Number of documents produced so far.
    pub fn documents_read(&self) -> usize {
        self.current_doc
    }
}

impl<R: BufRead> DocumentSource for TsvSource<R> {
    fn next_document(&mut self) -> Result<Option<ShingleSet>> {
        if self.max_docs.is_some_and(|max| self.current_doc >= max) {
            return Ok(None);
        }

        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        let line = self.line.trim_end_matches(['\n', '\r']);

        let shingles = match line.split('\t').nth(TEXT_COLUMN) {
            Some(text) => self.shingler.shingle(text),
            None => {
                warn!(
                    line = self.current_doc,
                    "missing text column, treating document as blank"
                );
                self.shingler.shingle("\n")
            }
        };
        self.current_doc += 1;
        Ok(Some(shingles))
    }

    fn remaining_hint(&self) -> Option<usize> {
        self.max_docs
            .map(|max| max.saturating_sub(self.current_doc))
    }
}
