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
//! Document sources: the pull interface searches consume corpora through.
//!
//! A source yields one [`ShingleSet`] per document, in a stable order. The
//! position of a document in that order is its ID. Searches never seek or
//! rewind a source; they stop at the first `None`.

use crate::Result;
use crate::shingle::{ShingleSet, Shingler};

/// Most documents a consumer preallocates for from a [`DocumentSource::remaining_hint`].
/// Bounds such as `max_docs` can be far above the real corpus size, so buffers
/// start at most this large and grow with the documents actually read.
pub const MAX_PREALLOCATED_DOCS: usize = 4096;

/// Bounded, ordered producer of per-document shingle sets.
pub trait DocumentSource {
    /// Returns the next document's shingles, or `None` once the source is
    /// exhausted or its document bound is reached.
    ///
    /// # Errors
    /// Sources backed by I/O surface read failures here.
    fn next_document(&mut self) -> Result<Option<ShingleSet>>;

    /// Upper bound on the documents still to come, when known.
    ///
    /// The bound may be a configured limit rather than a count, so it is
    /// only advisory.
    fn remaining_hint(&self) -> Option<usize> {
        None
    }
}

impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn next_document(&mut self) -> Result<Option<ShingleSet>> {
        (**self).next_document()
    }

    fn remaining_hint(&self) -> Option<usize> {
        (**self).remaining_hint()
    }
}

/// Drains `source` into memory.
pub fn collect_documents<S: DocumentSource>(mut source: S) -> Result<Vec<ShingleSet>> {
    let mut documents = Vec::with_capacity(preallocated_docs(&source));
    while let Some(shingles) = source.next_document()? {
        documents.push(shingles);
    }
    Ok(documents)
}

/// Documents worth reserving room for up front, capped at [`MAX_PREALLOCATED_DOCS`].
pub(crate) fn preallocated_docs<S: DocumentSource + ?Sized>(source: &S) -> usize {
    source
        .remaining_hint()
        .unwrap_or(0)
        .min(MAX_PREALLOCATED_DOCS)
}

/// Shingles raw in-memory text documents on the fly.
///
/// # Example
/// ```rust
/// use neardup::shingle::Shingler;
/// use neardup::source::{DocumentSource, TextSource};
///
/// let shingler = Shingler::new(3, 1_000).unwrap();
/// let mut source = TextSource::new(["abcde", "xyz12", "extra"], shingler).with_max_docs(2);
///
/// assert_eq!(source.next_document().unwrap().unwrap().len(), 3);
/// assert!(source.next_document().unwrap().is_some());
/// assert!(source.next_document().unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TextSource<I> {
    docs: I,
    shingler: Shingler,
    remaining: Option<usize>,
}

impl<I> TextSource<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new<D>(docs: D, shingler: Shingler) -> Self
    where
        D: IntoIterator<IntoIter = I>,
    {
        Self {
            docs: docs.into_iter(),
            shingler,
            remaining: None,
        }
    }

    /// Stops the source after `max_docs` documents.
    pub fn with_max_docs(mut self, max_docs: usize) -> Self {
        self.remaining = Some(max_docs);
        self
    }
}

impl<I> DocumentSource for TextSource<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn next_document(&mut self) -> Result<Option<ShingleSet>> {
        if self.remaining == Some(0) {
            return Ok(None);
        }
        let Some(doc) = self.docs.next() else {
            return Ok(None);
        };
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        Ok(Some(self.shingler.shingle(doc.as_ref())))
    }

    fn remaining_hint(&self) -> Option<usize> {
        let (_, upper) = self.docs.size_hint();
        match (upper, self.remaining) {
            (Some(upper), Some(remaining)) => Some(upper.min(remaining)),
            (upper, remaining) => upper.or(remaining),
        }
    }
}

/// Replays already shingled documents.
#[derive(Debug, Clone, Default)]
pub struct ShingleSetSource {
    documents: std::vec::IntoIter<ShingleSet>,
}

impl ShingleSetSource {
    pub fn new(documents: Vec<ShingleSet>) -> Self {
        Self {
            documents: documents.into_iter(),
        }
    }
}

impl DocumentSource for ShingleSetSource {
    fn next_document(&mut self) -> Result<Option<ShingleSet>> {
        Ok(self.documents.next())
    }

    fn remaining_hint(&self) -> Option<usize> {
        Some(self.documents.len())
    }
}
