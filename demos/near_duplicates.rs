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
use neardup::brute_force::BruteForceSearch;
use neardup::evaluation::PairEvaluation;
use neardup::hash::HashFunctionFamily;
use neardup::lsh::{LshBucketer, candidate_probability, s_curve_threshold};
use neardup::lsh_search::LshSearch;
use neardup::search::SimilaritySearch;
use neardup::shingle::Shingler;
use neardup::source::TextSource;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let docs = [
        "The quick brown fox jumps over the lazy dog",
        "The quick brown fox jumps over the lazy dog!",
        "The quick brown fox leaps over the lazy dog",
        "A completely different line about something else",
        "Another unique line with different content",
        "the quick brown fox jumped over a lazy dog",
    ];
    let threshold = 0.6;

    // 20 bands of 5 rows: 100 signature rows.
    let bucketer = LshBucketer::new(20, 5, 9999)?;
    println!(
        "S-curve midpoint ~{:.3}, P(candidate | s=0.8) = {:.3}",
        s_curve_threshold(bucketer.rows(), bucketer.bands()),
        candidate_probability(0.8, bucketer.rows(), bucketer.bands()),
    );

    let shingler = Shingler::new(3, 1_000_000)?;
    let family = HashFunctionFamily::with_seed(bucketer.sig_rows(), shingler.n_shingles(), 42)?;

    let exact = BruteForceSearch::new(TextSource::new(docs, shingler)).search(threshold)?;
    let approximate =
        LshSearch::new(TextSource::new(docs, shingler), family, bucketer)?.search(threshold)?;

    println!("Brute force:");
    for pair in exact.to_sorted_vec() {
        println!("  ({}, {}) jaccard={:.3}", pair.id1(), pair.id2(), pair.similarity());
    }
    println!("LSH:");
    for pair in approximate.to_sorted_vec() {
        println!("  ({}, {}) estimate={:.3}", pair.id1(), pair.id2(), pair.similarity());
    }

    let evaluation = PairEvaluation::compare(&approximate, &exact, docs.len(), threshold);
    println!(
        "precision={:.2} recall={:.2}",
        evaluation.precision(),
        evaluation.recall()
    );

    Ok(())
}
