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
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use neardup::output::write_pairs_to_path;
use neardup::reader::TsvSource;
use neardup::verify::Verification;
use neardup::{Method, SearchConfig, Searcher, SimilaritySearch};

/// Finds near-duplicate documents in a tab-separated corpus.
///
/// Example: `neardup --input tweets.tsv --output pairs.csv --method lsh --threshold 0.9`
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Corpus file, one document per line with the text in the third column.
    #[arg(long)]
    input: PathBuf,
    /// Result file, one `id1,id2,similarity` line per pair.
    #[arg(long)]
    output: PathBuf,
    /// JSON configuration; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    method: Option<MethodArg>,
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(long)]
    max_docs: Option<usize>,
    #[arg(long)]
    shingle_length: Option<usize>,
    #[arg(long)]
    n_shingles: Option<u32>,
    /// Number of LSH bands.
    #[arg(long)]
    bands: Option<usize>,
    /// Signature rows per LSH band.
    #[arg(long)]
    rows: Option<usize>,
    /// Hash family seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    bucket_seed: Option<u32>,
    #[arg(long, value_enum)]
    verification: Option<VerificationArg>,
    /// Run on a single thread.
    #[arg(long)]
    sequential: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    BruteForce,
    Lsh,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VerificationArg {
    Signature,
    Exact,
}

impl Args {
    fn into_config(self) -> neardup::Result<(SearchConfig, PathBuf, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::from_path(path)?,
            None => SearchConfig::default(),
        };

        if let Some(method) = self.method {
            config.method = match method {
                MethodArg::BruteForce => Method::BruteForce,
                MethodArg::Lsh => Method::Lsh,
            };
        }
        if let Some(verification) = self.verification {
            config.verification = match verification {
                VerificationArg::Signature => Verification::Signature,
                VerificationArg::Exact => Verification::Exact,
            };
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(max_docs) = self.max_docs {
            config.max_docs = Some(max_docs);
        }
        if let Some(shingle_length) = self.shingle_length {
            config.shingle_length = shingle_length;
        }
        if let Some(n_shingles) = self.n_shingles {
            config.n_shingles = n_shingles;
        }
        if let Some(bands) = self.bands {
            config.lsh_bands = bands;
        }
        if let Some(rows) = self.rows {
            config.lsh_rows = rows;
        }
        if let Some(bucket_seed) = self.bucket_seed {
            config.bucket_seed = bucket_seed;
        }
        config.seed = self.seed.or(config.seed);
        config.parallel &= !self.sequential;

        config.validate()?;
        Ok((config, self.input, self.output))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, input, output) = Args::parse().into_config()?;
    info!(?config, input = %input.display(), "starting search");

    let started = Instant::now();
    let mut source = TsvSource::open(&input, config.shingler()?)?;
    if let Some(max_docs) = config.max_docs {
        source = source.with_max_docs(max_docs);
    }
    let pairs = Searcher::from_config(&config, source)?.search(config.threshold)?;
    info!(
        pairs = pairs.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search finished"
    );

    let started = Instant::now();
    write_pairs_to_path(&pairs, &output)?;
    info!(
        output = %output.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "results written"
    );
    Ok(())
}
