//! Movement Summary CLI
//!
//! Reads a fixed-width movement file and writes the daily summary report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- Input.txt > Output.csv
//! cargo run -- --strategy fork-join --format json -o summary.json Input.txt
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity
//! - `MOVEMENT_IGNORE_SIGN_INDICATORS`: `true` to subtract raw quantities

use clap::Parser;
use movement_summary::{OutputFormat, Result, RunConfig, SinkError, Strategy, SummaryEngine};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

/// Summarise futures movements into net amounts per client and product
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Fixed-width movement file
    input: PathBuf,

    /// Net amount is long minus short, ignoring the sign fields
    #[arg(long, env = "MOVEMENT_IGNORE_SIGN_INDICATORS")]
    ignore_sign_indicators: bool,

    /// Aggregation strategy: sequential, fork-join or chunked
    #[arg(long, default_value = "sequential")]
    strategy: Strategy,

    /// Records per chunk for the chunked strategy
    #[arg(long, default_value_t = 10)]
    chunk_size: usize,

    /// Largest slice the fork-join strategy sums without splitting
    #[arg(long, default_value_t = 10)]
    fork_threshold: usize,

    /// Report format: csv or json
    #[arg(long, default_value = "csv")]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = RunConfig::builder()
        .ignore_sign_indicators(args.ignore_sign_indicators)
        .strategy(args.strategy)
        .chunk_size(args.chunk_size)
        .fork_threshold(args.fork_threshold)
        .build()?;

    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);

    // Output is opened only once the whole report is built.
    let engine = SummaryEngine::new(config);
    let report = engine.run(reader)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(SinkError::from)?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    args.format.sink(writer).emit(&report)?;

    Ok(())
}
