//! Summary pipeline for one run.
//!
//! Reads movement lines, turns each into a keyed contribution and aggregates
//! them with the strategy chosen in the [`RunConfig`]. Any fault ends the run;
//! no partial report is produced.

use crate::aggregate::{self, Aggregate, ChunkProgress, Contribution};
use crate::amount::net_amount;
use crate::config::{RunConfig, Strategy};
use crate::error::{EngineError, RecordError, Result};
use crate::key::GroupKey;
use crate::record::DecodedRecord;
use crate::report::{ReportSink, SummaryReport};
use log::{debug, error, info};
use std::io::BufRead;

/// Runs the decode → key/amount → aggregate pipeline.
///
/// The engine holds nothing but its configuration, so one instance can serve
/// any number of runs.
#[derive(Debug, Clone, Default)]
pub struct SummaryEngine {
    config: RunConfig,
}

impl SummaryEngine {
    /// Creates an engine for the given run settings.
    pub fn new(config: RunConfig) -> Self {
        SummaryEngine { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Decodes one line and derives its key and net amount.
    pub fn contribution(&self, line: &str) -> std::result::Result<Contribution, RecordError> {
        let record = DecodedRecord::decode(line)?;
        let key = GroupKey::from_record(&record)?;
        let amount = net_amount(&record, &self.config)?;
        Ok(Contribution::new(key.combined(), amount))
    }

    /// Processes every line of `reader` and returns the frozen totals.
    pub fn run<R: BufRead>(&self, reader: R) -> Result<SummaryReport> {
        info!(
            "Run started (strategy: {}, ignore sign indicators: {})",
            self.config.strategy(),
            self.config.ignore_sign_indicators()
        );

        let outcome = match self.config.strategy() {
            Strategy::Sequential => self.run_sequential(reader),
            Strategy::ForkJoin => self.run_fork_join(reader),
            Strategy::Chunked => self.run_chunked(reader, |progress, partial| {
                debug!(
                    "Chunk {}: {} records, {} keys",
                    progress.index,
                    progress.records,
                    partial.len()
                );
                Ok(())
            }),
        };

        match outcome {
            Ok((aggregate, records)) => {
                info!(
                    "Run completed: {} records into {} keys",
                    records,
                    aggregate.len()
                );
                Ok(aggregate.into_report())
            }
            Err(e) => {
                error!("Run failed: {}", e);
                Err(e)
            }
        }
    }

    /// Processes `reader` and writes the report to `sink`.
    pub fn run_into<R: BufRead>(
        &self,
        reader: R,
        sink: &mut dyn ReportSink,
    ) -> Result<SummaryReport> {
        let report = self.run(reader)?;
        sink.emit(&report)?;
        Ok(report)
    }

    /// Single pass in input order. Returns the totals and the record count.
    pub fn run_sequential<R: BufRead>(&self, reader: R) -> Result<(Aggregate, usize)> {
        let mut records = 0;
        let aggregate = aggregate::fold(self.contributions(reader).inspect(|_| records += 1))?;
        Ok((aggregate, records))
    }

    /// Reads all lines, then decodes and sums them in parallel halves.
    pub fn run_fork_join<R: BufRead>(&self, reader: R) -> Result<(Aggregate, usize)> {
        let lines: Vec<(usize, String)> = numbered_lines(reader).collect::<Result<_>>()?;
        debug!("Fork-join over {} lines", lines.len());

        let aggregate = aggregate::fork_join(
            &lines,
            self.config.fork_threshold(),
            &|(line_no, line): &(usize, String)| {
                self.contribution(line)
                    .map_err(|e| EngineError::at_line(*line_no, e))
            },
        )?;
        Ok((aggregate, lines.len()))
    }

    /// Pulls fixed-size chunks and hands each partial aggregate to
    /// `on_chunk` before merging it into the total.
    pub fn run_chunked<R, F>(&self, reader: R, on_chunk: F) -> Result<(Aggregate, usize)>
    where
        R: BufRead,
        F: FnMut(ChunkProgress, &Aggregate) -> Result<()>,
    {
        let mut records = 0;
        let aggregate = aggregate::chunked(
            self.contributions(reader).inspect(|_| records += 1),
            self.config.chunk_size(),
            on_chunk,
        )?;
        Ok((aggregate, records))
    }

    fn contributions<'a, R: BufRead + 'a>(
        &'a self,
        reader: R,
    ) -> impl Iterator<Item = Result<Contribution>> + 'a {
        numbered_lines(reader).map(move |line| {
            let (line_no, line) = line?;
            self.contribution(&line)
                .map_err(|e| EngineError::at_line(line_no, e))
        })
    }
}

/// Non-empty lines with their 1-based line numbers. Lines end at `\n`, with an
/// optional `\r` before it. A line of spaces is still a record.
fn numbered_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .split(b'\n')
        .enumerate()
        .filter_map(|(idx, bytes)| {
            let line_no = idx + 1;
            let mut bytes = match bytes {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(EngineError::Io(e))),
            };
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            if bytes.is_empty() {
                debug!("Line {}: empty, skipped", line_no);
                return None;
            }
            Some(
                String::from_utf8(bytes)
                    .map(|line| (line_no, line))
                    .map_err(|e| {
                        let offset = e.utf8_error().valid_up_to();
                        EngineError::at_line(line_no, RecordError::InvalidUtf8 { offset })
                    }),
            )
        })
}
