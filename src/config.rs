//! Run settings.
//!
//! A [`RunConfig`] is fixed before a run starts and shared read-only by every
//! record of that run.

use crate::error::{EngineError, Result};
use std::fmt;
use std::str::FromStr;

/// Default number of records per chunk for [`Strategy::Chunked`].
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Default leaf size below which [`Strategy::ForkJoin`] stops splitting.
pub const DEFAULT_FORK_THRESHOLD: usize = 10;

/// How the aggregate is computed. All strategies give the same report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One pass over the input, in order.
    #[default]
    Sequential,
    /// Recursive halving with partial maps merged at join points.
    ForkJoin,
    /// Fixed-size chunks, each aggregated then merged into the running total.
    Chunked,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(Strategy::Sequential),
            "fork-join" | "forkjoin" => Ok(Strategy::ForkJoin),
            "chunked" => Ok(Strategy::Chunked),
            other => Err(format!(
                "unknown strategy '{other}' (expected sequential, fork-join or chunked)"
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Sequential => "sequential",
            Strategy::ForkJoin => "fork-join",
            Strategy::Chunked => "chunked",
        })
    }
}

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    ignore_sign_indicators: bool,
    strategy: Strategy,
    chunk_size: usize,
    fork_threshold: usize,
}

impl RunConfig {
    /// Starts a builder with default settings.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// When `true`, net amount is `long - short` regardless of sign fields.
    pub fn ignore_sign_indicators(&self) -> bool {
        self.ignore_sign_indicators
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn fork_threshold(&self) -> usize {
        self.fork_threshold
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            ignore_sign_indicators: false,
            strategy: Strategy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            fork_threshold: DEFAULT_FORK_THRESHOLD,
        }
    }
}

/// Builder for [`RunConfig`]; `build` validates sizes.
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn ignore_sign_indicators(mut self, ignore: bool) -> Self {
        self.config.ignore_sign_indicators = ignore;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn fork_threshold(mut self, threshold: usize) -> Self {
        self.config.fork_threshold = threshold;
        self
    }

    pub fn build(self) -> Result<RunConfig> {
        if self.config.chunk_size == 0 {
            return Err(EngineError::InvalidConfig(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if self.config.fork_threshold == 0 {
            return Err(EngineError::InvalidConfig(
                "fork threshold must be at least 1".to_string(),
            ));
        }
        Ok(self.config)
    }
}
