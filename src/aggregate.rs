//! Net position aggregation.
//!
//! Contributions are summed per combined key. Because [`Amount`] addition is
//! exact, merging partial aggregates is associative and commutative: any
//! ordering or split of the input yields the same totals. The three
//! strategies below all consume fallible contributions and stop at the first
//! fault.

use crate::decimal::Amount;
use crate::report::SummaryReport;
use std::collections::BTreeMap;

/// One record's share of a total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    /// Combined `client,product` key.
    pub key: String,
    pub amount: Amount,
}

impl Contribution {
    pub fn new(key: impl Into<String>, amount: Amount) -> Self {
        Contribution {
            key: key.into(),
            amount,
        }
    }
}

/// Running totals keyed by combined key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    totals: BTreeMap<String, Amount>,
}

impl Aggregate {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Aggregate {
            totals: BTreeMap::new(),
        }
    }

    /// Adds `amount` to the total for `key`, creating the entry if needed.
    pub fn add(&mut self, key: String, amount: Amount) {
        *self.totals.entry(key).or_insert(Amount::ZERO) += amount;
    }

    pub fn add_contribution(&mut self, contribution: Contribution) {
        self.add(contribution.key, contribution.amount);
    }

    /// Union of both key sets, summing totals for keys present in both.
    pub fn merge(self, other: Aggregate) -> Aggregate {
        let (mut larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        for (key, amount) in smaller.totals {
            larger.add(key, amount);
        }
        larger
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Amount> {
        self.totals.get(key).copied()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.totals.iter().map(|(key, amount)| (key.as_str(), *amount))
    }

    /// Freezes the totals into a report.
    pub fn into_report(self) -> SummaryReport {
        SummaryReport::new(self.totals)
    }
}

impl Extend<Contribution> for Aggregate {
    fn extend<I: IntoIterator<Item = Contribution>>(&mut self, iter: I) {
        for contribution in iter {
            self.add_contribution(contribution);
        }
    }
}

impl FromIterator<Contribution> for Aggregate {
    fn from_iter<I: IntoIterator<Item = Contribution>>(iter: I) -> Self {
        let mut aggregate = Aggregate::new();
        aggregate.extend(iter);
        aggregate
    }
}

/// Sequential single pass.
pub fn fold<I, E>(items: I) -> Result<Aggregate, E>
where
    I: IntoIterator<Item = Result<Contribution, E>>,
{
    let mut aggregate = Aggregate::new();
    for item in items {
        aggregate.add_contribution(item?);
    }
    Ok(aggregate)
}

/// Recursive halving until a part holds at most `threshold` items.
///
/// Halves run through `rayon::join` and are merged only once both are done.
/// If both halves fail, the left fault wins, so the error reported is always
/// the earliest faulty item in slice order.
pub fn fork_join<T, F, E>(items: &[T], threshold: usize, contribute: &F) -> Result<Aggregate, E>
where
    T: Sync,
    F: Fn(&T) -> Result<Contribution, E> + Sync,
    E: Send,
{
    if items.len() <= threshold.max(1) {
        return fold(items.iter().map(contribute));
    }

    let (left, right) = items.split_at(items.len() / 2);
    let (left, right) = rayon::join(
        || fork_join(left, threshold, contribute),
        || fork_join(right, threshold, contribute),
    );
    Ok(left?.merge(right?))
}

/// Position of a completed chunk within the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// 0-based chunk number.
    pub index: usize,
    /// Contributions in this chunk; only the last chunk may be short.
    pub records: usize,
}

/// Fixed-size chunks pulled from `items`.
///
/// Each chunk is summed into its own partial aggregate, handed to `on_chunk`
/// and then merged into the running total. An error from either the input or
/// the callback ends the run.
pub fn chunked<I, E, F>(items: I, chunk_size: usize, mut on_chunk: F) -> Result<Aggregate, E>
where
    I: IntoIterator<Item = Result<Contribution, E>>,
    F: FnMut(ChunkProgress, &Aggregate) -> Result<(), E>,
{
    let chunk_size = chunk_size.max(1);
    let mut items = items.into_iter();
    let mut total = Aggregate::new();
    let mut index = 0;

    loop {
        let mut partial = Aggregate::new();
        let mut records = 0;
        for item in items.by_ref().take(chunk_size) {
            partial.add_contribution(item?);
            records += 1;
        }
        if records == 0 {
            break;
        }

        on_chunk(ChunkProgress { index, records }, &partial)?;
        total = total.merge(partial);
        index += 1;

        if records < chunk_size {
            break;
        }
    }

    Ok(total)
}
