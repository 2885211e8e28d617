pub mod bubble;
pub mod naive;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

pub use crate::ranker::bubble::BubbleRanker;
pub use crate::ranker::naive::NaiveRanker;

/// Answers descending-rank queries over a fixed multiset of values.
///
/// The rank of `q` is one plus the number of values strictly greater than `q`,
/// or `None` if `q` does not occur at all.
pub trait Ranker<T>: Send + Sync {
    /// Builds a [`Ranker`] from the values in any order.
    fn build(values: Vec<T>) -> Self
    where
        Self: Sized;

    /// Gets the 1-based descending rank of `query`.
    fn rank(&self, query: T) -> Option<usize>;

    /// Gets the number of values stored, duplicates included.
    fn len(&self) -> usize;

    /// Checks if the data structure is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Answers every query in parallel, preserving query order.
    fn batch_rank(&self, queries: &[T]) -> Vec<Option<usize>>
    where
        T: Copy + Send + Sync,
    {
        queries.par_iter().map(|&q| self.rank(q)).collect()
    }
}

/// Ranking algorithms supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Sort once, binary search per query.
    #[default]
    Index,
    /// Sort once, hash map from value to first rank.
    Map,
    /// Re-sort a copy of the values for every query.
    Naive,
    /// Bubble sort a copy of the values for every query.
    Bubble,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Index,
        Strategy::Map,
        Strategy::Naive,
        Strategy::Bubble,
    ];

    /// Reference strategies are correct but do per-query work linear or worse
    /// in the number of values. They exist for differential testing only.
    pub fn is_reference(self) -> bool {
        matches!(self, Strategy::Naive | Strategy::Bubble)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Index => "index",
            Strategy::Map => "map",
            Strategy::Naive => "naive",
            Strategy::Bubble => "bubble",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Strategy {
    type Err = &'static str;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "index" => Ok(Self::Index),
            "map" => Ok(Self::Map),
            "naive" => Ok(Self::Naive),
            "bubble" => Ok(Self::Bubble),
            _ => Err("Invalid strategy"),
        }
    }
}
