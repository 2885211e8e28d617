use std::fmt;

use tracing::debug;

use crate::ranker::Ranker;
use crate::util::{binary_search, is_sorted_descending, par_sort_descending};

/// Sentinel written for a query whose value does not occur.
pub const NOT_FOUND: i64 = -1;

/// A rank index is the input values sorted from largest to smallest.
/// Each query is answered by a binary search over that order.
#[derive(Clone, PartialEq, Eq)]
pub struct RankIndex<T = i64> {
    sorted: Box<[T]>,
}

impl<T: Ord + Copy + Send + Sync> RankIndex<T> {
    /// Creates a new rank index for `values` in `O(m log m)` time and `O(m)`
    /// space.
    pub fn new<S>(src: S) -> Self
    where
        S: Into<Vec<T>>,
    {
        let mut sorted = src.into();
        // Unstable sorting is fine: equal values are indistinguishable.
        par_sort_descending(&mut sorted);
        debug!(len = sorted.len(), "built rank index");

        RankIndex {
            sorted: sorted.into(),
        }
    }

    /// Returns the values in non-increasing order.
    pub fn sorted(&self) -> &[T] {
        &self.sorted
    }

    /// Consumes the index and returns the sorted values.
    pub fn into_sorted(self) -> Box<[T]> {
        self.sorted
    }

    /// Returns the number of values in the index, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns `true` iff `self.len() == 0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks the values are in descending order. This is always true for a
    /// valid index.
    pub fn is_sorted(&self) -> bool {
        is_sorted_descending(&self.sorted)
    }

    /// Returns the 1-based descending rank of `query`, or `None` if `query` is
    /// not one of the values.
    ///
    /// Runs in `O(log m)` time. Duplicates all share the rank of the first
    /// copy, which is one plus the number of strictly greater values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rankquery::RankIndex;
    ///
    /// let index = RankIndex::new(vec![5, 3, 3, 1]);
    /// assert_eq!(index.rank(3), Some(2));
    /// assert_eq!(index.rank(1), Some(4));
    /// assert_eq!(index.rank(2), None);
    /// ```
    pub fn rank(&self, query: T) -> Option<usize> {
        // Everything before `first` is strictly greater than the query.
        let first = binary_search(&self.sorted, |&x| x <= query);
        match self.sorted.get(first) {
            Some(&x) if x == query => Some(first + 1),
            _ => None,
        }
    }

    /// Like [`RankIndex::rank`] but with [`NOT_FOUND`] for missing values.
    pub fn rank_or_not_found(&self, query: T) -> i64 {
        self.rank(query).map_or(NOT_FOUND, |r| r as i64)
    }

    /// Returns the number of values strictly greater than `query`, whether or
    /// not `query` itself occurs.
    pub fn count_greater(&self, query: T) -> usize {
        binary_search(&self.sorted, |&x| x <= query)
    }

    /// Returns true if and only if `query` is one of the values.
    pub fn contains(&self, query: T) -> bool {
        self.rank(query).is_some()
    }
}

impl<T: Ord + Copy + Send + Sync> Ranker<T> for RankIndex<T> {
    fn build(values: Vec<T>) -> Self {
        RankIndex::new(values)
    }

    fn rank(&self, query: T) -> Option<usize> {
        RankIndex::rank(self, query)
    }

    fn len(&self) -> usize {
        RankIndex::len(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for RankIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n-----------------------------------------")?;
        writeln!(f, "RANK INDEX")?;
        for (i, value) in self.sorted.iter().enumerate() {
            writeln!(f, "rank[{}] {:?}", i + 1, value)?;
        }
        writeln!(f, "-----------------------------------------")
    }
}
