use std::collections::HashMap;
use std::hash::Hash;

use crate::ranker::Ranker;
use crate::util::par_sort_descending;

/// [`Ranker`] backed by a map from each distinct value to its first rank.
///
/// Built with one sort and one `O(m)` pass; lookups are `O(1)` at the cost of
/// `O(distinct values)` extra memory.
#[derive(Clone, Debug, Default)]
pub struct RankMap<T: Eq + Hash> {
    ranks: HashMap<T, usize>,
    len: usize,
}

impl<T: Ord + Hash + Copy + Send + Sync> RankMap<T> {
    pub fn new(mut values: Vec<T>) -> Self {
        par_sort_descending(&mut values);

        let mut ranks = HashMap::with_capacity(values.len());
        for (i, &value) in values.iter().enumerate() {
            // Keep the first (smallest) position of each run of equal values.
            ranks.entry(value).or_insert(i + 1);
        }

        RankMap {
            ranks,
            len: values.len(),
        }
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        self.ranks.len()
    }
}

impl<T: Ord + Hash + Copy + Send + Sync> Ranker<T> for RankMap<T> {
    fn build(values: Vec<T>) -> Self {
        RankMap::new(values)
    }

    fn rank(&self, query: T) -> Option<usize> {
        self.ranks.get(&query).copied()
    }

    fn len(&self) -> usize {
        self.len
    }
}
