use crate::ranker::Ranker;

/// Brute-force [`Ranker`] that sorts a fresh copy of the values on every query.
///
/// `O(m log m)` per query. Only useful as a reference to test against.
#[derive(Clone, Debug, Default)]
pub struct NaiveRanker<T> {
    values: Vec<T>,
}

impl<T: Ord + Copy + Send + Sync> Ranker<T> for NaiveRanker<T> {
    fn build(values: Vec<T>) -> Self {
        Self { values }
    }

    fn rank(&self, query: T) -> Option<usize> {
        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        sorted.iter().position(|&x| x == query).map(|i| i + 1)
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
