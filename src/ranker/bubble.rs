use crate::ranker::Ranker;

/// [`Ranker`] that bubble sorts a copy of the values on every query.
///
/// `O(m^2)` per query, deliberately. It is the time-limit-exceeded baseline
/// for timing comparisons and must never be used to answer real input.
#[derive(Clone, Debug, Default)]
pub struct BubbleRanker<T> {
    values: Vec<T>,
}

impl<T: Ord + Copy + Send + Sync> Ranker<T> for BubbleRanker<T> {
    fn build(values: Vec<T>) -> Self {
        Self { values }
    }

    fn rank(&self, query: T) -> Option<usize> {
        let mut sorted = self.values.clone();
        let n = sorted.len();
        for i in 0..n {
            for j in 0..n - i - 1 {
                if sorted[j] < sorted[j + 1] {
                    sorted.swap(j, j + 1);
                }
            }
        }
        sorted.iter().position(|&x| x == query).map(|i| i + 1)
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
