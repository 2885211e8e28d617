use rayon::prelude::*;

/// Binary search to find first element such that `pred(T) == true`.
///
/// Assumes that if `pred(xs[i]) == true` then `pred(xs[i+1]) == true`.
///
/// If all elements yield `pred(T) == false`, then `xs.len()` is returned.
pub fn binary_search<T, F>(xs: &[T], mut pred: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let (mut left, mut right) = (0, xs.len());
    while left < right {
        let mid = left + (right - left) / 2;
        if pred(&xs[mid]) {
            right = mid;
        } else {
            left = mid + 1;
        }
    }
    left
}

/// Sort `xs` from largest to smallest in parallel.
///
/// Rayon falls back to a sequential sort for small inputs, so there is no
/// overhead worth guarding against here.
pub fn par_sort_descending<T: Ord + Send>(xs: &mut [T]) {
    xs.par_sort_unstable_by(|a, b| b.cmp(a));
}

/// Checks that `xs` is non-increasing.
pub fn is_sorted_descending<T: Ord + Sync>(xs: &[T]) -> bool {
    xs.par_windows(2).all(|pair| pair[0] >= pair[1])
}
