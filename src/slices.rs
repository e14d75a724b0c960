//! Small slice helpers.
use std::iter::Sum;

/// Sorted copy of `items`; the input is left untouched.
pub fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
    let mut keys = items.to_vec();
    keys.sort();
    keys
}

/// Sorts the items and joins them with a newline and a tab, ready to be
/// printed under a heading.
pub fn tab_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    items.sort_unstable();
    items.join("\n\t")
}

/// Smallest element, or the type's default for an empty slice.
pub fn min_or_default<T: Ord + Copy + Default>(items: &[T]) -> T {
    items.iter().copied().min().unwrap_or_default()
}

/// Largest element, or the type's default for an empty slice.
pub fn max_or_default<T: Ord + Copy + Default>(items: &[T]) -> T {
    items.iter().copied().max().unwrap_or_default()
}

/// Sum of all elements; zero for an empty slice.
pub fn sum<T: Copy + Sum<T>>(items: &[T]) -> T {
    items.iter().copied().sum()
}
