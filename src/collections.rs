use std::cmp::Ordering;

/// In-place sorting by a projected field of each element.
pub trait SortByFieldExt<T> {
    /// Sorts by comparing the projections of each pair of elements with
    /// `compare`. The sort is stable.
    fn sort_by_field<K, F, C>(&mut self, field: F, compare: C)
    where
        F: FnMut(&T) -> K,
        C: FnMut(&K, &K) -> Ordering;
}

impl<T> SortByFieldExt<T> for [T] {
    fn sort_by_field<K, F, C>(&mut self, mut field: F, mut compare: C)
    where
        F: FnMut(&T) -> K,
        C: FnMut(&K, &K) -> Ordering,
    {
        self.sort_by(|a, b| compare(&field(a), &field(b)));
    }
}

/// Copying counterpart of [`SortByFieldExt`].
pub trait SortedByFieldExt<T>: Sized {
    /// Returns the elements, sorted by the projected field.
    fn sorted_by_field<K, F, C>(self, field: F, compare: C) -> Self
    where
        F: FnMut(&T) -> K,
        C: FnMut(&K, &K) -> Ordering;
}

impl<T> SortedByFieldExt<T> for Vec<T> {
    fn sorted_by_field<K, F, C>(mut self, field: F, compare: C) -> Self
    where
        F: FnMut(&T) -> K,
        C: FnMut(&K, &K) -> Ordering,
    {
        self.sort_by_field(field, compare);

        self
    }
}
