//! Read-only filtered projection of a slice.

use std::ops::Index;

/// A view into a slice keeping only elements that satisfy a predicate.
///
/// Positions are computed once at construction. The view must be rebuilt
/// when either the backing slice or the predicate changes.
#[derive(Debug, Clone)]
pub struct FilteredView<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
}

impl<'a, T> FilteredView<'a, T> {
    /// Build the view in one pass over `items`.
    pub fn new<P>(items: &'a [T], mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let indices = items
            .iter()
            .enumerate()
            .filter(|(_, item)| predicate(*item))
            .map(|(i, _)| i)
            .collect();
        Self { items, indices }
    }

    /// Number of elements passing the predicate.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Element at a filtered position.
    pub fn get(&self, position: usize) -> Option<&'a T> {
        self.indices.get(position).map(|&i| &self.items[i])
    }

    /// Position in the backing slice of the element at a filtered position.
    pub fn original_index(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    /// All backing-slice positions, ascending.
    pub fn original_indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over `(original_index, element)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a T)> + '_ {
        self.indices.iter().map(|&i| (i, &self.items[i]))
    }
}

impl<T> Index<usize> for FilteredView<'_, T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        &self.items[self.indices[position]]
    }
}
