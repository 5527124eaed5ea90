//! Permutation enumeration.
//!
//! [`Permutations`] walks every ordering of a slice exactly once, in
//! position-lexicographic order: orderings are compared by the original
//! positions of their elements, so for `[a, b, c]` the sequence starts with
//! `[a, b, c]`, `[a, c, b]`, `[b, a, c]`. The order only depends on the input
//! positions, never on the element values, which keeps runs deterministic.
//!
//! # Example
//!
//! ```
//! use permshard::permute::Permutations;
//!
//! let items = [1, 2, 3];
//! let all: Vec<Vec<i32>> = Permutations::new(&items)
//!     .map(|p| p.into_iter().copied().collect())
//!     .collect();
//!
//! assert_eq!(all.len(), 6);
//! assert_eq!(all[0], vec![1, 2, 3]);
//! assert_eq!(all[1], vec![1, 3, 2]);
//! ```

/// Returns `n!`, or `None` if it does not fit in a `u64`.
pub fn factorial(n: usize) -> Option<u64> {
    (2..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}

/// Iterator over every ordering of a slice.
///
/// Yields borrowed elements so that large element types are never cloned.
/// An empty slice has exactly one ordering: the empty one.
#[derive(Debug, Clone)]
pub struct Permutations<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
    state: State,
    remaining: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

impl<'a, T> Permutations<'a, T> {
    /// Create an iterator over the orderings of `items`.
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            indices: (0..items.len()).collect(),
            state: State::Fresh,
            remaining: factorial(items.len()),
        }
    }

    /// Advance to the next ordering and return it as positions into the
    /// original slice.
    ///
    /// This is the allocation-free form of [`Iterator::next`].
    pub fn next_indices(&mut self) -> Option<&[usize]> {
        match self.state {
            State::Fresh => self.state = State::Running,
            State::Running => {
                if !next_permutation(&mut self.indices) {
                    self.state = State::Done;
                    return None;
                }
            }
            State::Done => return None,
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        Some(&self.indices)
    }

    /// The slice being permuted.
    pub fn items(&self) -> &'a [T] {
        self.items
    }
}

impl<'a, T> Iterator for Permutations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        let items = self.items;
        self.next_indices()
            .map(|indices| indices.iter().map(|&i| &items[i]).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining.and_then(|r| usize::try_from(r).ok()) {
            Some(r) => (r, Some(r)),
            None => (usize::MAX, None),
        }
    }
}

/// Rearranges `indices` into the next greater ordering.
///
/// Returns `false` (leaving the slice untouched) once the last ordering has
/// been reached.
fn next_permutation(indices: &mut [usize]) -> bool {
    let n = indices.len();
    if n < 2 {
        return false;
    }

    let Some(pivot) = (0..n - 1).rev().find(|&i| indices[i] < indices[i + 1]) else {
        return false;
    };

    // pivot < n - 1 so a successor always exists
    let successor = (pivot + 1..n)
        .rev()
        .find(|&j| indices[j] > indices[pivot])
        .unwrap_or(pivot + 1);

    indices.swap(pivot, successor);
    indices[pivot + 1..].reverse();
    true
}
