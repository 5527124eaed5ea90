//! The ordered input to a pipeline run.

use std::collections::HashMap;
use std::fmt::Display;

use crate::error::{PipelineError, PipelineResult};
use crate::record::check_element_text;

/// Length of the reference input used when no elements are supplied.
pub const REFERENCE_INPUT_LEN: u32 = 10;

/// An ordered sequence of distinct, printable elements.
///
/// Immutable once built. Elements are distinct both by `PartialEq` and by
/// display text, and every display text is usable inside a record, so each
/// permutation is written as its own unique, parseable line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSequence<T> {
    elements: Vec<T>,
}

impl<T> InputSequence<T>
where
    T: PartialEq + Display,
{
    /// Build a sequence, rejecting repeated elements and element text that
    /// cannot be written into a record.
    pub fn new(elements: Vec<T>) -> PipelineResult<Self> {
        let mut texts: HashMap<String, usize> = HashMap::with_capacity(elements.len());

        for (i, element) in elements.iter().enumerate() {
            if let Some(j) = elements[..i].iter().position(|e| e == element) {
                return Err(PipelineError::InvalidInput(format!(
                    "element '{}' appears at positions {} and {}",
                    element, j, i
                )));
            }

            let text = element.to_string();
            if let Err(reason) = check_element_text(&text) {
                return Err(PipelineError::InvalidInput(format!(
                    "element '{}' at position {}: {}",
                    text.escape_debug(),
                    i,
                    reason
                )));
            }
            if let Some(j) = texts.insert(text, i) {
                return Err(PipelineError::InvalidInput(format!(
                    "elements at positions {} and {} have the same text '{}'",
                    j, i, element
                )));
            }
        }
        Ok(Self { elements })
    }
}

impl<T> InputSequence<T> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// The element at `index` and every other element in their original order.
    pub fn split_at_index(&self, index: usize) -> Option<(&T, Vec<&T>)> {
        let fixed = self.elements.get(index)?;
        let rest = self
            .elements
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, e)| e)
            .collect();
        Some((fixed, rest))
    }
}

impl InputSequence<u32> {
    /// The integers `1..=10`.
    pub fn reference() -> Self {
        Self {
            elements: (1..=REFERENCE_INPUT_LEN).collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a InputSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
