//! Weight strategies

use crate::dtype::Element;
use std::marker::PhantomData;

/// Per-sample weight accessor.
pub trait WeightSource<T: Element>: Sync {
    /// Weight of the sample at `index`
    fn get(&self, index: usize) -> T;
}

/// Every sample weighs one: the histogram counts samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWeights<T> {
    _marker: PhantomData<T>,
}

impl<T> NoWeights<T> {
    /// Create the unit-weight strategy
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Element> WeightSource<T> for NoWeights<T> {
    #[inline]
    fn get(&self, _index: usize) -> T {
        T::one()
    }
}

/// Weights read from an array, one per sample.
#[derive(Debug, Clone, Copy)]
pub struct Weights<'a, T> {
    data: &'a [T],
}

impl<'a, T> Weights<'a, T> {
    /// Read weights from `data`; the caller guarantees one weight per sample
    pub fn new(data: &'a [T]) -> Self {
        Self { data }
    }
}

impl<T: Element> WeightSource<T> for Weights<'_, T> {
    #[inline]
    fn get(&self, index: usize) -> T {
        debug_assert!(index < self.data.len());
        self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_weights_is_identity() {
        assert_eq!(NoWeights::<u64>::new().get(12345), 1);
        assert_eq!(NoWeights::<f32>::new().get(0), 1.0);
    }

    #[test]
    fn test_weights_read_by_index() {
        let w = [0.5f64, 2.0, 4.0];
        let weights = Weights::new(&w);
        assert_eq!(weights.get(1), 2.0);
        assert_eq!(weights.get(2), 4.0);
    }
}
