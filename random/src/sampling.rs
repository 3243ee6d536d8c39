//! Slice sampling helpers built on [`RandomSource`].

use crate::RandomSource;
use rand::seq::SliceRandom;

/// Pick one element uniformly. `None` for an empty slice.
pub fn choose<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: RandomSource + ?Sized,
{
    items.choose(rng.rng())
}

/// Draw up to `amount` distinct elements.
///
/// Requests larger than the slice return every element (capped draw).
pub fn sample_without_replacement<T, R>(rng: &mut R, items: &[T], amount: usize) -> Vec<T>
where
    T: Clone,
    R: RandomSource + ?Sized,
{
    items.choose_multiple(rng.rng(), amount).cloned().collect()
}
