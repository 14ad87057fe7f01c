//! In-place Fisher-Yates shuffles.
//!
//! Both directions produce a uniformly random permutation:
//!
//! - **Forward** fixes the suffix first: for `i` from `len - 1` down to `1`,
//!   swap `i` with `j` drawn uniformly from `[0, i]`.
//! - **Reverse** fixes the prefix first: for `i` from `0` up to `len - 2`,
//!   swap `i` with `j` drawn uniformly from `[i, len - 1]`.
//!
//! The lazy variants are iterators that yield `(index, value)` as soon as a
//! position is final. Consumers can validate each value in turn and stop
//! early; the slice is left partially shuffled. A lazy iterator cannot be
//! resumed once dropped, only rebuilt over a fresh or restored slice.

use rand::Rng;

use crate::types::ShuffleError;

/// Forward Fisher-Yates over the whole slice.
pub fn fisher_yates<T, R>(values: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..values.len()).rev() {
        let j = rng.gen_range(0..=i);
        values.swap(i, j);
    }
}

/// Reverse Fisher-Yates over the whole slice.
pub fn reverse_fisher_yates<T, R>(values: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    let len = values.len();
    for i in 0..len.saturating_sub(1) {
        let j = rng.gen_range(i..len);
        values.swap(i, j);
    }
}

/// Performs only the first `steps` reverse Fisher-Yates steps.
///
/// Positions `0..steps` end up holding a uniformly random ordered sample of
/// the slice; the remaining positions hold the rest in unspecified order.
/// With `steps == len - 1` this is a full shuffle.
///
/// # Errors
///
/// Returns `ShuffleError::InvalidStepCount` unless `1 <= steps <= len - 1`.
///
/// # Examples
///
/// ```rust
/// use randomiser_core::rng::StreamRng;
/// use randomiser_core::shuffle::bounded_reverse_fisher_yates;
///
/// let mut rng = StreamRng::from_seed(1);
/// let mut values = [1, 2, 3, 4, 5];
/// bounded_reverse_fisher_yates(&mut values, 2, &mut rng).unwrap();
///
/// assert!(bounded_reverse_fisher_yates(&mut values, 5, &mut rng).is_err());
/// ```
pub fn bounded_reverse_fisher_yates<T, R>(
    values: &mut [T],
    steps: usize,
    rng: &mut R,
) -> Result<(), ShuffleError>
where
    R: Rng + ?Sized,
{
    let len = values.len();
    if steps == 0 || steps >= len {
        return Err(ShuffleError::InvalidStepCount { steps, len });
    }
    for i in 0..steps {
        let j = rng.gen_range(i..len);
        values.swap(i, j);
    }
    Ok(())
}

/// Lazy reverse Fisher-Yates; yields positions `0, 1, ..., len - 1`.
///
/// # Examples
///
/// ```rust
/// use randomiser_core::rng::StreamRng;
/// use randomiser_core::shuffle::LazyReverseShuffle;
///
/// let mut rng = StreamRng::from_seed(3);
/// let mut values = [10, 20, 30, 40];
///
/// // Stop at the first value above 25
/// let first_large = LazyReverseShuffle::new(&mut values, &mut rng)
///     .find(|&(_, value)| value > 25);
/// assert!(first_large.is_some());
/// ```
#[derive(Debug)]
pub struct LazyReverseShuffle<'a, T, R: ?Sized> {
    values: &'a mut [T],
    rng: &'a mut R,
    next: usize,
}

impl<'a, T, R> LazyReverseShuffle<'a, T, R>
where
    T: Copy,
    R: Rng + ?Sized,
{
    /// Starts a lazy shuffle over `values`.
    pub fn new(values: &'a mut [T], rng: &'a mut R) -> Self {
        Self {
            values,
            rng,
            next: 0,
        }
    }
}

impl<T, R> Iterator for LazyReverseShuffle<'_, T, R>
where
    T: Copy,
    R: Rng + ?Sized,
{
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.values.len();
        let i = self.next;
        if i >= len {
            return None;
        }
        // The last position is final once every earlier one is.
        if i + 1 < len {
            let j = self.rng.gen_range(i..len);
            self.values.swap(i, j);
        }
        self.next += 1;
        Some((i, self.values[i]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.values.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl<T, R> ExactSizeIterator for LazyReverseShuffle<'_, T, R>
where
    T: Copy,
    R: Rng + ?Sized,
{
}

/// Lazy forward Fisher-Yates; yields positions `len - 1, ..., 1, 0`.
#[derive(Debug)]
pub struct LazyForwardShuffle<'a, T, R: ?Sized> {
    values: &'a mut [T],
    rng: &'a mut R,
    // Number of positions not yet yielded.
    remaining: usize,
}

impl<'a, T, R> LazyForwardShuffle<'a, T, R>
where
    T: Copy,
    R: Rng + ?Sized,
{
    /// Starts a lazy shuffle over `values`.
    pub fn new(values: &'a mut [T], rng: &'a mut R) -> Self {
        let remaining = values.len();
        Self {
            values,
            rng,
            remaining,
        }
    }
}

impl<T, R> Iterator for LazyForwardShuffle<'_, T, R>
where
    T: Copy,
    R: Rng + ?Sized,
{
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.remaining - 1;
        if i > 0 {
            let j = self.rng.gen_range(0..=i);
            self.values.swap(i, j);
        }
        self.remaining -= 1;
        Some((i, self.values[i]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, R> ExactSizeIterator for LazyForwardShuffle<'_, T, R>
where
    T: Copy,
    R: Rng + ?Sized,
{
}
