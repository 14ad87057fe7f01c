//! Replacement distributions.
//!
//! A [`Distribution`] is the sequence of replacement values that a
//! randomisation attempt permutes. Its length is `max(M, N)` for `M`
//! targets and a pool of `N` replacements:
//!
//! | Regime | Contents |
//! |--------|----------|
//! | `M <= N` | a copy of the pool |
//! | `M > N` | the pool repeated `M / N` times, then `M % N` distinct pool values |
//!
//! The repeated block guarantees every replacement is used at least
//! `M / N` times regardless of randomness. The remainder is the prefix of a
//! fresh uniform permutation of the pool, so it is an unbiased sample without
//! duplicates.

use rand::Rng;

use crate::shuffle::fisher_yates;
use crate::types::{ConfigurationError, ReplacementId, Result};

/// Size of the target sequence relative to the replacement pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Fewer targets than replacements (`M < N`).
    Fewer,
    /// As many targets as replacements (`M == N`).
    Equal,
    /// More targets than replacements (`M > N`); replacements are reused.
    More,
}

impl Cardinality {
    /// Classifies `target_count` against `pool_size`.
    pub fn of(target_count: usize, pool_size: usize) -> Self {
        match target_count.cmp(&pool_size) {
            std::cmp::Ordering::Less => Cardinality::Fewer,
            std::cmp::Ordering::Equal => Cardinality::Equal,
            std::cmp::Ordering::Greater => Cardinality::More,
        }
    }
}

/// Pre-shuffle replacement sequence for one group.
///
/// # Examples
///
/// ```rust
/// use randomiser_core::distribution::{Cardinality, Distribution};
/// use randomiser_core::rng::StreamRng;
///
/// let mut rng = StreamRng::from_seed(42);
/// let pool = [10, 20];
/// let distribution = Distribution::build(&pool, 5, &mut rng).unwrap();
///
/// assert_eq!(distribution.cardinality(), Cardinality::More);
/// assert_eq!(&distribution.values()[..4], &[10, 20, 10, 20]);
/// assert!(pool.contains(&distribution.values()[4]));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distribution {
    values: Vec<ReplacementId>,
    cardinality: Cardinality,
}

impl Distribution {
    /// Builds the distribution for `target_count` targets over `pool`.
    ///
    /// Only the `M > N` regime with a non-zero remainder consumes randomness.
    /// The caller's pool is never modified.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::EmptyTargets` or
    /// `ConfigurationError::EmptyReplacements` for empty inputs.
    pub fn build<R>(pool: &[ReplacementId], target_count: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        if target_count == 0 {
            return Err(ConfigurationError::EmptyTargets.into());
        }
        if pool.is_empty() {
            return Err(ConfigurationError::EmptyReplacements.into());
        }

        let cardinality = Cardinality::of(target_count, pool.len());
        let values = match cardinality {
            Cardinality::Fewer | Cardinality::Equal => pool.to_vec(),
            Cardinality::More => {
                let repeats = target_count / pool.len();
                let remainder = target_count % pool.len();

                let mut values = Vec::with_capacity(target_count);
                for _ in 0..repeats {
                    values.extend_from_slice(pool);
                }
                if remainder > 0 {
                    let mut extra = pool.to_vec();
                    fisher_yates(&mut extra, rng);
                    values.extend_from_slice(&extra[..remainder]);
                }
                values
            }
        };

        Ok(Self {
            values,
            cardinality,
        })
    }

    /// Returns the values in their pre-shuffle order.
    pub fn values(&self) -> &[ReplacementId] {
        &self.values
    }

    /// Consumes the distribution, returning its values.
    pub fn into_values(self) -> Vec<ReplacementId> {
        self.values
    }

    /// Returns the number of slots, `max(M, N)`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; empty inputs are rejected at build time.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the cardinality regime this distribution was built for.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}
