//! # Randomisation Groups
//!
//! A [`RandomisationGroup`] owns one `(targets, replacements, validator?)`
//! triple and turns a random stream into a [`ReplacementMapping`].
//!
//! ## Attempt Lifecycle
//!
//! Every attempt moves through the same states:
//!
//! ```text
//! Generated -> Shuffling -> Validating -> Accepted
//!                                      -> Rejected
//! ```
//!
//! - **Generated**: the [`Distribution`] is built (or restored from its snapshot)
//! - **Shuffling / Validating**: a lazy reverse Fisher-Yates finalises one
//!   position at a time and the validator judges it immediately
//! - **Accepted**: every target's position passed
//! - **Rejected**: the first failing position ends the attempt
//!
//! The non-retrying path turns a rejection into an error. The retrying path
//! restores the distribution from its pre-shuffle snapshot and reshuffles
//! with the same stream, so remainder selection happens once per call and
//! each attempt is an independent uniform permutation (plain rejection
//! sampling).
//!
//! ## Usage Example
//!
//! ```rust
//! use randomiser_core::rng::StreamRng;
//! use randomiser_engine::group::{RandomisationGroup, DEFAULT_MAX_ATTEMPTS};
//!
//! let group = RandomisationGroup::builder()
//!     .targets([1, 2, 3, 4])
//!     .replacements([1, 2, 3, 4])
//!     .validator(|target: i64, replacement: i64| target != replacement)
//!     .build()
//!     .unwrap();
//!
//! let mut rng = StreamRng::from_seed(42);
//! let mapping = group
//!     .retrying_validated_randomise(&mut rng, DEFAULT_MAX_ATTEMPTS)
//!     .unwrap();
//!
//! for (target, replacement) in mapping.iter() {
//!     assert_ne!(target, replacement);
//! }
//! ```

mod builder;

pub use builder::RandomisationGroupBuilder;

use std::fmt;

use rand::Rng;
use randomiser_core::distribution::{Cardinality, Distribution};
use randomiser_core::shuffle::{bounded_reverse_fisher_yates, LazyReverseShuffle};
use randomiser_core::types::{
    ConfigurationError, ConstraintViolation, RandomiserError, ReplacementId, Result, TargetId,
};

use crate::mapping::ReplacementMapping;
use crate::validator::Validator;

/// Attempt budget used when the caller does not supply one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Targets, their replacement pool and an optional validator.
pub struct RandomisationGroup {
    targets: Vec<TargetId>,
    replacements: Vec<ReplacementId>,
    validator: Option<Box<dyn Validator>>,
}

impl RandomisationGroup {
    /// Creates a group without a validator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either sequence is empty.
    pub fn new(targets: Vec<TargetId>, replacements: Vec<ReplacementId>) -> Result<Self> {
        Self::from_parts(targets, replacements, None)
    }

    /// Creates a group guarded by `validator`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either sequence is empty.
    pub fn with_validator<V>(
        targets: Vec<TargetId>,
        replacements: Vec<ReplacementId>,
        validator: V,
    ) -> Result<Self>
    where
        V: Validator + 'static,
    {
        Self::from_parts(targets, replacements, Some(Box::new(validator)))
    }

    /// Creates a new group builder.
    pub fn builder() -> RandomisationGroupBuilder {
        RandomisationGroupBuilder::default()
    }

    pub(crate) fn from_parts(
        targets: Vec<TargetId>,
        replacements: Vec<ReplacementId>,
        validator: Option<Box<dyn Validator>>,
    ) -> Result<Self> {
        if targets.is_empty() {
            return Err(ConfigurationError::EmptyTargets.into());
        }
        if replacements.is_empty() {
            return Err(ConfigurationError::EmptyReplacements.into());
        }
        Ok(Self {
            targets,
            replacements,
            validator,
        })
    }

    /// Returns the targets in their original order.
    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// Returns the replacement pool in its original order.
    pub fn replacements(&self) -> &[ReplacementId] {
        &self.replacements
    }

    /// Returns `true` if the group carries a validator.
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Returns the target count relative to the pool size.
    pub fn cardinality(&self) -> Cardinality {
        Cardinality::of(self.targets.len(), self.replacements.len())
    }

    /// Assigns a replacement to every target, ignoring any validator.
    ///
    /// Only the first `min(M, len - 1)` positions of the distribution are
    /// shuffled; target `i` then takes position `i`.
    ///
    /// # Errors
    ///
    /// Construction already rules out every error this can return.
    pub fn randomise<R>(&self, rng: &mut R) -> Result<ReplacementMapping>
    where
        R: Rng + ?Sized,
    {
        let mut values = self.distribution(rng)?.into_values();
        let steps = self.targets.len().min(values.len() - 1);
        if steps > 0 {
            bounded_reverse_fisher_yates(&mut values, steps, rng)?;
        }
        Ok(self.assemble(&values))
    }

    /// Single validated attempt; the first rejected pair fails the call.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::MissingValidator` without a validator
    /// - `RandomiserError::ConstraintViolation` on the first rejected pair
    pub fn validated_randomise<R>(&self, rng: &mut R) -> Result<ReplacementMapping>
    where
        R: Rng + ?Sized,
    {
        let validator = self.require_validator()?;
        let mut values = self.distribution(rng)?.into_values();
        self.attempt(&mut values, validator, rng)?;
        Ok(self.assemble(&values))
    }

    /// Validated randomisation with up to `max_attempts` attempts.
    ///
    /// Each rejected attempt restores the pre-shuffle snapshot and draws a
    /// fresh permutation from the same stream. Accepted results are
    /// therefore distributed exactly like unconstrained results conditioned
    /// on passing the validator.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::InvalidAttemptBudget` if `max_attempts` is zero
    /// - `ConfigurationError::MissingValidator` without a validator
    /// - `RandomiserError::RetryBudgetExhausted` after `max_attempts` rejections
    pub fn retrying_validated_randomise<R>(
        &self,
        rng: &mut R,
        max_attempts: u32,
    ) -> Result<ReplacementMapping>
    where
        R: Rng + ?Sized,
    {
        if max_attempts == 0 {
            return Err(ConfigurationError::InvalidAttemptBudget(max_attempts).into());
        }
        let validator = self.require_validator()?;
        let snapshot = self.distribution(rng)?.into_values();
        let mut working = snapshot.clone();

        let mut attempts = 0;
        loop {
            attempts += 1;
            working.copy_from_slice(&snapshot);

            match self.attempt(&mut working, validator, rng) {
                Ok(()) => {
                    if attempts > 1 {
                        tracing::debug!(attempts, "validated mapping accepted after retries");
                    }
                    return Ok(self.assemble(&working));
                }
                Err(violation) if attempts < max_attempts => {
                    tracing::trace!(
                        attempt = attempts,
                        position = violation.position,
                        target = violation.target,
                        replacement = violation.replacement,
                        "attempt rejected"
                    );
                }
                Err(violation) => {
                    tracing::debug!(attempts, "retry budget exhausted");
                    return Err(RandomiserError::RetryBudgetExhausted {
                        attempts,
                        last_violation: violation,
                    });
                }
            }
        }
    }

    fn require_validator(&self) -> Result<&dyn Validator> {
        self.validator
            .as_deref()
            .ok_or_else(|| ConfigurationError::MissingValidator.into())
    }

    fn distribution<R>(&self, rng: &mut R) -> Result<Distribution>
    where
        R: Rng + ?Sized,
    {
        Distribution::build(&self.replacements, self.targets.len(), rng)
    }

    /// Shuffles lazily and validates each target's position as soon as it is
    /// final. The distribution holds at least one slot per target, so reused
    /// values (M > N) are judged in the same pass.
    fn attempt<R>(
        &self,
        values: &mut [ReplacementId],
        validator: &dyn Validator,
        rng: &mut R,
    ) -> std::result::Result<(), ConstraintViolation>
    where
        R: Rng + ?Sized,
    {
        let shuffle = LazyReverseShuffle::new(values, rng).take(self.targets.len());
        for (position, replacement) in shuffle {
            let target = self.targets[position];
            if !validator.validate(target, replacement) {
                return Err(ConstraintViolation {
                    position,
                    target,
                    replacement,
                });
            }
        }
        Ok(())
    }

    fn assemble(&self, values: &[ReplacementId]) -> ReplacementMapping {
        let replacements = (0..self.targets.len())
            .map(|i| values[i % values.len()])
            .collect();
        ReplacementMapping::new(self.targets.clone(), replacements)
    }
}

impl fmt::Debug for RandomisationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomisationGroup")
            .field("targets", &self.targets)
            .field("replacements", &self.replacements)
            .field("has_validator", &self.has_validator())
            .finish()
    }
}

#[cfg(test)]
mod tests;
