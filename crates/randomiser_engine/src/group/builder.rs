//! Fluent construction of [`RandomisationGroup`]s.

use std::fmt;

use randomiser_core::types::{ReplacementId, Result, TargetId};

use super::RandomisationGroup;
use crate::validator::Validator;

/// Builder for [`RandomisationGroup`].
///
/// Validation happens once, at [`build`](Self::build) time.
///
/// # Examples
///
/// ```rust
/// use randomiser_engine::group::RandomisationGroup;
///
/// let group = RandomisationGroup::builder()
///     .targets(1..=5)
///     .replacements([10, 20])
///     .build()
///     .expect("valid group");
///
/// assert_eq!(group.targets().len(), 5);
/// assert!(!group.has_validator());
///
/// // Missing targets fail fast
/// assert!(RandomisationGroup::builder().replacements([1]).build().is_err());
/// ```
#[derive(Default)]
pub struct RandomisationGroupBuilder {
    targets: Vec<TargetId>,
    replacements: Vec<ReplacementId>,
    validator: Option<Box<dyn Validator>>,
}

impl RandomisationGroupBuilder {
    /// Sets the targets, in order.
    pub fn targets<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = TargetId>,
    {
        self.targets = targets.into_iter().collect();
        self
    }

    /// Sets the replacement pool, in order.
    pub fn replacements<I>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = ReplacementId>,
    {
        self.replacements = replacements.into_iter().collect();
        self
    }

    /// Attaches a validator.
    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Builds the group.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if targets or replacements are empty.
    pub fn build(self) -> Result<RandomisationGroup> {
        RandomisationGroup::from_parts(self.targets, self.replacements, self.validator)
    }
}

impl fmt::Debug for RandomisationGroupBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomisationGroupBuilder")
            .field("targets", &self.targets)
            .field("replacements", &self.replacements)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}
