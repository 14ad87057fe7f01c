//! Pairwise compatibility predicates.
//!
//! A [`Validator`] judges one `(target, replacement)` pair at a time. It may
//! hold precomputed state (conflict tables and the like) but must be
//! deterministic and free of side effects, since the retrying path calls it
//! repeatedly for the same pairs.

use randomiser_core::types::{ReplacementId, TargetId};

/// Compatibility predicate over a single pairing.
///
/// Implemented for every `Fn(TargetId, ReplacementId) -> bool` closure.
///
/// # Examples
///
/// ```rust
/// use randomiser_engine::validator::Validator;
///
/// struct NoSelfMapping;
///
/// impl Validator for NoSelfMapping {
///     fn validate(&self, target: i64, replacement: i64) -> bool {
///         target != replacement
///     }
/// }
///
/// assert!(NoSelfMapping.validate(1, 2));
/// assert!(!NoSelfMapping.validate(3, 3));
///
/// let even_only = |_: i64, replacement: i64| replacement % 2 == 0;
/// assert!(even_only.validate(1, 4));
/// ```
pub trait Validator: Send + Sync {
    /// Returns `true` if `replacement` may stand in for `target`.
    fn validate(&self, target: TargetId, replacement: ReplacementId) -> bool;
}

impl<F> Validator for F
where
    F: Fn(TargetId, ReplacementId) -> bool + Send + Sync,
{
    #[inline]
    fn validate(&self, target: TargetId, replacement: ReplacementId) -> bool {
        self(target, replacement)
    }
}

/// Rejects every pair; useful for exercising retry exhaustion.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectAll;

impl Validator for RejectAll {
    #[inline]
    fn validate(&self, _target: TargetId, _replacement: ReplacementId) -> bool {
        false
    }
}

/// Accepts every pair; a validated run then matches the unconstrained one.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    #[inline]
    fn validate(&self, _target: TargetId, _replacement: ReplacementId) -> bool {
        true
    }
}
