//! Error types for structured error handling.
//!
//! This module provides:
//! - `RandomiserError`: every failure a randomisation call can signal
//! - `ConfigurationError`: invalid construction or missing capabilities
//! - `ConstraintViolation`: the first (target, replacement) pair a validator rejected
//! - `ShuffleError`: argument errors from the bounded shuffle

use super::{NamespaceKey, ReplacementId, TargetId};
use thiserror::Error;

/// Result alias used throughout the randomiser crates.
pub type Result<T> = std::result::Result<T, RandomiserError>;

/// Invalid construction or missing capability.
///
/// Raised immediately and never retried.
///
/// # Examples
/// ```
/// use randomiser_core::types::ConfigurationError;
///
/// let err = ConfigurationError::InvalidAttemptBudget(0);
/// assert_eq!(
///     format!("{}", err),
///     "Invalid attempt budget 0: must be at least 1"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A validated operation was requested on a group without a validator.
    #[error("Validated randomisation requires a validator")]
    MissingValidator,

    /// The target sequence is empty.
    #[error("Target sequence must not be empty")]
    EmptyTargets,

    /// The replacement pool is empty.
    #[error("Replacement pool must not be empty")]
    EmptyReplacements,

    /// Retry budget below one.
    #[error("Invalid attempt budget {0}: must be at least 1")]
    InvalidAttemptBudget(u32),

    /// The operating-system entropy source failed while generating a base seed.
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

/// A (target, replacement) pair rejected by a validator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Replacement {replacement} rejected for target {target} at position {position}")]
pub struct ConstraintViolation {
    /// Position of the target within its group.
    pub position: usize,
    /// Target that was being assigned.
    pub target: TargetId,
    /// Replacement the validator rejected.
    pub replacement: ReplacementId,
}

/// Bounded shuffle argument errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleError {
    /// Step count outside `[1, len - 1]`.
    #[error("Invalid shuffle step count {steps} for length {len}: must be in range [1, len - 1]")]
    InvalidStepCount {
        /// Requested number of steps.
        steps: usize,
        /// Length of the slice being shuffled.
        len: usize,
    },
}

/// Every failure a randomisation call can signal.
///
/// Callers distinguish the conditions by variant; a failed call never
/// returns a partial mapping.
///
/// # Variants
/// - `Configuration`: invalid construction, missing validator, bad budget
/// - `ConstraintViolation`: a validator rejected a pair (non-retrying path)
/// - `RetryBudgetExhausted`: every attempt of the retrying path was rejected
/// - `UnrecognisedKey`: no group is registered under the key
/// - `DuplicateKey`: a group is already registered under the key
/// - `Shuffle`: bounded shuffle argument error
///
/// # Examples
/// ```
/// use randomiser_core::types::{NamespaceKey, RandomiserError};
///
/// let err = RandomiserError::UnrecognisedKey(NamespaceKey::from("y"));
/// assert_eq!(format!("{}", err), "Unrecognised key: y");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RandomiserError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A validator rejected a pair.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(#[from] ConstraintViolation),

    /// Every attempt was rejected.
    #[error("Retry budget exhausted after {attempts} attempts (last: {last_violation})")]
    RetryBudgetExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Violation that rejected the final attempt.
        last_violation: ConstraintViolation,
    },

    /// No group registered under the key.
    #[error("Unrecognised key: {0}")]
    UnrecognisedKey(NamespaceKey),

    /// A group is already registered under the key.
    #[error("Duplicate key: {0}")]
    DuplicateKey(NamespaceKey),

    /// Bounded shuffle argument error.
    #[error("Shuffle error: {0}")]
    Shuffle(#[from] ShuffleError),
}

impl RandomiserError {
    /// Returns `true` for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RandomiserError::Configuration(_))
    }

    /// Returns the attempt count carried by a retry exhaustion.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            RandomiserError::RetryBudgetExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
