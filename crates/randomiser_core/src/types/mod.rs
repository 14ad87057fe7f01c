//! Core types shared by every layer.
//!
//! - [`TargetId`] / [`ReplacementId`]: integer identifiers
//! - [`NamespaceKey`]: selects one independent random stream
//! - [`RandomiserError`] and friends: the failure taxonomy

pub mod error;
pub mod key;

pub use error::{ConfigurationError, ConstraintViolation, RandomiserError, Result, ShuffleError};
pub use key::NamespaceKey;

/// Identifier of an element that needs a replacement.
pub type TargetId = i64;

/// Identifier of an element usable as a substitute.
pub type ReplacementId = i64;
