//! # randomiser_core: Foundation for Deterministic Replacement Randomisation
//!
//! ## Layer 1 (Foundation) Role
//!
//! randomiser_core is the bottom layer of the two-layer workspace, providing:
//! - Namespaced seed derivation and cached random streams (`rng`)
//! - Forward, reverse, bounded and lazy Fisher-Yates shuffles (`shuffle`)
//! - Replacement distributions across M:N cardinality regimes (`distribution`)
//! - Identifier, namespace key and error types (`types`)
//!
//! ## Minimal Dependency Principle
//!
//! Layer 1 has no dependencies on other randomiser_* crates:
//! - rand: `StdRng` streams and the operating-system entropy source
//! - sha2: SHA-256 for seed derivation
//! - thiserror: structured errors
//! - tracing: diagnostic events (no subscriber is installed here)
//!
//! ## Usage Examples
//!
//! ```rust
//! use randomiser_core::distribution::Distribution;
//! use randomiser_core::rng::SeedManager;
//! use randomiser_core::shuffle::reverse_fisher_yates;
//!
//! let manager = SeedManager::new(42, None);
//! let stream = manager.stream_by_key("weapons");
//!
//! let pool = [10, 20];
//! let distribution = Distribution::build(&pool, 5, &mut *stream.lock()).unwrap();
//! assert_eq!(distribution.len(), 5);
//!
//! let mut values = distribution.into_values();
//! reverse_fisher_yates(&mut values, &mut *stream.lock());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `NamespaceKey`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod distribution;
pub mod rng;
pub mod shuffle;
pub mod types;
