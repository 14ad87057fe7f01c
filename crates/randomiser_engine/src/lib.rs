//! # randomiser_engine: Validated Replacement Randomisation
//!
//! ## Layer 2 (Engine) Role
//!
//! randomiser_engine builds on randomiser_core to provide:
//! - Pairwise compatibility predicates (`validator`)
//! - Randomisation groups with unconstrained, validated and retrying paths (`group`)
//! - The keyed registry sharing one seed manager (`registry`)
//! - TOML/environment configuration (`config`)
//! - Result mappings (`mapping`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use randomiser_engine::group::RandomisationGroup;
//! use randomiser_engine::registry::ReplacementRandomiser;
//!
//! let mut randomiser = ReplacementRandomiser::with_seed(42, None);
//!
//! randomiser
//!     .add_group("items", RandomisationGroup::new(vec![1, 2, 3, 4, 5], vec![10, 20]).unwrap())
//!     .unwrap();
//! randomiser
//!     .add_group(
//!         "rooms",
//!         RandomisationGroup::builder()
//!             .targets([1, 2, 3])
//!             .replacements([1, 2, 3])
//!             .validator(|room: i64, replacement: i64| room != replacement)
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let items = randomiser.randomise_group("items").unwrap();
//! assert!(items.usage_counts().values().all(|&count| count >= 2));
//!
//! let rooms = randomiser.retrying_randomise_group("rooms", None).unwrap();
//! assert!(rooms.iter().all(|(room, replacement)| room != replacement));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod group;
pub mod mapping;
pub mod registry;
pub mod validator;

pub use config::RandomiserConfig;
pub use group::{RandomisationGroup, DEFAULT_MAX_ATTEMPTS};
pub use mapping::ReplacementMapping;
pub use registry::ReplacementRandomiser;
pub use validator::Validator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
