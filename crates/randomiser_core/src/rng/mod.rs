//! # Random Stream Infrastructure
//!
//! This module provides the random streams consumed by the shuffles. Every
//! stream is derived from one base seed through a [`SeedManager`], so a
//! single number reproduces every randomisation.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: a stream's seed depends only on
//!   `(prefix, base_seed, key)`, never on request order
//! - **Independence**: each namespace key owns its own generator
//! - **Secure defaults**: missing base seeds come from the OS entropy
//!   source, never from the clock
//!
//! ## Module Structure
//!
//! - [`StreamRng`]: seeded PRNG wrapper (`rand::rngs::StdRng`)
//! - [`SeedManager`]: SHA-256 seed derivation plus the key → stream cache
//! - [`RngHandle`]: shared, lockable handle to one cached stream
//!
//! ## Usage Example
//!
//! ```rust
//! use randomiser_core::rng::SeedManager;
//!
//! let manager = SeedManager::new(42, None);
//! let items = manager.stream_by_key("items");
//! let rooms = manager.stream_by_id(3);
//!
//! let i = items.lock().gen_index(10);
//! let j = rooms.lock().gen_index(10);
//! assert!(i < 10 && j < 10);
//! assert_eq!(manager.cached_streams(), 2);
//! ```

mod seed;
mod stream;

pub use seed::{RngHandle, SeedManager, BASE_SEED_MASK, DERIVED_SEED_MASK};
pub use stream::StreamRng;
