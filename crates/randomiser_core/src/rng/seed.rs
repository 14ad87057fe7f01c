//! Namespaced seed derivation and the stream cache.
//!
//! A [`SeedManager`] turns one base seed (plus an optional prefix) into an
//! independent [`StreamRng`] per [`NamespaceKey`]. Each derived seed is a
//! pure function of `(prefix, base_seed, key)`, so streams are reproducible
//! across processes and independent of the order in which keys are requested.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::StreamRng;
use crate::types::{ConfigurationError, NamespaceKey, Result};

/// Clears the sign bit of a 64-bit base seed.
pub const BASE_SEED_MASK: u64 = 0x7FFF_FFFF_FFFF_FFFF;

/// Clears the sign bit of a 32-bit derived seed.
pub const DERIVED_SEED_MASK: u32 = 0x7FFF_FFFF;

/// Shared handle to one cached stream.
///
/// Clones refer to the same underlying generator. Locking serialises
/// concurrent users; the shuffle consumes sequential generator state, so two
/// callers interleaving on one handle would each see a different sequence.
#[derive(Clone, Debug)]
pub struct RngHandle {
    key: NamespaceKey,
    inner: Arc<Mutex<StreamRng>>,
}

impl RngHandle {
    fn new(key: NamespaceKey, seed: u32) -> Self {
        Self {
            key,
            inner: Arc::new(Mutex::new(StreamRng::from_seed(u64::from(seed)))),
        }
    }

    /// Returns the key this stream was derived for.
    pub fn key(&self) -> &NamespaceKey {
        &self.key
    }

    /// Returns the derived seed the stream was initialised with.
    pub fn seed(&self) -> u64 {
        self.lock().seed()
    }

    /// Locks the stream for exclusive use.
    ///
    /// A poisoned lock is recovered: the generator state is always valid.
    pub fn lock(&self) -> MutexGuard<'_, StreamRng> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles refer to the same generator.
    pub fn same_stream(&self, other: &RngHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Derives and caches one random stream per namespace key.
///
/// # Derivation
///
/// ```text
/// derived = be_u32(SHA-256(prefix_utf8? ++ be_u64(base_seed) ++ context)[0..4]) & 0x7FFF_FFFF
/// ```
///
/// where `context` is the UTF-8 of a name key or the big-endian bytes of an
/// id key. The fields are concatenated without delimiters, so distinct
/// `(prefix, base_seed, key)` triples can in principle share a preimage.
/// The layout is kept as is: changing it would change every derived seed.
///
/// # Examples
///
/// ```rust
/// use randomiser_core::rng::SeedManager;
///
/// let a = SeedManager::new(42, Some("run"));
/// let b = SeedManager::new(42, Some("run"));
///
/// // Independent managers agree on every key
/// assert_eq!(a.derive_seed(&"weapons".into()), b.derive_seed(&"weapons".into()));
///
/// // The same key always returns the same stream
/// let first = a.stream_by_key("weapons");
/// let again = a.stream_by_key("weapons");
/// assert!(first.same_stream(&again));
/// ```
#[derive(Debug)]
pub struct SeedManager {
    base_seed: u64,
    prefix: Option<String>,
    streams: Mutex<HashMap<NamespaceKey, RngHandle>>,
}

impl SeedManager {
    /// Creates a manager from a caller-supplied base seed.
    pub fn new(base_seed: u64, prefix: Option<&str>) -> Self {
        Self {
            base_seed,
            prefix: prefix.map(str::to_string),
            streams: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a manager whose base seed is drawn from the operating-system
    /// entropy source and masked non-negative.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::EntropyUnavailable` if the entropy source
    /// fails.
    pub fn from_entropy(prefix: Option<&str>) -> Result<Self> {
        let base_seed = generate_base_seed()?;
        tracing::debug!(prefix = ?prefix, "generated base seed from OS entropy");
        Ok(Self::new(base_seed, prefix))
    }

    /// Creates a manager from an optional base seed, generating one when absent.
    ///
    /// # Errors
    ///
    /// Propagates entropy failures from [`SeedManager::from_entropy`].
    pub fn from_optional_seed(base_seed: Option<u64>, prefix: Option<&str>) -> Result<Self> {
        match base_seed {
            Some(seed) => Ok(Self::new(seed, prefix)),
            None => Self::from_entropy(prefix),
        }
    }

    /// Returns the base seed; the single value needed to reproduce every stream.
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Returns the prefix mixed into every derived seed.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Computes the derived seed for a key without touching the cache.
    pub fn derive_seed(&self, key: &NamespaceKey) -> u32 {
        let mut hasher = Sha256::new();
        if let Some(prefix) = &self.prefix {
            hasher.update(prefix.as_bytes());
        }
        hasher.update(self.base_seed.to_be_bytes());
        hasher.update(key.context_bytes());
        let digest = hasher.finalize();

        let head = [digest[0], digest[1], digest[2], digest[3]];
        u32::from_be_bytes(head) & DERIVED_SEED_MASK
    }

    /// Returns the stream bound to `key`, creating it on first access.
    ///
    /// Get-or-create runs under the cache lock, so concurrent first access
    /// on one key yields a single stream.
    pub fn stream_for(&self, key: &NamespaceKey) -> RngHandle {
        let mut streams = self.streams.lock().unwrap_or_else(PoisonError::into_inner);
        streams
            .entry(key.clone())
            .or_insert_with(|| {
                let seed = self.derive_seed(key);
                tracing::debug!(key = %key, seed, "created namespaced stream");
                RngHandle::new(key.clone(), seed)
            })
            .clone()
    }

    /// Returns the stream bound to a string key.
    pub fn stream_by_key(&self, key: &str) -> RngHandle {
        self.stream_for(&NamespaceKey::from(key))
    }

    /// Returns the stream bound to an integer id.
    pub fn stream_by_id(&self, id: i32) -> RngHandle {
        self.stream_for(&NamespaceKey::Id(id))
    }

    /// Returns `true` if a stream has already been created for `key`.
    pub fn contains(&self, key: &NamespaceKey) -> bool {
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Returns the number of streams created so far.
    pub fn cached_streams(&self) -> usize {
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn generate_base_seed() -> Result<u64> {
    let mut bytes = [0u8; 8];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| ConfigurationError::EntropyUnavailable(e.to_string()))?;
    Ok(u64::from_be_bytes(bytes) & BASE_SEED_MASK)
}
