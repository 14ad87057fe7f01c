//! Keyed registry of randomisation groups sharing one seed manager.
//!
//! [`ReplacementRandomiser`] routes a [`NamespaceKey`] to its group and to
//! the random stream derived for the same key. Because every key owns an
//! independent stream, randomising one group never disturbs another and
//! bulk results do not depend on iteration order.

use std::collections::BTreeMap;

use rayon::prelude::*;

use randomiser_core::rng::{RngHandle, SeedManager};
use randomiser_core::types::{ConfigurationError, NamespaceKey, RandomiserError, Result};

use crate::config::RandomiserConfig;
use crate::group::{RandomisationGroup, DEFAULT_MAX_ATTEMPTS};
use crate::mapping::ReplacementMapping;

/// Results of a bulk randomisation, ordered by key.
pub type BulkMapping = BTreeMap<NamespaceKey, ReplacementMapping>;

/// Named randomisation groups over one shared [`SeedManager`].
///
/// # Examples
///
/// ```rust
/// use randomiser_engine::group::RandomisationGroup;
/// use randomiser_engine::registry::ReplacementRandomiser;
///
/// let mut randomiser = ReplacementRandomiser::with_seed(42, Some("demo"));
/// randomiser
///     .add_group("weapons", RandomisationGroup::new(vec![1, 2, 3], vec![10, 20, 30]).unwrap())
///     .unwrap();
///
/// let mapping = randomiser.randomise_group("weapons").unwrap();
/// assert_eq!(mapping.len(), 3);
///
/// // A second registry with the same seed and prefix reproduces the result
/// let mut again = ReplacementRandomiser::with_seed(42, Some("demo"));
/// again
///     .add_group("weapons", RandomisationGroup::new(vec![1, 2, 3], vec![10, 20, 30]).unwrap())
///     .unwrap();
/// assert_eq!(again.randomise_group("weapons").unwrap(), mapping);
/// ```
#[derive(Debug)]
pub struct ReplacementRandomiser {
    seeds: SeedManager,
    groups: BTreeMap<NamespaceKey, RandomisationGroup>,
    max_attempts: u32,
}

impl ReplacementRandomiser {
    /// Creates an empty registry over `seeds`.
    pub fn new(seeds: SeedManager) -> Self {
        Self {
            seeds,
            groups: BTreeMap::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Creates an empty registry from a base seed and optional prefix.
    pub fn with_seed(base_seed: u64, prefix: Option<&str>) -> Self {
        Self::new(SeedManager::new(base_seed, prefix))
    }

    /// Creates an empty registry from configuration.
    ///
    /// A missing base seed is generated from the OS entropy source.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::InvalidAttemptBudget` for a zero attempt budget
    /// - `ConfigurationError::EntropyUnavailable` if seed generation fails
    pub fn from_config(config: &RandomiserConfig) -> Result<Self> {
        let seeds = SeedManager::from_optional_seed(config.base_seed, config.prefix.as_deref())?;
        Self::new(seeds).with_max_attempts(config.max_attempts)
    }

    /// Sets the attempt budget used when callers pass `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidAttemptBudget` if `max_attempts` is zero.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ConfigurationError::InvalidAttemptBudget(max_attempts).into());
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    /// Returns the shared seed manager.
    pub fn seed_manager(&self) -> &SeedManager {
        &self.seeds
    }

    /// Returns the default attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Registers `group` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `RandomiserError::DuplicateKey` if the key is taken; the
    /// existing group is kept.
    pub fn add_group<K>(&mut self, key: K, group: RandomisationGroup) -> Result<()>
    where
        K: Into<NamespaceKey>,
    {
        let key = key.into();
        if self.groups.contains_key(&key) {
            return Err(RandomiserError::DuplicateKey(key));
        }
        tracing::debug!(
            key = %key,
            targets = group.targets().len(),
            replacements = group.replacements().len(),
            validated = group.has_validator(),
            "registered randomisation group"
        );
        self.groups.insert(key, group);
        Ok(())
    }

    /// Returns the group registered under `key`.
    pub fn group(&self, key: &NamespaceKey) -> Option<&RandomisationGroup> {
        self.groups.get(key)
    }

    /// Iterates registered keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &NamespaceKey> {
        self.groups.keys()
    }

    /// Returns the number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no groups are registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Unconstrained randomisation of one group.
    ///
    /// # Errors
    ///
    /// Returns `RandomiserError::UnrecognisedKey` if no group is registered.
    pub fn randomise_group<K>(&self, key: K) -> Result<ReplacementMapping>
    where
        K: Into<NamespaceKey>,
    {
        let (group, stream) = self.resolve(&key.into())?;
        let mut rng = stream.lock();
        group.randomise(&mut *rng)
    }

    /// Single-attempt validated randomisation of one group.
    ///
    /// # Errors
    ///
    /// `UnrecognisedKey`, plus every error of
    /// [`RandomisationGroup::validated_randomise`].
    pub fn validated_randomise_group<K>(&self, key: K) -> Result<ReplacementMapping>
    where
        K: Into<NamespaceKey>,
    {
        let (group, stream) = self.resolve(&key.into())?;
        let mut rng = stream.lock();
        group.validated_randomise(&mut *rng)
    }

    /// Retrying validated randomisation of one group.
    ///
    /// `None` uses the registry's default budget.
    ///
    /// # Errors
    ///
    /// `UnrecognisedKey`, plus every error of
    /// [`RandomisationGroup::retrying_validated_randomise`].
    pub fn retrying_randomise_group<K>(
        &self,
        key: K,
        max_attempts: Option<u32>,
    ) -> Result<ReplacementMapping>
    where
        K: Into<NamespaceKey>,
    {
        let (group, stream) = self.resolve(&key.into())?;
        let mut rng = stream.lock();
        group.retrying_validated_randomise(&mut *rng, max_attempts.unwrap_or(self.max_attempts))
    }

    /// Unconstrained randomisation of every registered group.
    ///
    /// # Errors
    ///
    /// Construction rules out group errors; none are expected in practice.
    pub fn randomise_all_groups(&self) -> Result<BulkMapping> {
        self.groups
            .iter()
            .map(|(key, group)| -> Result<(NamespaceKey, ReplacementMapping)> {
                let stream = self.seeds.stream_for(key);
                let mut rng = stream.lock();
                Ok((key.clone(), group.randomise(&mut *rng)?))
            })
            .collect()
    }

    /// Retrying validated randomisation of every registered group.
    ///
    /// Every group must carry a validator. Groups are visited in key order
    /// and the first failure aborts the whole call.
    ///
    /// # Errors
    ///
    /// The first error of [`RandomisationGroup::retrying_validated_randomise`].
    pub fn retrying_randomise_all_groups(&self, max_attempts: Option<u32>) -> Result<BulkMapping> {
        let max_attempts = max_attempts.unwrap_or(self.max_attempts);
        self.groups
            .iter()
            .map(|(key, group)| -> Result<(NamespaceKey, ReplacementMapping)> {
                let stream = self.seeds.stream_for(key);
                let mut rng = stream.lock();
                let mapping = group.retrying_validated_randomise(&mut *rng, max_attempts)?;
                Ok((key.clone(), mapping))
            })
            .collect()
    }

    /// [`randomise_all_groups`](Self::randomise_all_groups) fanned out with Rayon.
    ///
    /// Each group locks only its own stream, so the result is identical to
    /// the sequential variant.
    ///
    /// # Errors
    ///
    /// Same as [`randomise_all_groups`](Self::randomise_all_groups).
    pub fn par_randomise_all_groups(&self) -> Result<BulkMapping> {
        let streams: Vec<(&NamespaceKey, &RandomisationGroup, RngHandle)> = self
            .groups
            .iter()
            .map(|(key, group)| (key, group, self.seeds.stream_for(key)))
            .collect();

        streams
            .par_iter()
            .map(|(key, group, stream)| -> Result<(NamespaceKey, ReplacementMapping)> {
                let mut rng = stream.lock();
                Ok(((*key).clone(), group.randomise(&mut *rng)?))
            })
            .collect()
    }

    /// Looks up the group before touching the stream cache, so unknown keys
    /// never create streams.
    fn resolve(&self, key: &NamespaceKey) -> Result<(&RandomisationGroup, RngHandle)> {
        let group = self
            .groups
            .get(key)
            .ok_or_else(|| RandomiserError::UnrecognisedKey(key.clone()))?;
        Ok((group, self.seeds.stream_for(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{AcceptAll, RejectAll};

    fn sample_group() -> RandomisationGroup {
        RandomisationGroup::new(vec![1, 2, 3], vec![10, 20, 30]).unwrap()
    }

    fn validated_group() -> RandomisationGroup {
        RandomisationGroup::with_validator(vec![1, 2, 3, 4], vec![1, 2, 3, 4], |t: i64, r: i64| {
            t != r
        })
        .unwrap()
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut randomiser = ReplacementRandomiser::with_seed(1, None);
        randomiser.add_group("x", sample_group()).unwrap();

        let replacement = RandomisationGroup::new(vec![9], vec![99]).unwrap();
        assert_eq!(
            randomiser.add_group("x", replacement).unwrap_err(),
            RandomiserError::DuplicateKey("x".into())
        );
        // The original group survives
        assert_eq!(randomiser.group(&"x".into()).unwrap().targets(), &[1, 2, 3]);
        assert_eq!(randomiser.len(), 1);
    }

    #[test]
    fn test_unrecognised_key() {
        let randomiser = ReplacementRandomiser::with_seed(1, None);
        assert!(randomiser.is_empty());

        let expected = RandomiserError::UnrecognisedKey("y".into());
        assert_eq!(randomiser.randomise_group("y").unwrap_err(), expected);
        assert_eq!(randomiser.validated_randomise_group("y").unwrap_err(), expected);
        assert_eq!(
            randomiser.retrying_randomise_group("y", None).unwrap_err(),
            expected
        );
        assert_eq!(randomiser.seed_manager().cached_streams(), 0);
    }

    #[test]
    fn test_name_and_id_keys() {
        let mut randomiser = ReplacementRandomiser::with_seed(3, None);
        randomiser.add_group(7, sample_group()).unwrap();
        randomiser.add_group("7", sample_group()).unwrap();

        assert!(randomiser.randomise_group(7).is_ok());
        assert!(randomiser.randomise_group("7").is_ok());
        assert!(randomiser.randomise_group(8).is_err());
        assert_eq!(randomiser.keys().count(), 2);
    }

    #[test]
    fn test_group_stream_matches_seed_manager() {
        let mut randomiser = ReplacementRandomiser::with_seed(42, Some("p"));
        randomiser.add_group("g", sample_group()).unwrap();
        let mapping = randomiser.randomise_group("g").unwrap();

        let seeds = SeedManager::new(42, Some("p"));
        let stream = seeds.stream_by_key("g");
        let expected = sample_group().randomise(&mut *stream.lock()).unwrap();
        assert_eq!(mapping, expected);
    }

    #[test]
    fn test_validated_group_paths() {
        let mut randomiser = ReplacementRandomiser::with_seed(11, None);
        randomiser.add_group("plain", sample_group()).unwrap();
        randomiser.add_group("derange", validated_group()).unwrap();
        randomiser
            .add_group(
                "never",
                RandomisationGroup::with_validator(vec![1], vec![2], RejectAll).unwrap(),
            )
            .unwrap();

        assert!(randomiser
            .validated_randomise_group("plain")
            .unwrap_err()
            .is_configuration());

        let mapping = randomiser.retrying_randomise_group("derange", None).unwrap();
        assert!(mapping.iter().all(|(t, r)| t != r));

        let err = randomiser
            .retrying_randomise_group("never", Some(5))
            .unwrap_err();
        assert_eq!(err.attempts(), Some(5));

        let err = randomiser.retrying_randomise_group("never", None).unwrap_err();
        assert_eq!(err.attempts(), Some(DEFAULT_MAX_ATTEMPTS));
    }

    #[test]
    fn test_default_budget_is_configurable() {
        let mut randomiser = ReplacementRandomiser::with_seed(1, None)
            .with_max_attempts(3)
            .unwrap();
        randomiser
            .add_group(
                "never",
                RandomisationGroup::with_validator(vec![1], vec![2], RejectAll).unwrap(),
            )
            .unwrap();
        assert_eq!(randomiser.max_attempts(), 3);
        assert_eq!(
            randomiser
                .retrying_randomise_group("never", None)
                .unwrap_err()
                .attempts(),
            Some(3)
        );

        assert!(ReplacementRandomiser::with_seed(1, None)
            .with_max_attempts(0)
            .is_err());
    }

    /// Bulk results equal per-key results on a fresh registry.
    #[test]
    fn test_bulk_is_order_independent() {
        let build = || {
            let mut randomiser = ReplacementRandomiser::with_seed(77, Some("bulk"));
            randomiser.add_group("b", sample_group()).unwrap();
            randomiser.add_group("a", sample_group()).unwrap();
            randomiser.add_group(5, validated_group()).unwrap();
            randomiser
        };

        let bulk = build().randomise_all_groups().unwrap();
        assert_eq!(bulk.len(), 3);

        let single = build();
        assert_eq!(single.randomise_group(5).unwrap(), bulk[&NamespaceKey::Id(5)]);
        assert_eq!(single.randomise_group("a").unwrap(), bulk[&NamespaceKey::from("a")]);
        assert_eq!(single.randomise_group("b").unwrap(), bulk[&NamespaceKey::from("b")]);

        assert_eq!(build().par_randomise_all_groups().unwrap(), bulk);
    }

    #[test]
    fn test_retrying_bulk_requires_validators() {
        let mut randomiser = ReplacementRandomiser::with_seed(5, None);
        randomiser.add_group("derange", validated_group()).unwrap();
        randomiser
            .add_group(
                "open",
                RandomisationGroup::with_validator(vec![1, 2], vec![3], AcceptAll).unwrap(),
            )
            .unwrap();

        let bulk = randomiser.retrying_randomise_all_groups(None).unwrap();
        assert_eq!(bulk.len(), 2);
        assert!(bulk[&NamespaceKey::from("derange")].iter().all(|(t, r)| t != r));

        randomiser.add_group("plain", sample_group()).unwrap();
        assert!(randomiser
            .retrying_randomise_all_groups(Some(10))
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_from_config() {
        let config = RandomiserConfig {
            base_seed: Some(42),
            prefix: Some("cfg".to_string()),
            max_attempts: 7,
        };
        let randomiser = ReplacementRandomiser::from_config(&config).unwrap();
        assert_eq!(randomiser.seed_manager().base_seed(), 42);
        assert_eq!(randomiser.seed_manager().prefix(), Some("cfg"));
        assert_eq!(randomiser.max_attempts(), 7);

        let generated = ReplacementRandomiser::from_config(&RandomiserConfig::default()).unwrap();
        assert_eq!(generated.max_attempts(), DEFAULT_MAX_ATTEMPTS);

        let invalid = RandomiserConfig {
            max_attempts: 0,
            ..RandomiserConfig::default()
        };
        assert!(ReplacementRandomiser::from_config(&invalid).is_err());
    }
}
