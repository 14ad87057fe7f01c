//! Randomisation results.

use std::collections::HashMap;

use randomiser_core::types::{ReplacementId, TargetId};

/// Assignment of one replacement to every target of a group.
///
/// Stored in target order, so the result doubles as the M:N array form:
/// `replacements()[i]` is the replacement for `targets()[i]`. Replacements
/// repeat when the pool is smaller than the target list.
///
/// # Examples
///
/// ```rust
/// use randomiser_core::rng::StreamRng;
/// use randomiser_engine::group::RandomisationGroup;
///
/// let group = RandomisationGroup::new(vec![1, 2, 3], vec![10, 20, 30]).unwrap();
/// let mapping = group.randomise(&mut StreamRng::from_seed(42)).unwrap();
///
/// assert_eq!(mapping.len(), 3);
/// let replacement = mapping.get(2).unwrap();
/// assert!([10, 20, 30].contains(&replacement));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplacementMapping {
    targets: Vec<TargetId>,
    replacements: Vec<ReplacementId>,
}

impl ReplacementMapping {
    pub(crate) fn new(targets: Vec<TargetId>, replacements: Vec<ReplacementId>) -> Self {
        debug_assert_eq!(targets.len(), replacements.len());
        Self {
            targets,
            replacements,
        }
    }

    /// Returns the replacement assigned to `target`.
    pub fn get(&self, target: TargetId) -> Option<ReplacementId> {
        self.targets
            .iter()
            .position(|&t| t == target)
            .map(|i| self.replacements[i])
    }

    /// Returns the targets in group order.
    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// Returns the replacements in target order (the M:N array form).
    pub fn replacements(&self) -> &[ReplacementId] {
        &self.replacements
    }

    /// Iterates `(target, replacement)` pairs in target order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, ReplacementId)> + '_ {
        self.targets
            .iter()
            .copied()
            .zip(self.replacements.iter().copied())
    }

    /// Returns the number of assigned targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if no targets are assigned.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Counts how many targets each replacement was assigned to.
    pub fn usage_counts(&self) -> HashMap<ReplacementId, usize> {
        let mut counts = HashMap::new();
        for &replacement in &self.replacements {
            *counts.entry(replacement).or_insert(0) += 1;
        }
        counts
    }

    /// Converts into a keyed map.
    pub fn into_map(self) -> HashMap<TargetId, ReplacementId> {
        self.targets.into_iter().zip(self.replacements).collect()
    }
}

impl IntoIterator for ReplacementMapping {
    type Item = (TargetId, ReplacementId);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<TargetId>, std::vec::IntoIter<ReplacementId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.into_iter().zip(self.replacements)
    }
}
