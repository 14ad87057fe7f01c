//! Namespace keys selecting independent random streams.

use std::fmt;

/// Identifier of one logical randomisation stream.
///
/// A key is either a name or an integer id. The two forms never alias each
/// other in the stream cache, although their derived seeds are computed from
/// raw bytes (see [`SeedManager::derive_seed`](crate::rng::SeedManager::derive_seed)).
///
/// # Examples
///
/// ```
/// use randomiser_core::types::NamespaceKey;
///
/// let by_name: NamespaceKey = "enemies".into();
/// let by_id: NamespaceKey = 7.into();
///
/// assert_eq!(by_name.to_string(), "enemies");
/// assert_eq!(by_id.to_string(), "#7");
/// assert_ne!(by_name, by_id);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NamespaceKey {
    /// String key; its UTF-8 bytes form the derivation context.
    Name(String),
    /// Integer key; its big-endian bytes form the derivation context.
    Id(i32),
}

impl NamespaceKey {
    /// Returns the context bytes mixed into the derived seed.
    pub fn context_bytes(&self) -> Vec<u8> {
        match self {
            NamespaceKey::Name(name) => name.as_bytes().to_vec(),
            NamespaceKey::Id(id) => id.to_be_bytes().to_vec(),
        }
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceKey::Name(name) => write!(f, "{}", name),
            NamespaceKey::Id(id) => write!(f, "#{}", id),
        }
    }
}

impl From<&str> for NamespaceKey {
    fn from(name: &str) -> Self {
        NamespaceKey::Name(name.to_string())
    }
}

impl From<String> for NamespaceKey {
    fn from(name: String) -> Self {
        NamespaceKey::Name(name)
    }
}

impl From<&String> for NamespaceKey {
    fn from(name: &String) -> Self {
        NamespaceKey::Name(name.clone())
    }
}

impl From<i32> for NamespaceKey {
    fn from(id: i32) -> Self {
        NamespaceKey::Id(id)
    }
}
