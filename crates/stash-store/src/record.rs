use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Tag naming the concrete kind of a record.
///
/// A store is configured for exactly one variant and refuses records of any
/// other. Tags are persisted next to every record, so they must stay stable
/// across releases.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(Cow<'static, str>);

impl Variant {
    /// Longest tag the framed codecs can carry.
    pub const MAX_LEN: usize = u8::MAX as usize;

    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self(tag.into())
    }

    /// Build a tag from a string literal, usable in `const` items.
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Variant {
    fn from(tag: &'static str) -> Self {
        Self::from_static(tag)
    }
}

impl From<String> for Variant {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

/// A keyed, serializable value managed by an [`ObjectStore`](crate::ObjectStore).
///
/// Implementations must satisfy:
/// - `deep_copy()` shares no mutable state with `self`.
/// - `deep_copy().primary_id() == self.primary_id()`.
/// - `deep_copy().variant() == self.variant()`. The store checks this on
///   every copy and reports [`StoreError::Integrity`](crate::StoreError::Integrity)
///   otherwise.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Primary identifier type.
    type Id: Eq + Hash + Clone + fmt::Debug;

    /// The identifier this record is stored under.
    fn primary_id(&self) -> Self::Id;

    /// The concrete kind of this record.
    fn variant(&self) -> Variant;

    /// A fully independent duplicate of this record.
    ///
    /// The default relies on `Clone`, which is a deep copy for any type that
    /// does not hold shared pointers (`Rc`, `Arc`, ...). Types that do must
    /// override this.
    fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Reject records that must not enter a store, e.g. ones lacking a
    /// meaningful identifier.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
