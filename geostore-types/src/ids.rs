//! Identifier types used throughout the GeoStore core.
//!
//! Entity ids are plain integers handed out by an [`IdSequence`]. They
//! increase monotonically and are never reused within a process lifetime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an entity in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw integer id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parses an entity id from its decimal form.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Monotonic source of entity ids.
///
/// The first id issued is `1`. Ids are never handed out twice, even after the
/// entity that held one is deleted.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Creates a sequence whose first id is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Issues the next id.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) will issue.
    #[must_use]
    pub const fn peek(&self) -> EntityId {
        EntityId(self.next)
    }

    /// Returns the most recently issued id, if any.
    #[must_use]
    pub const fn last_issued(&self) -> Option<EntityId> {
        if self.next > 1 {
            Some(EntityId(self.next - 1))
        } else {
            None
        }
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
