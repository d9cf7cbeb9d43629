//! Fanout configuration.

use crate::error::{IndexError, IndexResult};

/// Node capacity bounds for the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// A node holding more items than this is split.
    pub max_children: usize,
    /// A non-root node holding fewer items than this is merged into a sibling.
    pub min_children: usize,
}

impl IndexConfig {
    /// Default split threshold.
    pub const DEFAULT_MAX_CHILDREN: usize = 8;
    /// Default merge threshold.
    pub const DEFAULT_MIN_CHILDREN: usize = 2;

    /// Creates a config and validates it.
    pub fn new(max_children: usize, min_children: usize) -> IndexResult<Self> {
        let config = Self {
            max_children,
            min_children,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks `max_children >= 4` and `1 <= min_children <= max_children / 2`.
    ///
    /// The upper bound on `min_children` is what lets a split of
    /// `max_children + 1` items leave both halves at least `min_children`
    /// full.
    pub fn validate(&self) -> IndexResult<()> {
        if self.max_children < 4 {
            return Err(IndexError::InvalidConfig(format!(
                "max_children must be at least 4, got {}",
                self.max_children
            )));
        }
        if self.min_children == 0 || self.min_children > self.max_children / 2 {
            return Err(IndexError::InvalidConfig(format!(
                "min_children must be in 1..={}, got {}",
                self.max_children / 2,
                self.min_children
            )));
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_children: Self::DEFAULT_MAX_CHILDREN,
            min_children: Self::DEFAULT_MIN_CHILDREN,
        }
    }
}
