//! Lazy range query over the tree.

use crate::node::{Entry, Node};
use geostore_geometry::BoundingBox;
use geostore_types::EntityId;
use std::slice;

/// Iterator over the ids whose boxes intersect a target box.
///
/// Subtrees whose covering box misses the target are never visited. The
/// iterator borrows the index, so it cannot outlive a mutation; cloning it
/// yields an independent cursor at the same position.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    target: BoundingBox,
    pending: Vec<&'a Node>,
    leaf: slice::Iter<'a, Entry>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(root: &'a Node, target: BoundingBox) -> Self {
        Self {
            target,
            pending: vec![root],
            leaf: [].iter(),
        }
    }

    /// The box this query matches against.
    #[must_use]
    pub const fn target(&self) -> &BoundingBox {
        &self.target
    }
}

impl Iterator for Query<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for entry in self.leaf.by_ref() {
                if entry.bbox.intersects(&self.target) {
                    return Some(entry.id);
                }
            }

            match self.pending.pop()? {
                Node::Leaf(entries) => self.leaf = entries.iter(),
                Node::Internal(children) => {
                    let target = self.target;
                    self.pending.extend(
                        children
                            .iter()
                            .filter(|child| child.bbox.intersects(&target))
                            .map(|child| &child.node),
                    );
                }
            }
        }
    }
}
