//! The R-tree itself.

use crate::config::IndexConfig;
use crate::error::{IndexError, IndexResult};
use crate::node::{Child, Entry, Node, cmp_cost, growth, str_pack};
use crate::query::Query;
use geostore_geometry::BoundingBox;
use geostore_types::EntityId;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Balanced R-tree over entity bounding boxes.
///
/// Each id has at most one leaf entry. A side table of `id -> box` lets
/// deletes descend only into subtrees whose box contains the entry, and
/// answers [`get`](Self::get) / [`contains`](Self::contains) without a walk.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    config: IndexConfig,
    root: Node,
    entries: HashMap<EntityId, BoundingBox>,
}

impl SpatialIndex {
    /// Creates an empty index with the default fanout.
    pub fn new() -> Self {
        Self {
            config: IndexConfig::default(),
            root: Node::empty_leaf(),
            entries: HashMap::new(),
        }
    }

    /// Creates an empty index with custom fanout bounds.
    pub fn with_config(config: IndexConfig) -> IndexResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            root: Node::empty_leaf(),
            entries: HashMap::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Adds a leaf entry for `id`.
    pub fn insert(&mut self, id: EntityId, bbox: BoundingBox) -> IndexResult<()> {
        if self.entries.contains_key(&id) {
            return Err(IndexError::AlreadyIndexed(id));
        }

        if let Some(sibling) = insert_into(&mut self.root, Entry { id, bbox }, &self.config) {
            let old_root = std::mem::replace(&mut self.root, Node::empty_leaf());
            let mut children = Vec::with_capacity(2);
            children.extend(Child::wrap(old_root));
            children.push(sibling);
            self.root = Node::Internal(children);
            debug!(height = self.height(), "index root split");
        }

        self.entries.insert(id, bbox);
        Ok(())
    }

    /// Removes the leaf entry for `id`, condensing under-full nodes on the
    /// way back up.
    pub fn delete(&mut self, id: EntityId) -> IndexResult<BoundingBox> {
        let bbox = self
            .entries
            .get(&id)
            .copied()
            .ok_or(IndexError::NotFound(id))?;

        if !remove_from(&mut self.root, id, &bbox, &self.config) {
            return Err(IndexError::Corrupt(format!(
                "entry for {id} is in the id table but not in the tree"
            )));
        }
        self.entries.remove(&id);

        loop {
            let collapsed = match &mut self.root {
                Node::Internal(children) if children.len() <= 1 => children
                    .pop()
                    .map_or_else(Node::empty_leaf, |child| child.node),
                _ => break,
            };
            self.root = collapsed;
            debug!(height = self.height(), "index root collapsed");
        }

        Ok(bbox)
    }

    /// Moves `id` to a new box.
    pub fn update(&mut self, id: EntityId, bbox: BoundingBox) -> IndexResult<()> {
        match self.entries.get(&id) {
            None => Err(IndexError::NotFound(id)),
            Some(current) if *current == bbox => Ok(()),
            Some(_) => {
                self.delete(id)?;
                self.insert(id, bbox)
            }
        }
    }

    /// Ids whose boxes intersect `bbox` (closed intervals, so touching
    /// counts).
    pub fn query(&self, bbox: &BoundingBox) -> Query<'_> {
        Query::new(&self.root, *bbox)
    }

    /// The box indexed for `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<BoundingBox> {
        self.entries.get(&id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of levels; an index holding only a leaf root has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Node::Internal(children) = node {
            match children.first() {
                Some(child) => {
                    node = &child.node;
                    height += 1;
                }
                None => break,
            }
        }
        height
    }

    /// Indexed ids in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.keys().copied()
    }

    /// Indexed `(id, box)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, BoundingBox)> + '_ {
        self.entries.iter().map(|(id, bbox)| (*id, *bbox))
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.root = Node::empty_leaf();
        self.entries.clear();
    }

    /// Replaces the whole tree with a bulk-loaded one built from `entries`.
    ///
    /// On a duplicate id the index is left untouched.
    pub fn rebuild<I>(&mut self, entries: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = (EntityId, BoundingBox)>,
    {
        let mut table = HashMap::new();
        let mut leaves = Vec::new();
        for (id, bbox) in entries {
            if table.insert(id, bbox).is_some() {
                return Err(IndexError::AlreadyIndexed(id));
            }
            leaves.push(Entry { id, bbox });
        }

        self.root = pack(leaves, &self.config);
        self.entries = table;
        debug!(
            entries = self.entries.len(),
            height = self.height(),
            "index rebuilt"
        );
        Ok(())
    }

    /// Walks the whole tree and checks every structural invariant.
    pub fn check_invariants(&self) -> IndexResult<()> {
        let mut walk = Walk {
            index: self,
            leaf_depth: None,
            seen: HashSet::with_capacity(self.entries.len()),
        };
        walk.node(&self.root, 1, true)?;

        if walk.seen.len() != self.entries.len() {
            return Err(IndexError::Corrupt(format!(
                "tree holds {} entries, id table holds {}",
                walk.seen.len(),
                self.entries.len()
            )));
        }
        Ok(())
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Inserts below `node`, returning the new sibling if `node` had to split.
fn insert_into(node: &mut Node, entry: Entry, config: &IndexConfig) -> Option<Child> {
    match node {
        Node::Leaf(entries) => entries.push(entry),
        Node::Internal(children) => {
            let idx = choose_subtree(children, &entry.bbox);
            let child = &mut children[idx];
            child.bbox.expand(&entry.bbox);
            if let Some(split) = insert_into(&mut child.node, entry, config) {
                child.refresh();
                children.push(split);
            }
        }
    }

    if node.len() > config.max_children {
        node.split(config.min_children)
    } else {
        None
    }
}

/// Child needing the least area enlargement; ties go to the smaller child,
/// then to the least margin growth.
fn choose_subtree(children: &[Child], bbox: &BoundingBox) -> usize {
    children
        .iter()
        .map(|child| {
            let (area_growth, margin_growth) = growth(&child.bbox, bbox);
            (area_growth, child.bbox.area(), margin_growth)
        })
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            cmp_cost((a.0, a.1), (b.0, b.1)).then(a.2.total_cmp(&b.2))
        })
        .map_or(0, |(idx, _)| idx)
}

/// Removes `id` below `node`. Returns whether it was found.
fn remove_from(node: &mut Node, id: EntityId, bbox: &BoundingBox, config: &IndexConfig) -> bool {
    match node {
        Node::Leaf(entries) => match entries.iter().position(|entry| entry.id == id) {
            Some(pos) => {
                entries.swap_remove(pos);
                true
            }
            None => false,
        },
        Node::Internal(children) => {
            for idx in 0..children.len() {
                if !children[idx].bbox.contains_box(bbox) {
                    continue;
                }
                if remove_from(&mut children[idx].node, id, bbox, config) {
                    condense(children, idx, config);
                    return true;
                }
            }
            false
        }
    }
}

/// Fixes up `children[idx]` after a removal below it: an emptied child is
/// dropped, an under-full one is merged into its least-enlarging sibling,
/// anything else just has its box shrunk.
fn condense(children: &mut Vec<Child>, idx: usize, config: &IndexConfig) {
    let len = children[idx].node.len();
    if len == 0 {
        children.swap_remove(idx);
        return;
    }
    if len >= config.min_children || children.len() == 1 {
        children[idx].refresh();
        return;
    }

    let under = children.swap_remove(idx);
    let target = choose_subtree(children, &under.bbox);
    let sibling = &mut children[target];
    sibling.bbox.expand(&under.bbox);
    if let Err(orphan) = sibling.node.absorb(under.node) {
        children.extend(Child::wrap(orphan));
        return;
    }

    if sibling.node.len() > config.max_children {
        if let Some(split) = sibling.node.split(config.min_children) {
            sibling.refresh();
            children.push(split);
        }
    }
}

/// Bottom-up STR bulk load.
fn pack(entries: Vec<Entry>, config: &IndexConfig) -> Node {
    let (max, min) = (config.max_children, config.min_children);
    if entries.len() <= max {
        return Node::Leaf(entries);
    }

    let mut level: Vec<Child> = str_pack(entries, max, min)
        .into_iter()
        .filter_map(|chunk| Child::wrap(Node::Leaf(chunk)))
        .collect();
    while level.len() > max {
        level = str_pack(level, max, min)
            .into_iter()
            .filter_map(|chunk| Child::wrap(Node::Internal(chunk)))
            .collect();
    }
    Node::Internal(level)
}

struct Walk<'a> {
    index: &'a SpatialIndex,
    leaf_depth: Option<usize>,
    seen: HashSet<EntityId>,
}

impl Walk<'_> {
    fn node(&mut self, node: &Node, depth: usize, is_root: bool) -> IndexResult<()> {
        let config = &self.index.config;
        let len = node.len();
        if len > config.max_children {
            return Err(corrupt(depth, format!("{len} items exceed max {}", config.max_children)));
        }
        if !is_root && len < config.min_children {
            return Err(corrupt(depth, format!("{len} items below min {}", config.min_children)));
        }

        match node {
            Node::Leaf(entries) => {
                match self.leaf_depth {
                    None => self.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(corrupt(depth, format!("leaf depth differs from {expected}")));
                    }
                    Some(_) => {}
                }
                for entry in entries {
                    if !self.seen.insert(entry.id) {
                        return Err(corrupt(depth, format!("{} appears twice", entry.id)));
                    }
                    if self.index.entries.get(&entry.id) != Some(&entry.bbox) {
                        return Err(corrupt(
                            depth,
                            format!("{} disagrees with the id table", entry.id),
                        ));
                    }
                }
            }
            Node::Internal(children) => {
                if is_root && children.len() < 2 {
                    return Err(corrupt(depth, "internal root with fewer than 2 children".into()));
                }
                for child in children {
                    let covered = child.node.covering().is_some_and(|inner| {
                        child.bbox.contains_box(&inner)
                    });
                    if !covered {
                        return Err(corrupt(depth, "child box does not cover its subtree".into()));
                    }
                    self.node(&child.node, depth + 1, false)?;
                }
            }
        }
        Ok(())
    }
}

fn corrupt(depth: usize, detail: String) -> IndexError {
    IndexError::Corrupt(format!("level {depth}: {detail}"))
}
