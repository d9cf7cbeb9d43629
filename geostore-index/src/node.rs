//! Tree nodes, node splitting and bulk packing.
//!
//! A node's own box is stored on the parent's [`Child`] record, so the root's
//! box is never materialized and an empty leaf needs no placeholder box.

use geostore_geometry::BoundingBox;
use geostore_types::EntityId;
use std::cmp::Ordering;

/// Leaf item: one indexed id.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub(crate) id: EntityId,
    pub(crate) bbox: BoundingBox,
}

/// Internal item: a subtree and the box covering it.
#[derive(Debug, Clone)]
pub(crate) struct Child {
    pub(crate) bbox: BoundingBox,
    pub(crate) node: Node,
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Leaf(Vec<Entry>),
    Internal(Vec<Child>),
}

/// Anything that occupies a box in the tree.
pub(crate) trait Bounded {
    fn bbox(&self) -> BoundingBox;
}

impl Bounded for Entry {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

impl Bounded for Child {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

impl Child {
    /// Wraps a non-empty node, computing its covering box.
    pub(crate) fn wrap(node: Node) -> Option<Self> {
        node.covering().map(|bbox| Self { bbox, node })
    }

    /// Recomputes the stored box after the subtree changed.
    pub(crate) fn refresh(&mut self) {
        if let Some(bbox) = self.node.covering() {
            self.bbox = bbox;
        }
    }
}

impl Node {
    pub(crate) fn empty_leaf() -> Self {
        Node::Leaf(Vec::new())
    }

    /// Number of direct items (entries or children).
    pub(crate) fn len(&self) -> usize {
        match self {
            Node::Leaf(entries) => entries.len(),
            Node::Internal(children) => children.len(),
        }
    }

    /// Box covering every direct item, `None` when empty.
    pub(crate) fn covering(&self) -> Option<BoundingBox> {
        match self {
            Node::Leaf(entries) => cover(entries),
            Node::Internal(children) => cover(children),
        }
    }

    /// Moves all items of a same-level node into this one.
    ///
    /// Returns the other node back when the levels differ, which cannot
    /// happen while every leaf sits at the same depth.
    pub(crate) fn absorb(&mut self, other: Node) -> Result<(), Node> {
        match (self, other) {
            (Node::Leaf(mine), Node::Leaf(theirs)) => {
                mine.extend(theirs);
                Ok(())
            }
            (Node::Internal(mine), Node::Internal(theirs)) => {
                mine.extend(theirs);
                Ok(())
            }
            (_, other) => Err(other),
        }
    }

    /// Splits an overflowing node in place, returning the second half.
    pub(crate) fn split(&mut self, min: usize) -> Option<Child> {
        let sibling = match self {
            Node::Leaf(entries) => {
                let (keep, moved) = quadratic_split(std::mem::take(entries), min);
                *entries = keep;
                Node::Leaf(moved)
            }
            Node::Internal(children) => {
                let (keep, moved) = quadratic_split(std::mem::take(children), min);
                *children = keep;
                Node::Internal(moved)
            }
        };
        Child::wrap(sibling)
    }
}

/// Box covering a slice of items.
pub(crate) fn cover<T: Bounded>(items: &[T]) -> Option<BoundingBox> {
    let (first, rest) = items.split_first()?;
    let mut bbox = first.bbox();
    for item in rest {
        bbox.expand(&item.bbox());
    }
    Some(bbox)
}

/// Cost of growing `base` to also cover `extra`: area growth first, then
/// margin growth so that zero-area boxes (points, lines) still compare.
pub(crate) fn growth(base: &BoundingBox, extra: &BoundingBox) -> (f64, f64) {
    let merged = base.union(extra);
    (merged.area() - base.area(), merged.margin() - base.margin())
}

pub(crate) fn cmp_cost(a: (f64, f64), b: (f64, f64)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1))
}

/// Guttman's quadratic split.
///
/// Seeds are the pair wasting the most space when grouped together; the
/// remaining items go, most decisive first, to the group that grows least.
/// Both groups end up with at least `min` items as long as
/// `items.len() >= 2 * min`.
pub(crate) fn quadratic_split<T: Bounded>(mut items: Vec<T>, min: usize) -> (Vec<T>, Vec<T>) {
    let (s1, s2) = pick_seeds(&items);
    // Remove the higher index first so the lower one stays valid.
    let seed_b = items.swap_remove(s2.max(s1));
    let seed_a = items.swap_remove(s2.min(s1));

    let mut box_a = seed_a.bbox();
    let mut box_b = seed_b.bbox();
    let mut group_a = vec![seed_a];
    let mut group_b = vec![seed_b];

    while !items.is_empty() {
        if group_a.len() + items.len() <= min {
            group_a.append(&mut items);
            break;
        }
        if group_b.len() + items.len() <= min {
            group_b.append(&mut items);
            break;
        }

        let (next, cost_a, cost_b) = pick_next(&items, &box_a, &box_b);
        let item = items.swap_remove(next);
        let to_a = match cmp_cost(cost_a, cost_b) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => match box_a.area().total_cmp(&box_b.area()) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => group_a.len() <= group_b.len(),
            },
        };
        if to_a {
            box_a.expand(&item.bbox());
            group_a.push(item);
        } else {
            box_b.expand(&item.bbox());
            group_b.push(item);
        }
    }

    (group_a, group_b)
}

fn pick_seeds<T: Bounded>(items: &[T]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut worst_waste = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let a = items[i].bbox();
            let b = items[j].bbox();
            let merged = a.union(&b);
            let waste = (
                merged.area() - a.area() - b.area(),
                merged.margin() - a.margin() - b.margin(),
            );
            if cmp_cost(waste, worst_waste) == Ordering::Greater {
                worst_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

fn pick_next<T: Bounded>(
    items: &[T],
    box_a: &BoundingBox,
    box_b: &BoundingBox,
) -> (usize, (f64, f64), (f64, f64)) {
    let mut best = 0;
    let mut best_pref = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut best_costs = ((0.0, 0.0), (0.0, 0.0));
    for (i, item) in items.iter().enumerate() {
        let cost_a = growth(box_a, &item.bbox());
        let cost_b = growth(box_b, &item.bbox());
        let pref = ((cost_a.0 - cost_b.0).abs(), (cost_a.1 - cost_b.1).abs());
        if cmp_cost(pref, best_pref) == Ordering::Greater {
            best_pref = pref;
            best = i;
            best_costs = (cost_a, cost_b);
        }
    }
    (best, best_costs.0, best_costs.1)
}

/// Sort-Tile-Recursive ordering followed by chunking into groups of at most
/// `max` items; the last group borrows from its predecessor so no group drops
/// below `min` (unless there is only one group).
pub(crate) fn str_pack<T: Bounded>(mut items: Vec<T>, max: usize, min: usize) -> Vec<Vec<T>> {
    let center_lon = |t: &T| t.bbox().center().0;
    let center_lat = |t: &T| t.bbox().center().1;

    items.sort_by(|a, b| center_lon(a).total_cmp(&center_lon(b)));
    let groups = items.len().div_ceil(max).max(1);
    let slices = (groups as f64).sqrt().ceil() as usize;
    let slice_len = (slices * max).max(1);

    let mut ordered = Vec::with_capacity(items.len());
    let mut rest = items;
    while !rest.is_empty() {
        let tail = rest.split_off(slice_len.min(rest.len()));
        let mut slice = rest;
        slice.sort_by(|a, b| center_lat(a).total_cmp(&center_lat(b)));
        ordered.extend(slice);
        rest = tail;
    }

    let mut chunks: Vec<Vec<T>> = Vec::with_capacity(groups);
    let mut rest = ordered;
    while !rest.is_empty() {
        let tail = rest.split_off(max.min(rest.len()));
        chunks.push(rest);
        rest = tail;
    }

    let n = chunks.len();
    if n > 1 && chunks[n - 1].len() < min {
        let need = min - chunks[n - 1].len();
        let prev = &mut chunks[n - 2];
        let mut borrowed = prev.split_off(prev.len() - need);
        borrowed.append(&mut chunks[n - 1]);
        chunks[n - 1] = borrowed;
    }
    chunks
}
