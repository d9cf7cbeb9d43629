//! The entity store.

use crate::config::StoreConfig;
use crate::error::{StorageError, StorageResult};
use geostore_geometry::{BoundingBox, Geometry, GeometryKind};
use geostore_index::{IndexError, SpatialIndex};
use geostore_model::{Attributes, Entity, EntityPatch};
use geostore_types::{EntityId, IdSequence, Timestamp};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Everything the lock guards. The map is the source of truth; the index is
/// derived from it.
#[derive(Debug)]
struct State {
    entities: BTreeMap<EntityId, Entity>,
    index: SpatialIndex,
    ids: IdSequence,
}

impl State {
    /// Rebuilds the index from the entity map.
    fn rebuild_index(&mut self) -> StorageResult<()> {
        let entries = self
            .entities
            .values()
            .map(|entity| (entity.id, entity.bounding_box()));
        self.index.rebuild(entries)?;
        info!(entities = self.entities.len(), "spatial index rebuilt");
        Ok(())
    }

    /// Map and index hold the same ids with the same boxes, and the tree is
    /// well formed.
    fn is_consistent(&self) -> bool {
        self.index.len() == self.entities.len()
            && self
                .entities
                .values()
                .all(|entity| self.index.get(entity.id) == Some(entity.bounding_box()))
            && self.index.check_invariants().is_ok()
    }

    fn insert_new(&mut self, geometry: Geometry, attributes: Attributes) -> StorageResult<EntityId> {
        let id = self.ids.next_id();
        let kind = geometry.kind();
        let entity = Entity::new(id, geometry, attributes, Timestamp::now());

        if let Err(err) = self.index.insert(id, entity.bounding_box()) {
            warn!(%id, error = %err, "index rejected a fresh id, rebuilding");
            self.rebuild_index()?;
            self.index.insert(id, entity.bounding_box())?;
        }
        self.entities.insert(id, entity);
        debug!(%id, %kind, "entity created");
        Ok(id)
    }
}

/// Thread-safe store of entities and their spatial index.
///
/// Reads (`get`, `list`, [`read`](Self::read)) share the lock; mutations take
/// it exclusively. Ids start at 1 and are never reused, even after deletes.
#[derive(Debug)]
pub struct SpatialStore {
    config: StoreConfig,
    state: RwLock<State>,
    /// Set by readers that saw an index hit with no entity behind it.
    needs_repair: AtomicBool,
}

impl SpatialStore {
    /// Creates an empty store with the default index fanout.
    pub fn new() -> Self {
        Self::from_parts(StoreConfig::default(), SpatialIndex::new())
    }

    /// Creates an empty store with a custom configuration.
    pub fn with_config(config: StoreConfig) -> StorageResult<Self> {
        config.validate()?;
        let index = SpatialIndex::with_config(config.index)?;
        Ok(Self::from_parts(config, index))
    }

    fn from_parts(config: StoreConfig, index: SpatialIndex) -> Self {
        Self {
            config,
            state: RwLock::new(State {
                entities: BTreeMap::new(),
                index,
                ids: IdSequence::new(),
            }),
            needs_repair: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Stores a new entity and returns its id.
    pub fn create(
        &self,
        geometry: impl Into<Geometry>,
        attributes: Attributes,
    ) -> StorageResult<EntityId> {
        let geometry = geometry.into();
        self.write_state().insert_new(geometry, attributes)
    }

    /// Stores several entities under one lock acquisition.
    ///
    /// Either every item is stored or none is. Returned ids follow the input
    /// order.
    pub fn create_batch<I>(&self, items: I) -> StorageResult<Vec<EntityId>>
    where
        I: IntoIterator<Item = (Geometry, Attributes)>,
    {
        let items: Vec<_> = items.into_iter().collect();
        let mut state = self.write_state();
        let mut created = Vec::with_capacity(items.len());
        for (geometry, attributes) in items {
            match state.insert_new(geometry, attributes) {
                Ok(id) => created.push(id),
                Err(err) => {
                    for id in &created {
                        state.entities.remove(id);
                    }
                    state.rebuild_index()?;
                    return Err(err);
                }
            }
        }
        debug!(count = created.len(), "batch created");
        Ok(created)
    }

    /// Returns a copy of the entity.
    pub fn get(&self, id: EntityId) -> StorageResult<Entity> {
        self.read_state()
            .entities
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    /// Applies a partial update and returns the updated entity.
    ///
    /// A new geometry moves the index entry before the map changes, so a
    /// failure leaves the entity untouched.
    pub fn update(&self, id: EntityId, patch: EntityPatch) -> StorageResult<Entity> {
        let mut state = self.write_state();
        if !state.entities.contains_key(&id) {
            return Err(StorageError::NotFound(id));
        }

        if let Some(geometry) = &patch.geometry {
            let bbox = geometry.bounding_box();
            if let Err(err) = state.index.update(id, bbox) {
                warn!(%id, error = %err, "index out of step on update, rebuilding");
                state.rebuild_index()?;
                state.index.update(id, bbox)?;
            }
        }

        let entity = state
            .entities
            .get_mut(&id)
            .ok_or(StorageError::NotFound(id))?;
        entity.apply(patch);
        debug!(%id, kind = %entity.kind(), "entity updated");
        Ok(entity.clone())
    }

    /// Removes an entity and returns it.
    pub fn delete(&self, id: EntityId) -> StorageResult<Entity> {
        let mut state = self.write_state();
        let entity = state
            .entities
            .remove(&id)
            .ok_or(StorageError::NotFound(id))?;

        match state.index.delete(id) {
            Ok(_) => {}
            Err(IndexError::NotFound(_)) | Err(IndexError::Corrupt(_)) => {
                warn!(%id, "index out of step on delete, rebuilding");
                state.rebuild_index()?;
            }
            Err(err) => return Err(err.into()),
        }
        debug!(%id, kind = %entity.kind(), "entity deleted");
        Ok(entity)
    }

    // ── Reads ────────────────────────────────────────────────────

    /// All entities, optionally of one kind, ordered by ascending id.
    pub fn list(&self, kind: Option<GeometryKind>) -> Vec<Entity> {
        self.read_state()
            .entities
            .values()
            .filter(|entity| kind.is_none_or(|k| entity.kind() == k))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_state().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().entities.is_empty()
    }

    /// Number of entities of one kind.
    pub fn count(&self, kind: GeometryKind) -> usize {
        self.read_state()
            .entities
            .values()
            .filter(|entity| entity.kind() == kind)
            .count()
    }

    /// Takes the shared lock and returns a view for running queries.
    ///
    /// Writers block until the view is dropped.
    pub fn read(&self) -> StoreView<'_> {
        StoreView {
            state: self.read_state(),
            needs_repair: &self.needs_repair,
        }
    }

    // ── Consistency ──────────────────────────────────────────────

    /// Compares the index with the entity map and rebuilds it on any
    /// disagreement. Returns whether a rebuild happened.
    pub fn verify_consistency(&self) -> StorageResult<bool> {
        let mut state = self.write_state();
        self.needs_repair.store(false, Ordering::Release);
        if state.is_consistent() {
            return Ok(false);
        }
        warn!(
            entities = state.entities.len(),
            indexed = state.index.len(),
            "index disagrees with entity map"
        );
        state.rebuild_index()?;
        Ok(true)
    }

    /// Rebuilds the index if a reader flagged an inconsistency since the last
    /// check. Must not be called while a [`StoreView`] from this store is
    /// alive on the same thread.
    pub fn repair_if_needed(&self) -> StorageResult<bool> {
        if !self.needs_repair.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }
        self.write_state().rebuild_index()?;
        Ok(true)
    }
}

impl Default for SpatialStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared-lock view of the store.
///
/// Holds the read guard for its whole lifetime, so everything read through
/// one view reflects the same state.
pub struct StoreView<'a> {
    state: RwLockReadGuard<'a, State>,
    needs_repair: &'a AtomicBool,
}

impl StoreView<'_> {
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.state.entities.get(&id)
    }

    pub fn len(&self) -> usize {
        self.state.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entities.is_empty()
    }

    /// Entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.state.entities.values()
    }

    /// Entities whose bounding boxes intersect `bbox`, optionally of one
    /// kind, in no particular order.
    ///
    /// An index hit with no entity behind it is skipped and flags the store
    /// for repair; see [`SpatialStore::repair_if_needed`].
    pub fn candidates<'v>(
        &'v self,
        bbox: &BoundingBox,
        kind: Option<GeometryKind>,
    ) -> impl Iterator<Item = &'v Entity> + 'v {
        let needs_repair = self.needs_repair;
        self.state
            .index
            .query(bbox)
            .filter_map(move |id| match self.state.entities.get(&id) {
                Some(entity) => Some(entity),
                None => {
                    warn!(%id, "index returned an id with no entity");
                    needs_repair.store(true, Ordering::Release);
                    None
                }
            })
            .filter(move |entity| kind.is_none_or(|k| entity.kind() == k))
    }

    /// Whether a reader has flagged the index for repair.
    pub fn needs_repair(&self) -> bool {
        self.needs_repair.load(Ordering::Acquire)
    }
}
