use crate::attributes::{Attributes, DESCRIPTION_KEY, NAME_KEY};
use crate::patch::EntityPatch;
use geostore_geometry::{BoundingBox, Geometry, GeometryKind};
use geostore_types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// A stored geometry with its attributes.
///
/// Entities are owned by the store; callers receive clones. `updated_at`
/// never moves backwards and strictly increases on every applied patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub geometry: Geometry,
    #[serde(default)]
    pub attributes: Attributes,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity {
    /// Creates an entity whose timestamps both read `now`.
    pub fn new(id: EntityId, geometry: Geometry, attributes: Attributes, now: Timestamp) -> Self {
        Self {
            id,
            geometry,
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.geometry.bounding_box()
    }

    /// Look up a single attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.attribute(NAME_KEY)
    }

    pub fn description(&self) -> Option<&str> {
        self.attribute(DESCRIPTION_KEY)
    }

    /// Applies a patch and advances `updated_at`.
    ///
    /// Fields the patch leaves as `None` are untouched. The geometry is
    /// taken as-is; it was validated when it was constructed.
    pub fn apply(&mut self, patch: EntityPatch) {
        if let Some(geometry) = patch.geometry {
            self.geometry = geometry;
        }
        if let Some(update) = patch.attributes {
            update.apply_to(&mut self.attributes);
        }
        self.updated_at = self.updated_at.tick();
    }
}
