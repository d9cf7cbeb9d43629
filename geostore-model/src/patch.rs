use crate::attributes::Attributes;
use geostore_geometry::Geometry;
use serde::{Deserialize, Serialize};

/// How a patch changes the attribute bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "snake_case")]
pub enum AttributeUpdate {
    /// Drop every existing attribute and use these instead.
    Replace(Attributes),
    /// Overwrite the given keys, keep the rest.
    Merge(Attributes),
}

impl AttributeUpdate {
    pub fn apply_to(self, attributes: &mut Attributes) {
        match self {
            AttributeUpdate::Replace(values) => *attributes = values,
            AttributeUpdate::Merge(values) => attributes.extend(values),
        }
    }
}

/// A partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityPatch {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub attributes: Option<AttributeUpdate>,
}

impl EntityPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: impl Into<Geometry>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    #[must_use]
    pub fn replace_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(AttributeUpdate::Replace(attributes));
        self
    }

    #[must_use]
    pub fn merge_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(AttributeUpdate::Merge(attributes));
        self
    }

    /// True when applying the patch would only refresh `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.geometry.is_none() && self.attributes.is_none()
    }
}
