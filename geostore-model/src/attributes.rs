use geostore_geometry::GeometryKind;
use std::collections::BTreeMap;

/// Free-form string attributes, sorted by key.
pub type Attributes = BTreeMap<String, String>;

/// Attribute holding the display name.
pub const NAME_KEY: &str = "name";

/// Attribute holding the free-text description.
pub const DESCRIPTION_KEY: &str = "description";

/// Name given to entities created without one.
pub fn default_name(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Point => "Unnamed Point",
        GeometryKind::Polygon => "Unnamed Polygon",
    }
}

/// Inserts the default `name` and an empty `description` where missing.
pub fn fill_defaults(attributes: &mut Attributes, kind: GeometryKind) {
    attributes
        .entry(NAME_KEY.to_string())
        .or_insert_with(|| default_name(kind).to_string());
    attributes.entry(DESCRIPTION_KEY.to_string()).or_default();
}
