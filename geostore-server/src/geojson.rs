//! GeoJSON interchange.
//!
//! Decoding is strict about shape (`FeatureCollection` of `Feature`s whose
//! geometry type matches the route) and defers coordinate validation to
//! [`Point::new`] and [`Polygon::new`]. Coordinates are `[lon, lat]`; a third
//! (altitude) value is accepted and dropped. Only a polygon's exterior ring is
//! stored, so interior rings are rejected.

use crate::error::{ApiError, ApiResult};
use geostore_geometry::{Geometry, GeometryKind, Point, Polygon};
use geostore_model::{Attributes, Entity};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Properties the server owns; client-supplied values for them are ignored.
const RESERVED_PROPERTIES: [&str; 3] = ["id", "created_at", "updated_at"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: GeoJsonGeometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Raw GeoJSON geometry; `coordinates` is decoded according to `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Decodes every feature, failing on the first bad one.
    pub fn decode(self, expected: GeometryKind) -> ApiResult<Vec<(Geometry, Attributes)>> {
        if self.kind != "FeatureCollection" {
            return Err(ApiError::bad_request(
                "Invalid GeoJSON format. Must be a FeatureCollection.",
            ));
        }
        self.features
            .into_iter()
            .map(|feature| feature.decode(expected))
            .collect()
    }
}

impl Feature {
    /// Checks the feature shape and converts geometry and properties.
    pub fn decode(self, expected: GeometryKind) -> ApiResult<(Geometry, Attributes)> {
        if self.kind != "Feature" || self.geometry.kind != geojson_type(expected) {
            return Err(ApiError::bad_request(format!(
                "Invalid feature format. Must be {} type.",
                geojson_type(expected)
            )));
        }
        let geometry = self.geometry.decode(expected)?;
        Ok((geometry, properties_to_attributes(self.properties)))
    }

    /// Encodes a stored entity.
    pub fn from_entity(entity: &Entity) -> Self {
        let mut properties = Map::new();
        properties.insert("id".to_string(), json!(entity.id.as_u64()));
        for (key, value) in &entity.attributes {
            properties.insert(key.clone(), Value::String(value.clone()));
        }
        properties.insert("created_at".to_string(), json!(entity.created_at.to_rfc3339()));
        properties.insert("updated_at".to_string(), json!(entity.updated_at.to_rfc3339()));

        Self {
            kind: "Feature".to_string(),
            geometry: GeoJsonGeometry::from_geometry(&entity.geometry),
            properties,
        }
    }
}

impl GeoJsonGeometry {
    pub fn decode(&self, expected: GeometryKind) -> ApiResult<Geometry> {
        match expected {
            GeometryKind::Point => {
                let position: Vec<f64> = parse_coordinates(&self.coordinates)?;
                let [lon, lat] = lon_lat(&position)?;
                Ok(Point::new(lon, lat)?.into())
            }
            GeometryKind::Polygon => {
                let rings: Vec<Vec<Vec<f64>>> = parse_coordinates(&self.coordinates)?;
                let exterior = match rings.as_slice() {
                    [exterior] => exterior,
                    [] => return Err(ApiError::bad_request("Polygon has no rings.")),
                    _ => {
                        return Err(ApiError::bad_request(
                            "Polygons with interior rings are not supported.",
                        ));
                    }
                };
                let coords = exterior
                    .iter()
                    .map(|position| lon_lat(position))
                    .collect::<ApiResult<Vec<_>>>()?;
                Ok(Polygon::from_coords(&coords)?.into())
            }
        }
    }

    pub fn from_geometry(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(point) => Self {
                kind: geojson_type(GeometryKind::Point).to_string(),
                coordinates: json!(point.to_array()),
            },
            Geometry::Polygon(polygon) => {
                let ring: Vec<[f64; 2]> = polygon.ring().iter().map(Point::to_array).collect();
                Self {
                    kind: geojson_type(GeometryKind::Polygon).to_string(),
                    coordinates: json!([ring]),
                }
            }
        }
    }
}

/// GeoJSON `type` name for a geometry kind.
pub fn geojson_type(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Point => "Point",
        GeometryKind::Polygon => "Polygon",
    }
}

/// Converts feature properties to string attributes. Strings pass through,
/// other values are stored as their JSON text, nulls are dropped.
pub fn properties_to_attributes(properties: Map<String, Value>) -> Attributes {
    properties
        .into_iter()
        .filter(|(key, _)| !RESERVED_PROPERTIES.contains(&key.as_str()))
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}

fn parse_coordinates<T: serde::de::DeserializeOwned>(value: &Value) -> ApiResult<T> {
    T::deserialize(value).map_err(|e| ApiError::bad_request(format!("Invalid coordinates: {e}")))
}

fn lon_lat(position: &[f64]) -> ApiResult<[f64; 2]> {
    match position {
        [lon, lat] | [lon, lat, _] => Ok([*lon, *lat]),
        _ => Err(ApiError::bad_request(format!(
            "Invalid position: expected [lon, lat], got {} values",
            position.len()
        ))),
    }
}
