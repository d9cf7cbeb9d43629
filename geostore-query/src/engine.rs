//! Query evaluation.

use crate::error::{QueryError, QueryResult};
use geostore_geometry::{
    BoundingBox, GeometryKind, Point, Polygon, distance, point_in_polygon, polygons_overlap,
};
use geostore_model::Entity;
use geostore_storage::{SpatialStore, StoreView};
use geostore_types::EntityId;
use tracing::{debug, warn};

/// Stateless query evaluator over a shared store.
///
/// Each query runs under a single read guard, so its result reflects one
/// consistent state of the store. If the index turned out to reference a
/// missing entity, the store is repaired once the guard is released.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    store: &'a SpatialStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a SpatialStore) -> Self {
        Self { store }
    }

    /// Points whose distance to `center` is at most `radius_m` meters.
    pub fn points_within_distance(&self, center: &Point, radius_m: f64) -> QueryResult<Vec<Entity>> {
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Err(QueryError::InvalidRadius(radius_m));
        }
        let bbox = BoundingBox::around_point(center, radius_m);

        self.run("points_within_distance", |view| {
            Ok(view
                .candidates(&bbox, Some(GeometryKind::Point))
                .filter(|entity| {
                    entity
                        .geometry
                        .as_point()
                        .is_some_and(|p| distance(center, p) <= radius_m)
                })
                .cloned()
                .collect())
        })
    }

    /// Points inside (or on the boundary of) the stored polygon `polygon_id`.
    pub fn points_in_polygon(&self, polygon_id: EntityId) -> QueryResult<Vec<Entity>> {
        self.run("points_in_polygon", |view| {
            let polygon = polygon_of(view, polygon_id)?;
            let bbox = polygon.bounding_box();
            Ok(view
                .candidates(&bbox, Some(GeometryKind::Point))
                .filter(|entity| {
                    entity
                        .geometry
                        .as_point()
                        .is_some_and(|p| point_in_polygon(p, polygon))
                })
                .cloned()
                .collect())
        })
    }

    /// Polygons that contain `point`, boundary included.
    pub fn polygons_containing_point(&self, point: &Point) -> QueryResult<Vec<Entity>> {
        let bbox = BoundingBox::from_point(point);

        self.run("polygons_containing_point", |view| {
            Ok(view
                .candidates(&bbox, Some(GeometryKind::Polygon))
                .filter(|entity| {
                    entity
                        .geometry
                        .as_polygon()
                        .is_some_and(|poly| point_in_polygon(point, poly))
                })
                .cloned()
                .collect())
        })
    }

    /// Polygons other than `polygon_id` that overlap or touch it.
    pub fn overlapping_polygons(&self, polygon_id: EntityId) -> QueryResult<Vec<Entity>> {
        self.run("overlapping_polygons", |view| {
            let target = polygon_of(view, polygon_id)?;
            let bbox = target.bounding_box();
            Ok(view
                .candidates(&bbox, Some(GeometryKind::Polygon))
                .filter(|entity| entity.id != polygon_id)
                .filter(|entity| {
                    entity
                        .geometry
                        .as_polygon()
                        .is_some_and(|poly| polygons_overlap(target, poly))
                })
                .cloned()
                .collect())
        })
    }

    /// Evaluates `query` under one read guard, then repairs the store if the
    /// query flagged it and sorts the result by id.
    fn run<F>(&self, name: &'static str, query: F) -> QueryResult<Vec<Entity>>
    where
        F: FnOnce(&StoreView<'_>) -> QueryResult<Vec<Entity>>,
    {
        let result = {
            let view = self.store.read();
            query(&view)
        };

        if self.store.repair_if_needed()? {
            warn!(query = name, "spatial index repaired after query");
        }

        let mut entities = result?;
        entities.sort_unstable_by_key(|entity| entity.id);
        debug!(query = name, results = entities.len(), "query evaluated");
        Ok(entities)
    }
}

/// The polygon stored under `id`. Missing ids and non-polygons are both
/// `NotFound`.
fn polygon_of<'v>(view: &'v StoreView<'_>, id: EntityId) -> QueryResult<&'v Polygon> {
    view.get(id)
        .and_then(|entity| entity.geometry.as_polygon())
        .ok_or(QueryError::NotFound(id))
}
