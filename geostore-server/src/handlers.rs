//! HTTP endpoint handlers

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::geojson::{Feature, FeatureCollection};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use geostore_geometry::{GeometryKind, Point};
use geostore_model::{AttributeUpdate, Entity, EntityPatch, fill_defaults};
use geostore_query::{QueryEngine, QueryError};
use geostore_storage::StorageError;
use geostore_types::EntityId;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Response for a batch create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub status: String,
    pub created_ids: Vec<u64>,
}

/// Response for an update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub status: String,
    pub updated_id: u64,
}

/// Response for a delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub status: String,
    pub deleted_id: u64,
}

/// Response for the health probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub entities: usize,
}

#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub lat: f64,
    pub lon: f64,
    pub distance: f64,
}

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub lat: f64,
    pub lon: f64,
}

const SUCCESS: &str = "success";

fn not_found_detail(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Point => "Point not found",
        GeometryKind::Polygon => "Polygon not found",
    }
}

fn parse_id(raw: &str) -> ApiResult<EntityId> {
    EntityId::parse(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

fn collection(entities: &[Entity]) -> FeatureCollection {
    FeatureCollection::new(entities.iter().map(Feature::from_entity).collect())
}

/// Fetches `id` and checks it has the route's geometry kind.
fn get_typed(state: &AppState, id: EntityId, kind: GeometryKind) -> ApiResult<Entity> {
    match state.store.get(id) {
        Ok(entity) if entity.kind() == kind => Ok(entity),
        Ok(_) | Err(StorageError::NotFound(_)) => Err(ApiError::not_found(not_found_detail(kind))),
        Err(err) => Err(err.into()),
    }
}

/// Spatial query errors with the route-level `Polygon not found` detail.
fn query_error(err: QueryError) -> ApiError {
    match err {
        QueryError::NotFound(_) => ApiError::not_found(not_found_detail(GeometryKind::Polygon)),
        other => other.into(),
    }
}

// ── Collection routes (/api/points, /api/polygons) ───────────────

/// Store every feature of a FeatureCollection
pub async fn create_features(
    state: AppState,
    kind: GeometryKind,
    payload: Result<Json<FeatureCollection>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let items = body
        .decode(kind)?
        .into_iter()
        .map(|(geometry, mut attributes)| {
            fill_defaults(&mut attributes, kind);
            (geometry, attributes)
        });

    let created = state.store.create_batch(items)?;
    info!(%kind, count = created.len(), "features created");
    Ok(Json(CreatedResponse {
        status: SUCCESS.to_string(),
        created_ids: created.iter().map(EntityId::as_u64).collect(),
    }))
}

/// All features of one kind
pub async fn list_features(state: AppState, kind: GeometryKind) -> Json<FeatureCollection> {
    Json(collection(&state.store.list(Some(kind))))
}

/// One feature by id
pub async fn get_feature(
    state: AppState,
    kind: GeometryKind,
    raw_id: String,
) -> ApiResult<Json<Feature>> {
    let id = parse_id(&raw_id)?;
    let entity = get_typed(&state, id, kind)?;
    Ok(Json(Feature::from_entity(&entity)))
}

/// Replace geometry and merge supplied properties
pub async fn update_feature(
    state: AppState,
    kind: GeometryKind,
    raw_id: String,
    payload: Result<Json<Feature>, JsonRejection>,
) -> ApiResult<Json<UpdatedResponse>> {
    let id = parse_id(&raw_id)?;
    get_typed(&state, id, kind)?;

    let Json(feature) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let (geometry, attributes) = feature.decode(kind)?;
    let patch = EntityPatch {
        geometry: Some(geometry),
        attributes: Some(AttributeUpdate::Merge(attributes)),
    };

    state.store.update(id, patch).map_err(|err| match err {
        StorageError::NotFound(_) => ApiError::not_found(not_found_detail(kind)),
        other => other.into(),
    })?;
    Ok(Json(UpdatedResponse {
        status: SUCCESS.to_string(),
        updated_id: id.as_u64(),
    }))
}

/// Delete one feature by id
pub async fn delete_feature(
    state: AppState,
    kind: GeometryKind,
    raw_id: String,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_id(&raw_id)?;
    get_typed(&state, id, kind)?;

    state.store.delete(id).map_err(|err| match err {
        StorageError::NotFound(_) => ApiError::not_found(not_found_detail(kind)),
        other => other.into(),
    })?;
    Ok(Json(DeletedResponse {
        status: SUCCESS.to_string(),
        deleted_id: id.as_u64(),
    }))
}

// ── Spatial queries ──────────────────────────────────────────────

/// Points within `distance` meters of (`lon`, `lat`)
pub async fn points_within_distance(
    State(state): State<AppState>,
    params: Result<Query<DistanceParams>, QueryRejection>,
) -> ApiResult<Json<FeatureCollection>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let center = Point::new(params.lon, params.lat)?;
    let hits = QueryEngine::new(&state.store)
        .points_within_distance(&center, params.distance)
        .map_err(query_error)?;
    Ok(Json(collection(&hits)))
}

/// Points inside a stored polygon
pub async fn points_in_polygon(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<FeatureCollection>> {
    let id = parse_id(&raw_id)?;
    let hits = QueryEngine::new(&state.store)
        .points_in_polygon(id)
        .map_err(query_error)?;
    Ok(Json(collection(&hits)))
}

/// Polygons containing (`lon`, `lat`)
pub async fn polygons_containing_point(
    State(state): State<AppState>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> ApiResult<Json<FeatureCollection>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let point = Point::new(params.lon, params.lat)?;
    let hits = QueryEngine::new(&state.store)
        .polygons_containing_point(&point)
        .map_err(query_error)?;
    Ok(Json(collection(&hits)))
}

/// Polygons overlapping a stored polygon
pub async fn overlapping_polygons(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<FeatureCollection>> {
    let id = parse_id(&raw_id)?;
    let hits = QueryEngine::new(&state.store)
        .overlapping_polygons(id)
        .map_err(query_error)?;
    Ok(Json(collection(&hits)))
}

/// Liveness probe
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        entities: state.store.len(),
    })
}
