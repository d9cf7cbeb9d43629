//! GeoJSON HTTP API for GeoStore.
//!
//! Typed CRUD routes for points and polygons plus the four spatial queries,
//! all served from one shared [`SpatialStore`].

pub mod error;
pub mod geojson;
pub mod handlers;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use geostore_geometry::GeometryKind;
use geostore_storage::SpatialStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use geojson::{Feature, FeatureCollection, GeoJsonGeometry};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<SpatialStore>,
}

impl AppState {
    pub fn new(store: Arc<SpatialStore>) -> Self {
        Self { store }
    }
}

/// CRUD routes for one geometry kind under `prefix`.
fn collection_routes(prefix: &str, kind: GeometryKind) -> Router<AppState> {
    Router::new()
        .route(
            prefix,
            get(move |State(state): State<AppState>| handlers::list_features(state, kind)).post(
                move |State(state): State<AppState>,
                      payload: Result<Json<FeatureCollection>, JsonRejection>| {
                    handlers::create_features(state, kind, payload)
                },
            ),
        )
        .route(
            &format!("{prefix}/{{id}}"),
            get(move |State(state): State<AppState>, Path(id): Path<String>| {
                handlers::get_feature(state, kind, id)
            })
            .put(
                move |State(state): State<AppState>,
                      Path(id): Path<String>,
                      payload: Result<Json<Feature>, JsonRejection>| {
                    handlers::update_feature(state, kind, id, payload)
                },
            )
            .delete(move |State(state): State<AppState>, Path(id): Path<String>| {
                handlers::delete_feature(state, kind, id)
            }),
        )
}

/// Build the HTTP API router over the given store.
pub fn build_router(store: Arc<SpatialStore>) -> Router {
    Router::new()
        .merge(collection_routes("/api/points", GeometryKind::Point))
        .merge(collection_routes("/api/polygons", GeometryKind::Polygon))
        .route(
            "/api/spatial/points-within-distance",
            get(handlers::points_within_distance),
        )
        .route(
            "/api/spatial/points-in-polygon/{polygon_id}",
            get(handlers::points_in_polygon),
        )
        .route(
            "/api/spatial/polygons-containing-point",
            get(handlers::polygons_containing_point),
        )
        .route(
            "/api/spatial/overlapping-polygons/{polygon_id}",
            get(handlers::overlapping_polygons),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(store))
}
