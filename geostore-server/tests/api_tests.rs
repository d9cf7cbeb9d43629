use geostore_server::build_router;
use geostore_server::handlers::{CreatedResponse, DeletedResponse, HealthResponse, UpdatedResponse};
use geostore_server::{ErrorBody, Feature, FeatureCollection};
use geostore_storage::SpatialStore;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server() -> String {
    let app = build_router(Arc::new(SpatialStore::new()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

fn point_feature(lon: f64, lat: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": properties,
    })
}

fn campus_feature(properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [77.5940, 12.9710],
                [77.5950, 12.9710],
                [77.5950, 12.9720],
                [77.5940, 12.9720],
                [77.5940, 12.9710]
            ]]
        },
        "properties": properties,
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

async fn post(base: &str, path: &str, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn create(base: &str, path: &str, features: Vec<Value>) -> Vec<u64> {
    let resp = post(base, path, &collection(features)).await;
    assert_eq!(resp.status(), 200);
    let body: CreatedResponse = resp.json().await.unwrap();
    assert_eq!(body.status, "success");
    body.created_ids
}

async fn get_collection(url: String) -> FeatureCollection {
    let resp = reqwest::get(url).await.unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

fn feature_ids(fc: &FeatureCollection) -> Vec<u64> {
    fc.features
        .iter()
        .map(|f| f.properties["id"].as_u64().unwrap())
        .collect()
}

// ── Points CRUD ──────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_point() {
    let base = spawn_test_server().await;
    let ids = create(
        &base,
        "/api/points",
        vec![point_feature(77.5946, 12.9716, json!({"name": "MG Road", "ward": 7}))],
    )
    .await;
    assert_eq!(ids, vec![1]);

    let resp = reqwest::get(format!("{}/api/points/1", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let feature: Feature = resp.json().await.unwrap();
    assert_eq!(feature.kind, "Feature");
    assert_eq!(feature.geometry.kind, "Point");
    assert_eq!(feature.geometry.coordinates, json!([77.5946, 12.9716]));
    assert_eq!(feature.properties["id"], json!(1));
    assert_eq!(feature.properties["name"], json!("MG Road"));
    assert_eq!(feature.properties["description"], json!(""));
    assert_eq!(feature.properties["ward"], json!("7"));
    assert!(feature.properties["created_at"].is_string());
    assert!(feature.properties["updated_at"].is_string());
}

#[tokio::test]
async fn missing_name_gets_default() {
    let base = spawn_test_server().await;
    create(&base, "/api/points", vec![point_feature(0.0, 0.0, json!({}))]).await;
    create(&base, "/api/polygons", vec![campus_feature(json!({}))]).await;

    let points = get_collection(format!("{}/api/points", base)).await;
    let polygons = get_collection(format!("{}/api/polygons", base)).await;
    assert_eq!(points.features[0].properties["name"], json!("Unnamed Point"));
    assert_eq!(polygons.features[0].properties["name"], json!("Unnamed Polygon"));
}

#[tokio::test]
async fn list_points_only_returns_points() {
    let base = spawn_test_server().await;
    create(
        &base,
        "/api/points",
        vec![point_feature(1.0, 1.0, json!({})), point_feature(2.0, 2.0, json!({}))],
    )
    .await;
    create(&base, "/api/polygons", vec![campus_feature(json!({}))]).await;

    let points = get_collection(format!("{}/api/points", base)).await;
    assert_eq!(points.kind, "FeatureCollection");
    assert_eq!(feature_ids(&points), vec![1, 2]);
    let polygons = get_collection(format!("{}/api/polygons", base)).await;
    assert_eq!(feature_ids(&polygons), vec![3]);
}

#[tokio::test]
async fn update_point_merges_properties() {
    let base = spawn_test_server().await;
    create(
        &base,
        "/api/points",
        vec![point_feature(0.0, 0.0, json!({"name": "old", "description": "keep"}))],
    )
    .await;

    let resp = reqwest::Client::new()
        .put(format!("{}/api/points/1", base))
        .json(&point_feature(5.0, 6.0, json!({"name": "new"})))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: UpdatedResponse = resp.json().await.unwrap();
    assert_eq!(body.updated_id, 1);

    let feature: Feature = reqwest::get(format!("{}/api/points/1", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(feature.geometry.coordinates, json!([5.0, 6.0]));
    assert_eq!(feature.properties["name"], json!("new"));
    assert_eq!(feature.properties["description"], json!("keep"));
}

#[tokio::test]
async fn delete_point_then_get_is_404() {
    let base = spawn_test_server().await;
    create(&base, "/api/points", vec![point_feature(0.0, 0.0, json!({}))]).await;

    let resp = reqwest::Client::new()
        .delete(format!("{}/api/points/1", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: DeletedResponse = resp.json().await.unwrap();
    assert_eq!(body.deleted_id, 1);

    let resp = reqwest::get(format!("{}/api/points/1", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.detail, "Point not found");
}

#[tokio::test]
async fn polygon_id_on_point_route_is_404() {
    let base = spawn_test_server().await;
    create(&base, "/api/polygons", vec![campus_feature(json!({}))]).await;
    let resp = reqwest::get(format!("{}/api/points/1", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn update_unknown_polygon_is_404() {
    let base = spawn_test_server().await;
    let resp = reqwest::Client::new()
        .put(format!("{}/api/polygons/999", base))
        .json(&campus_feature(json!({})))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.detail, "Polygon not found");
}

// ── Validation ───────────────────────────────────────────────────

#[tokio::test]
async fn short_ring_rejects_whole_batch() {
    let base = spawn_test_server().await;
    let bad = json!({
        "type": "Feature",
        "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]},
        "properties": {}
    });
    let resp = post(
        &base,
        "/api/polygons",
        &collection(vec![campus_feature(json!({})), bad]),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert!(err.detail.starts_with("invalid geometry"));

    let polygons = get_collection(format!("{}/api/polygons", base)).await;
    assert!(polygons.features.is_empty());
}

#[tokio::test]
async fn out_of_range_point_is_400() {
    let base = spawn_test_server().await;
    let resp = post(
        &base,
        "/api/points",
        &collection(vec![point_feature(200.0, 0.0, json!({}))]),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn wrong_geometry_type_is_400() {
    let base = spawn_test_server().await;
    let resp = post(&base, "/api/points", &collection(vec![campus_feature(json!({}))])).await;
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.detail, "Invalid feature format. Must be Point type.");
}

#[tokio::test]
async fn not_a_feature_collection_is_400() {
    let base = spawn_test_server().await;
    let resp = post(
        &base,
        "/api/points",
        &json!({"type": "Feature", "features": []}),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let base = spawn_test_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/points", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: ErrorBody = resp.json().await.unwrap();
    assert!(!err.detail.is_empty());
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/points/abc", base)).await.unwrap();
    assert_eq!(resp.status(), 400);
}

// ── Spatial queries ──────────────────────────────────────────────

#[tokio::test]
async fn points_within_distance_route() {
    let base = spawn_test_server().await;
    create(
        &base,
        "/api/points",
        vec![
            point_feature(77.5946, 12.9716, json!({"name": "center"})),
            point_feature(77.5946, 12.9916, json!({"name": "far"})),
        ],
    )
    .await;

    let fc = get_collection(format!(
        "{}/api/spatial/points-within-distance?lat=12.9716&lon=77.5946&distance=1000",
        base
    ))
    .await;
    assert_eq!(feature_ids(&fc), vec![1]);
}

#[tokio::test]
async fn negative_distance_is_400() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!(
        "{}/api/spatial/points-within-distance?lat=0&lon=0&distance=-5",
        base
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn missing_query_parameter_is_400() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!(
        "{}/api/spatial/points-within-distance?lat=0&lon=0",
        base
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn points_in_polygon_route() {
    let base = spawn_test_server().await;
    create(&base, "/api/polygons", vec![campus_feature(json!({"name": "Campus"}))]).await;
    create(
        &base,
        "/api/points",
        vec![
            point_feature(77.59465, 12.97165, json!({})),
            point_feature(77.6000, 12.9800, json!({})),
        ],
    )
    .await;

    let fc = get_collection(format!("{}/api/spatial/points-in-polygon/1", base)).await;
    assert_eq!(feature_ids(&fc), vec![2]);
}

#[tokio::test]
async fn points_in_unknown_polygon_is_404() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/spatial/points-in-polygon/7", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.detail, "Polygon not found");
}

#[tokio::test]
async fn polygons_containing_point_route() {
    let base = spawn_test_server().await;
    create(&base, "/api/polygons", vec![campus_feature(json!({}))]).await;
    let fc = get_collection(format!(
        "{}/api/spatial/polygons-containing-point?lat=12.97165&lon=77.59465",
        base
    ))
    .await;
    assert_eq!(feature_ids(&fc), vec![1]);
    assert_eq!(fc.features[0].geometry.kind, "Polygon");
}

#[tokio::test]
async fn overlapping_polygons_route() {
    let base = spawn_test_server().await;
    let square = |lon: f64, lat: f64| {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [lon, lat], [lon + 2.0, lat], [lon + 2.0, lat + 2.0], [lon, lat + 2.0], [lon, lat]
                ]]
            },
            "properties": {}
        })
    };
    create(
        &base,
        "/api/polygons",
        vec![square(0.0, 0.0), square(1.0, 1.0), square(10.0, 10.0)],
    )
    .await;

    let fc = get_collection(format!("{}/api/spatial/overlapping-polygons/1", base)).await;
    assert_eq!(feature_ids(&fc), vec![2]);
}

// ── Service ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_entity_count() {
    let base = spawn_test_server().await;
    create(&base, "/api/points", vec![point_feature(0.0, 0.0, json!({}))]).await;
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: HealthResponse = resp.json().await.unwrap();
    assert_eq!(body.status, "ok");
    assert_eq!(body.entities, 1);
}

#[tokio::test]
async fn responses_are_json() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/points", base)).await.unwrap();
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/v1/nonexistent", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
