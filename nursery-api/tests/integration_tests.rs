//! Integration tests for the catalog API
//!
//! Every test runs against a fresh in-memory store.

use axum::extract::DefaultBodyLimit;
use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use nursery_api::{create_router, ApiConfig, AppState, AuthConfig, MetricsConfig};
use nursery_core::DEFAULT_CATEGORIES;
use nursery_db::{CatalogConfig, DocumentStore, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;

const ADMIN_TOKEN: &str = "admin-token";
const VISITOR_TOKEN: &str = "visitor-token";

fn test_config(catalog: CatalogConfig) -> ApiConfig {
    ApiConfig {
        catalog,
        auth: AuthConfig {
            admin_actors: vec!["admin_1".to_string()],
            ..Default::default()
        }
        .with_api_token(ADMIN_TOKEN, "admin_1")
        .with_api_token(VISITOR_TOKEN, "visitor_1"),
        metrics: MetricsConfig::disabled(),
        ..Default::default()
    }
}

/// Create test server; categories must exist before plants use them
async fn create_test_server() -> TestServer {
    create_server_with(CatalogConfig::unseeded()).await
}

/// Create test server with free-form plant categories
async fn create_permissive_server() -> TestServer {
    create_server_with(CatalogConfig::permissive()).await
}

async fn create_server_with(catalog: CatalogConfig) -> TestServer {
    create_server_over(Arc::new(MemoryStore::new()), catalog).await
}

async fn create_server_over(store: Arc<dyn DocumentStore>, catalog: CatalogConfig) -> TestServer {
    let state = AppState::new(store, &test_config(catalog)).await.unwrap();
    TestServer::new(create_router(state)).unwrap()
}

async fn category_names(server: &TestServer) -> Vec<String> {
    let categories: Value = server.get("/api/categories").await.json();
    categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn monstera() -> Value {
    json!({
        "name": "Monstera",
        "description": "Big leaves",
        "careInstructions": "Water weekly",
        "categories": ["Tropical"],
        "images": [{"url": "https://x/img.jpg", "alt": "m", "publicId": "p1"}]
    })
}

fn plant(name: &str, categories: &[&str], featured: bool) -> Value {
    json!({
        "name": name,
        "description": format!("About {}", name),
        "careInstructions": "Bright light",
        "categories": categories,
        "images": [{"url": "https://res.cloudinary.com/demo/image/upload/a.jpg", "alt": name, "publicId": "a"}],
        "featured": featured
    })
}

async fn create_plant(server: &TestServer, payload: &Value) -> TestResponse {
    server
        .post("/api/plants")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(payload)
        .await
}

async fn create_category(server: &TestServer, name: &str) -> TestResponse {
    server
        .post("/api/categories")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(&json!({ "name": name }))
        .await
}

async fn list_total(server: &TestServer) -> u64 {
    let body: Value = server.get("/api/plants").await.json();
    body["total"].as_u64().unwrap()
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_ready_check() {
    let server = create_test_server().await;

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let server = create_test_server().await;
    server.get("/metrics").await.assert_status_not_found();
}

// ============ Plant Endpoint Tests ============

/// Scenario: create Monstera, read it back, find it in the listing
#[tokio::test]
async fn test_e2e_monstera_create_get_list() {
    let server = create_test_server().await;
    create_category(&server, "Tropical")
        .await
        .assert_status(StatusCode::CREATED);

    let response = create_plant(&server, &monstera()).await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["createdBy"], "admin_1");
    assert_eq!(created["featured"], false);
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let response = server.get(&format!("/api/plants/{}", id)).await;
    response.assert_status_ok();
    let fetched: Value = response.json();
    assert_eq!(fetched, created);
    for field in ["name", "description", "careInstructions", "categories", "images"] {
        assert_eq!(fetched[field], monstera()[field], "field {}", field);
    }

    let list: Value = server.get("/api/plants").await.json();
    assert_eq!(list["total"], 1);
    let plants = list["plants"].as_array().unwrap();
    assert_eq!(plants.len(), 1);
    assert_eq!(plants[0]["name"], "Monstera");
}

/// A freshly started catalog accepts the default category tags
#[tokio::test]
async fn test_default_config_creates_monstera_on_fresh_store() {
    let server = create_server_with(CatalogConfig::default()).await;

    let names = category_names(&server).await;
    assert_eq!(names.len(), DEFAULT_CATEGORIES.len());
    assert!(names.iter().any(|n| n == "Tropical"));

    let response = create_plant(&server, &monstera()).await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["categories"], json!(["Tropical"]));

    let list: Value = server.get("/api/plants?category=Tropical").await.json();
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_default_categories_not_reseeded_into_populated_store() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

    let first = create_server_over(store.clone(), CatalogConfig::unseeded()).await;
    create_category(&first, "Bonsai")
        .await
        .assert_status(StatusCode::CREATED);

    let second = create_server_over(store, CatalogConfig::default()).await;
    assert_eq!(category_names(&second).await, vec!["Bonsai"]);
}

#[tokio::test]
async fn test_create_missing_name_persists_nothing() {
    let server = create_test_server().await;
    create_category(&server, "Tropical").await;

    let mut payload = monstera();
    payload.as_object_mut().unwrap().remove("name");

    let response = create_plant(&server, &payload).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "name"));

    assert_eq!(list_total(&server).await, 0);
}

#[tokio::test]
async fn test_create_reports_every_failing_field() {
    let server = create_permissive_server().await;

    let response = create_plant(
        &server,
        &json!({
            "name": "",
            "description": "ok",
            "careInstructions": "ok",
            "categories": [],
            "images": [{"url": "not a url", "alt": "", "publicId": ""}],
            "price": "cheap"
        }),
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    for expected in ["name", "categories", "images[0].url", "price"] {
        assert!(fields.contains(&expected), "missing {} in {:?}", expected, fields);
    }
}

#[tokio::test]
async fn test_unknown_category_rejected() {
    let server = create_test_server().await;
    create_category(&server, "Indoor").await;

    let response = create_plant(&server, &plant("Fern", &["Indoor", "Jungle"], false)).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], "categories[1]");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let server = create_permissive_server().await;

    let response = server
        .post("/api/plants")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .content_type("application/json")
        .text("{not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_get_plant_not_found_and_malformed_id() {
    let server = create_test_server().await;

    let response = server
        .get("/api/plants/0f8fad5bd9cb469fa16570867728950e")
        .await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");

    let response = server.get("/api/plants/not-an-id").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_update_plant() {
    let server = create_permissive_server().await;
    let created: Value = create_plant(&server, &plant("Pothos", &["Indoor"], false))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/plants/{}", id))
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(&json!({"featured": true, "price": 12.5, "createdBy": "someone_else"}))
        .await;

    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["featured"], true);
    assert_eq!(updated["price"], 12.5);
    assert_eq!(updated["name"], "Pothos");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["createdBy"], "admin_1");
}

#[tokio::test]
async fn test_update_rejects_invalid_patch() {
    let server = create_permissive_server().await;
    let created: Value = create_plant(&server, &plant("Pothos", &["Indoor"], false))
        .await
        .json();

    let response = server
        .put(&format!("/api/plants/{}", created["id"].as_str().unwrap()))
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(&json!({"name": "  ", "images": []}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let fetched: Value = server
        .get(&format!("/api/plants/{}", created["id"].as_str().unwrap()))
        .await
        .json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_nonexistent_is_not_found_without_side_effect() {
    let server = create_permissive_server().await;
    create_plant(&server, &plant("Aloe", &["Succulents"], false)).await;

    let response = server
        .put("/api/plants/0f8fad5bd9cb469fa16570867728950e")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(&json!({"name": "Ghost"}))
        .await;
    response.assert_status_not_found();

    let list: Value = server.get("/api/plants").await.json();
    assert_eq!(list["total"], 1);
    assert_eq!(list["plants"][0]["name"], "Aloe");
}

#[tokio::test]
async fn test_delete_removes_plant() {
    let server = create_permissive_server().await;
    let created: Value = create_plant(&server, &plant("Basil", &["Herbs"], false))
        .await
        .json();
    let path = format!("/api/plants/{}", created["id"].as_str().unwrap());

    let response = server
        .delete(&path)
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    server.get(&path).await.assert_status_not_found();
    assert_eq!(list_total(&server).await, 0);

    server
        .delete(&path)
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_list_filters() {
    let server = create_permissive_server().await;
    create_plant(&server, &plant("Snake Plant", &["Indoor"], true)).await;
    create_plant(&server, &plant("Rose", &["Outdoor", "Flowering"], false)).await;
    create_plant(&server, &plant("Peace Lily", &["Indoor", "Flowering"], true)).await;

    let featured: Value = server.get("/api/plants?featured=true").await.json();
    assert_eq!(featured["total"], 2);
    assert!(featured["plants"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["featured"] == true));

    let flowering: Value = server.get("/api/plants?category=Flowering").await.json();
    assert_eq!(flowering["total"], 2);
    assert!(flowering["plants"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["categories"].as_array().unwrap().contains(&json!("Flowering"))));

    let exact_tag: Value = server.get("/api/plants?category=flowering").await.json();
    assert_eq!(exact_tag["total"], 0);

    let search: Value = server.get("/api/plants?query=lily").await.json();
    assert_eq!(search["total"], 1);
    assert_eq!(search["plants"][0]["name"], "Peace Lily");

    let limited: Value = server.get("/api/plants?limit=1").await.json();
    assert_eq!(limited["plants"].as_array().unwrap().len(), 1);
    assert_eq!(limited["total"], 3);
}

#[tokio::test]
async fn test_list_rejects_malformed_query_string() {
    let server = create_test_server().await;

    let response = server.get("/api/plants?featured=true&featured=false").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        &test_config(CatalogConfig::permissive()),
    )
    .await
    .unwrap();
    let router = create_router(state).layer(DefaultBodyLimit::max(1024));
    let server = TestServer::new(router).unwrap();

    let mut payload = plant("Fern", &["Indoor"], false);
    payload["description"] = json!("x".repeat(4096));

    let response = create_plant(&server, &payload).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(list_total(&server).await, 0);
}

#[tokio::test]
async fn test_list_rejects_bad_featured_flag() {
    let server = create_test_server().await;

    let response = server.get("/api/plants?featured=maybe").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], "featured");
}

// ============ Category Endpoint Tests ============

#[tokio::test]
async fn test_category_conflict_is_case_insensitive() {
    let server = create_test_server().await;

    let response = create_category(&server, "Succulents").await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["category"]["name"], "Succulents");
    assert!(body["message"].is_string());

    let response = create_category(&server, "succulents").await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFLICT");

    let categories: Value = server.get("/api/categories").await.json();
    let matching: Vec<_> = categories
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["name"].as_str().unwrap().eq_ignore_ascii_case("succulents"))
        .collect();
    assert_eq!(matching.len(), 1);
}

#[tokio::test]
async fn test_categories_sorted_by_name() {
    let server = create_test_server().await;
    for name in ["Trees", "Cacti", "Herbs"] {
        create_category(&server, name).await;
    }

    let categories: Value = server.get("/api/categories").await.json();
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cacti", "Herbs", "Trees"]);
}

#[tokio::test]
async fn test_category_name_required() {
    let server = create_test_server().await;

    let response = create_category(&server, "   ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============ Auth Tests ============

#[tokio::test]
async fn test_writes_require_authentication() {
    let server = create_permissive_server().await;

    server
        .post("/api/plants")
        .json(&plant("Fern", &["Indoor"], false))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .post("/api/categories")
        .json(&json!({"name": "Indoor"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .delete("/api/plants/0f8fad5bd9cb469fa16570867728950e")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/admin/stats")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(list_total(&server).await, 0);
}

#[tokio::test]
async fn test_stale_credential_browses_but_cannot_write() {
    let server = create_permissive_server().await;
    create_plant(&server, &plant("Fern", &["Indoor"], false)).await;

    let response = server
        .get("/api/plants")
        .add_header(AUTHORIZATION, bearer("not-a-real-token"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 1);

    server
        .get("/api/categories")
        .add_header(AUTHORIZATION, bearer("not-a-real-token"))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/plants")
        .add_header(AUTHORIZATION, bearer("not-a-real-token"))
        .json(&plant("Ghost", &["Indoor"], false))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHENTICATED");
    assert_eq!(body["message"], "Unauthenticated: Invalid credentials");

    assert_eq!(list_total(&server).await, 1);
}

#[tokio::test]
async fn test_non_admin_actor_forbidden() {
    let server = create_permissive_server().await;

    server
        .post("/api/plants")
        .add_header(AUTHORIZATION, bearer(VISITOR_TOKEN))
        .json(&plant("Fern", &["Indoor"], false))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // reads stay open to any authenticated actor
    server
        .get("/api/plants")
        .add_header(AUTHORIZATION, bearer(VISITOR_TOKEN))
        .await
        .assert_status_ok();
}

// ============ Admin Endpoint Tests ============

#[tokio::test]
async fn test_dashboard_stats() {
    let server = create_permissive_server().await;
    create_category(&server, "Indoor").await;
    create_plant(&server, &plant("Snake Plant", &["Indoor"], true)).await;
    create_plant(&server, &plant("Rose", &["Outdoor"], false)).await;

    let response = server
        .get("/api/admin/stats")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["totalPlants"], 2);
    assert_eq!(body["featuredPlants"], 1);
    assert_eq!(body["totalCategories"], 1);
    assert_eq!(body["recentPlants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upload_config() {
    let server = create_test_server().await;

    let response = server
        .get("/api/uploads/config")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["uploadPreset"], "plant-nursery");
    assert!(body["uploadUrl"].is_null());
}
