//! Tests for the front-end pages and JSON APIs.

use axum::{
    body::Body,
    extract::RawQuery,
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use model_viewer::config::ViewerConfig;
use model_viewer::HttpServer;

mod common;

async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn router(config: ViewerConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

#[tokio::test]
async fn races_lists_every_playable_race() {
    let (status, body) = send(router(ViewerConfig::default()), Method::GET, "/get-races").await;
    assert_eq!(status, StatusCode::OK);

    let races: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(races.len(), 30);
    assert_eq!(races["Human"], 1);
    assert_eq!(races["Blood Elf"], 10);
}

#[tokio::test]
async fn broken_always_fails() {
    let (status, body) = send(router(ViewerConfig::default()), Method::GET, "/broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "something terrible has happened");
}

#[tokio::test]
async fn index_renders_region() {
    let (status, body) = send(router(ViewerConfig::default()), Method::GET, "/?region=eu").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-region="eu""#));
}

#[tokio::test]
async fn unknown_paths_fall_back_to_index() {
    let mut config = ViewerConfig::default();
    config.site.default_region = Some("us".into());
    let (status, body) = send(router(config), Method::GET, "/characters/some-hero").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-region="us""#));
}

#[tokio::test]
async fn static_files_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css/site.css"), "body { margin: 0; }").unwrap();

    let mut config = ViewerConfig::default();
    config.site.static_dir = dir.path().to_string_lossy().into_owned();

    let (status, body) = send(router(config.clone()), Method::GET, "/static/css/site.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "body { margin: 0; }");

    let (status, _) = send(router(config), Method::GET, "/static/css/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_get_a_request_id() {
    let request = Request::builder().uri("/get-races").body(Body::empty()).unwrap();
    let response = router(ViewerConfig::default()).oneshot(request).await.unwrap();
    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

async fn item_stub() -> std::net::SocketAddr {
    common::start_upstream(Router::new().fallback(|RawQuery(query): RawQuery| async move {
        let query = query.unwrap_or_default();
        if query.starts_with("item=19019") {
            (
                StatusCode::OK,
                r#"<wowhead><item id="19019"><icon displayId="30606">inv_sword_39</icon></item></wowhead>"#,
            )
        } else if query.starts_with("item=500") {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
        } else {
            (StatusCode::OK, "<wowhead><error>Item not found!</error></wowhead>")
        }
    }))
    .await
}

#[tokio::test]
async fn item_lookup_returns_display_id() {
    let stub = item_stub().await;
    let (status, body) = send(
        router(common::config_for(stub)),
        Method::GET,
        "/item-lookup?item=19019",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "displayId": "30606" }));
}

#[tokio::test]
async fn item_lookup_validates_input() {
    let stub = item_stub().await;
    let app = router(common::config_for(stub));

    let (status, body) = send(app.clone(), Method::GET, "/item-lookup").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "item is required");

    let (status, body) = send(app.clone(), Method::GET, "/item-lookup?item=sword").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "item must be a number");

    let (status, _) = send(app, Method::POST, "/item-lookup?item=19019").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn item_lookup_failures_are_500() {
    let stub = item_stub().await;
    let app = router(common::config_for(stub));

    let (status, body) = send(app.clone(), Method::GET, "/item-lookup?item=500").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error fetching display ID");

}

#[tokio::test]
async fn unknown_item_has_empty_display_id() {
    let stub = item_stub().await;
    let (status, body) = send(
        router(common::config_for(stub)),
        Method::GET,
        "/item-lookup?item=42",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "displayId": "" }));
}
