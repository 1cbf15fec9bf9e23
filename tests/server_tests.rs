//! Integration tests for the HTTP routes.
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! Shopify is a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use shopify_connect::server::{router, AppState};
use shopify_connect::store::{CredentialStore, InMemoryCredentialStore, StoreError};
use shopify_connect::{ApiKey, ApiSecretKey, AppConfig, RedirectUri, ShopDomain, StoreCredential};
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(base_url: &str) -> AppConfig {
    AppConfig::builder()
        .api_key(ApiKey::new("test-client-id").unwrap())
        .api_secret_key(ApiSecretKey::new("test-client-secret").unwrap())
        .redirect_uri(RedirectUri::new("https://myapp.example.com/callback").unwrap())
        .api_version("2024-10".parse().unwrap())
        .provider_base_url(base_url)
        .build()
        .unwrap()
}

#[derive(Debug)]
struct FailingStore;

#[async_trait]
impl CredentialStore for FailingStore {
    async fn upsert(&self, _credential: StoreCredential) -> Result<(), StoreError> {
        Err(StoreError::DataCorruption("disk full".to_string()))
    }

    async fn lookup(&self, _shop: &ShopDomain) -> Result<Option<StoreCredential>, StoreError> {
        Ok(None)
    }
}

fn app(server: &MockServer) -> (Router, Arc<InMemoryCredentialStore>) {
    let store = Arc::new(InMemoryCredentialStore::new());
    let state = AppState::new(create_test_config(&server.uri()), store.clone());
    (router(state), store)
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_install_without_shop_serves_form() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("name=\"shop\""));
}

#[tokio::test]
async fn test_install_with_shop_redirects_to_authorize() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app, "/install?shop=my-store").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with(
        "https://my-store.myshopify.com/admin/oauth/authorize?client_id=test-client-id"
    ));
}

#[tokio::test]
async fn test_connect_is_an_alias_for_install() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app, "/connect?shop=my-store.myshopify.com").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("https://my-store.myshopify.com/"));
}

#[tokio::test]
async fn test_blank_shop_is_400_not_redirect() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app, "/install?shop=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("shop"));
}

#[tokio::test]
async fn test_post_install_redirects() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = app
        .oneshot(
            Request::post("/install")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("shop=form-store"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("https://form-store.myshopify.com/"));
}

#[tokio::test]
async fn test_post_install_without_shop_is_400() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = app
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(""))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_success_redirects_to_landing_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "shpat_routed",
            "scope": "read_orders"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (app, store) = app(&server);

    let response = get(app, "/callback?code=abc&shop=my-store.myshopify.com").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/installed");

    let stored = store
        .lookup(&ShopDomain::new("my-store").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.access_token(), "shpat_routed");
}

#[tokio::test]
async fn test_callback_rejected_returns_error_and_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;
    let (app, store) = app(&server);

    let response = get(app, "/callback?code=bad&shop=my-store").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("401"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_callback_storage_failure_is_500_without_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "shpat_unsaved"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let state = AppState::new(create_test_config(&server.uri()), Arc::new(FailingStore));

    let response = get(router(state), "/callback?code=abc&shop=my-store").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());

    let body = body_json(response).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(!body.to_string().contains("disk full"));
}

#[tokio::test]
async fn test_callback_completes_after_client_disconnects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "shpat_late"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (app, store) = app(&server);

    // The client gives up while the token request is still in flight
    let request = Request::get("/callback?code=abc&shop=my-store")
        .body(Body::empty())
        .unwrap();
    let result = tokio::time::timeout(Duration::from_millis(100), app.oneshot(request)).await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(800)).await;

    let stored = store
        .lookup(&ShopDomain::new("my-store").unwrap())
        .await
        .unwrap()
        .expect("token stored after the client went away");
    assert_eq!(stored.access_token(), "shpat_late");
}

#[tokio::test]
async fn test_callback_missing_code_is_400() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app, "/callback?shop=my-store").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_bad_hmac_is_401() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app, "/callback?code=abc&shop=my-store&hmac=deadbeef").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_test_api_without_token_is_404() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app, "/test-api?shop=unknown-store").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("unknown-store.myshopify.com"));
}

#[tokio::test]
async fn test_test_api_calls_shop_json_with_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/shop.json"))
        .and(header_matcher("X-Shopify-Access-Token", "shpat_stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shop": {"name": "My Store", "myshopify_domain": "my-store.myshopify.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (app, store) = app(&server);
    store
        .upsert(StoreCredential::new(
            ShopDomain::new("my-store").unwrap(),
            "shpat_stored",
        ))
        .await
        .unwrap();

    let response = get(app, "/test-api?shop=my-store").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["shop"]["name"], "My Store");
}

#[tokio::test]
async fn test_test_api_upstream_error_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/shop.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("revoked"))
        .mount(&server)
        .await;
    let (app, store) = app(&server);
    store
        .upsert(StoreCredential::new(
            ShopDomain::new("my-store").unwrap(),
            "shpat_revoked",
        ))
        .await
        .unwrap();

    let response = get(app, "/test-api?shop=my-store").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_installed_and_health() {
    let server = MockServer::start().await;
    let (app, _) = app(&server);

    let response = get(app.clone(), "/installed").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, "/health").await;
    assert_eq!(body_string(response).await, "ok");
}
