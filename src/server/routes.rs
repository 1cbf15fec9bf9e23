//! Route handlers for the install flow.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tracing::{instrument, Instrument};

use super::error::ApiError;
use super::pages::{INSTALLED_PAGE, INSTALL_FORM};
use super::state::AppState;
use crate::auth::oauth::{begin_auth, CallbackQuery};
use crate::config::ShopDomain;

/// `shop` parameter accepted by the install and test routes.
#[derive(Debug, Default, Deserialize)]
pub struct ShopParams {
    /// Shop name or `myshopify.com` domain as typed by the merchant.
    pub shop: Option<String>,
}

/// A `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn redirect_to_authorize(state: &AppState, shop: Option<&str>) -> Result<Response, ApiError> {
    let request = begin_auth(state.config(), shop)?;
    tracing::debug!(shop = %request.shop, "redirecting to authorization");
    Ok(found(&request.url()))
}

/// GET /, /install, /connect
///
/// Without a shop this serves the install form; with one it redirects.
#[instrument(skip(state))]
pub async fn install(
    State(state): State<AppState>,
    Query(params): Query<ShopParams>,
) -> Result<Response, ApiError> {
    match params.shop.as_deref() {
        None => Ok(Html(INSTALL_FORM).into_response()),
        shop => redirect_to_authorize(&state, shop),
    }
}

/// POST /, /install
#[instrument(skip(state))]
pub async fn install_submit(
    State(state): State<AppState>,
    Form(params): Form<ShopParams>,
) -> Result<Response, ApiError> {
    redirect_to_authorize(&state, params.shop.as_deref())
}

/// GET /callback
///
/// Redirects to the landing URL only after the token is stored.
///
/// The exchange and store write run on their own task: once the single-use
/// code is sent to Shopify the token must be stored even if the merchant's
/// connection drops.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let handler = state.callback_handler().clone();
    let task = tokio::spawn(async move { handler.handle(&query).await }.in_current_span());

    let credential = task.await??;
    tracing::info!(shop = %credential.shop, "install complete");
    Ok(found(state.config().landing_url()))
}

/// GET /installed
pub async fn installed() -> Html<&'static str> {
    Html(INSTALLED_PAGE)
}

/// GET /test-api
///
/// Calls `shop.json` with the stored token to prove the install works.
#[instrument(skip(state))]
pub async fn test_api(
    State(state): State<AppState>,
    Query(params): Query<ShopParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let raw = params
        .shop
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'shop' parameter".to_string()))?;
    let shop = ShopDomain::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let credential = state
        .store()
        .lookup(&shop)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No access token stored for {shop}")))?;

    let shop_info = state.admin_client(&credential).shop_info().await?;
    Ok(Json(shop_info))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
