//! HTTP surface of the install flow.
//!
//! | Route | Method | Behavior |
//! |-------|--------|----------|
//! | `/`, `/install` | GET | install form, or 302 to Shopify when `shop` is given |
//! | `/`, `/install` | POST | 302 to Shopify for the submitted `shop` |
//! | `/connect` | GET | same as GET `/install` |
//! | `/callback` | GET | exchange and store the token, then 302 to the landing URL |
//! | `/installed` | GET | default landing page |
//! | `/test-api` | GET | fetch `shop.json` with the stored token |
//! | `/health` | GET | liveness |
//!
//! Errors are JSON: `{"error": "..."}`.

mod error;
mod pages;
mod routes;
mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use routes::ShopParams;
pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::install).post(routes::install_submit))
        .route("/install", get(routes::install).post(routes::install_submit))
        .route("/connect", get(routes::install))
        .route("/callback", get(routes::callback))
        .route("/installed", get(routes::installed))
        .route("/test-api", get(routes::test_api))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
