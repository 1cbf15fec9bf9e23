//! Authenticated Admin API client.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

use crate::auth::StoreCredential;
use crate::clients::errors::{HttpError, HttpResponseError};
use crate::config::AppConfig;

/// `User-Agent` sent with every request.
const USER_AGENT_VALUE: &str = concat!("shopify-connect/", env!("CARGO_PKG_VERSION"));

/// Header carrying the shop's access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

/// A client for one shop's Admin REST API, authenticated with a stored
/// credential.
///
/// Requests go to `https://{shop}/admin/api/{version}/`, unless the config
/// overrides the provider origin.
///
/// # Thread Safety
///
/// `AdminClient` is `Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// let credential = store.lookup(&shop).await?.expect("installed");
/// let client = AdminClient::new(config, &credential, reqwest::Client::new());
/// let shop_json = client.shop_info().await?;
/// ```
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    base_uri: String,
    base_path: String,
    credential: StoreCredential,
}

// Verify AdminClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdminClient>();
};

impl AdminClient {
    /// Creates a client for the credential's shop.
    #[must_use]
    pub fn new(config: &AppConfig, credential: &StoreCredential, client: reqwest::Client) -> Self {
        Self {
            client,
            base_uri: config.provider_origin(&credential.shop),
            base_path: format!("/admin/api/{}", config.api_version()),
            credential: credential.clone(),
        }
    }

    /// Returns the origin requests are sent to.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the full URL for `path` (relative to the API prefix).
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_uri,
            self.base_path,
            path.trim_start_matches('/')
        )
    }

    fn default_headers(&self) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut token = HeaderValue::from_str(self.credential.access_token())?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);

        Ok(headers)
    }

    /// Sends an authenticated GET and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// - [`HttpError::InvalidToken`] if the stored token is not a valid header value
    /// - [`HttpError::Network`] if the API cannot be reached
    /// - [`HttpError::Response`] for any non-2xx status
    /// - [`HttpError::Decode`] if the body is not JSON
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, HttpError> {
        let url = self.url_for(path);
        tracing::debug!(shop = %self.credential.shop, %url, "admin API request");

        let response = self
            .client
            .get(&url)
            .headers(self.default_headers()?)
            .send()
            .await?;

        let status = response.status();
        let error_reference = response
            .headers()
            .get("X-Request-Id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                shop = %self.credential.shop,
                status = status.as_u16(),
                "admin API returned an error"
            );
            let message = if body.is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(HttpResponseError {
                code: status.as_u16(),
                message,
                error_reference,
            }
            .into());
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches the shop record (`shop.json`).
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::get`].
    pub async fn shop_info(&self) -> Result<serde_json::Value, HttpError> {
        self.get("shop.json").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, ApiVersion, RedirectUri, ShopDomain};
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config(base_url: Option<&str>) -> Arc<AppConfig> {
        let mut builder = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .redirect_uri(RedirectUri::new("https://myapp.example.com/callback").unwrap())
            .api_version("2024-10".parse::<ApiVersion>().unwrap());
        if let Some(url) = base_url {
            builder = builder.provider_base_url(url);
        }
        Arc::new(builder.build().unwrap())
    }

    fn credential() -> StoreCredential {
        StoreCredential::new(ShopDomain::new("my-store").unwrap(), "shpat_test")
    }

    #[test]
    fn test_url_for_uses_shop_and_version() {
        let client = AdminClient::new(
            &create_test_config(None),
            &credential(),
            reqwest::Client::new(),
        );
        assert_eq!(client.base_uri(), "https://my-store.myshopify.com");
        assert_eq!(
            client.url_for("shop.json"),
            "https://my-store.myshopify.com/admin/api/2024-10/shop.json"
        );
    }

    #[tokio::test]
    async fn test_shop_info_sends_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2024-10/shop.json"))
            .and(header("X-Shopify-Access-Token", "shpat_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shop": {"name": "My Store"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AdminClient::new(
            &create_test_config(Some(&server.uri())),
            &credential(),
            reqwest::Client::new(),
        );
        let shop = client.shop_info().await.unwrap();
        assert_eq!(shop["shop"]["name"], "My Store");
    }

    #[tokio::test]
    async fn test_non_success_status_is_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2024-10/shop.json"))
            .respond_with(
                ResponseTemplate::new(401)
                    .insert_header("X-Request-Id", "req-42")
                    .set_body_string(r#"{"errors":"[API] Invalid API key or access token"}"#),
            )
            .mount(&server)
            .await;

        let client = AdminClient::new(
            &create_test_config(Some(&server.uri())),
            &credential(),
            reqwest::Client::new(),
        );
        match client.shop_info().await {
            Err(HttpError::Response(e)) => {
                assert_eq!(e.code, 401);
                assert!(e.message.contains("Invalid API key"));
                assert_eq!(e.error_reference.as_deref(), Some("req-42"));
            }
            other => panic!("Expected Response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2024-10/shop.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = AdminClient::new(
            &create_test_config(Some(&server.uri())),
            &credential(),
            reqwest::Client::new(),
        );
        assert!(matches!(
            client.shop_info().await,
            Err(HttpError::Decode(_))
        ));
    }
}
