//! HTTP-specific error types for Admin API calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_connect::clients::HttpError;
//!
//! match client.shop_info().await {
//!     Ok(shop) => println!("{shop}"),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(HttpError::Decode(e)) => println!("Bad body: {e}"),
//!     Err(HttpError::InvalidToken(_)) => println!("Stored token is unusable"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use shopify_connect::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 401,
///     message: "[API] Invalid API key or access token".to_string(),
///     error_reference: Some("abc-123".to_string()),
/// };
///
/// assert_eq!(error.to_string(), "[API] Invalid API key or access token");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Response body, or a short description if the body was empty.
    pub message: String,
    /// Reference ID for error reporting (from `X-Request-Id`).
    pub error_reference: Option<String>,
}

/// Unified error type for Admin API calls.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-2xx HTTP response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The stored access token cannot be sent as a header.
    #[error("Access token is not a valid header value")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// A 2xx response whose body is not valid JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpResponseError>();
    assert_send_sync::<HttpError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_displays_message() {
        let error = HttpResponseError {
            code: 404,
            message: r#"{"errors":"Not Found"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"{"errors":"Not Found"}"#);
    }

    #[test]
    fn test_http_error_wraps_response_error_transparently() {
        let error: HttpError = HttpResponseError {
            code: 403,
            message: "forbidden".to_string(),
            error_reference: Some("req-1".to_string()),
        }
        .into();
        assert_eq!(error.to_string(), "forbidden");
        assert!(matches!(error, HttpError::Response(ref e) if e.code == 403));
    }

    #[test]
    fn test_decode_error_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: HttpError = serde_error.into();
        assert!(error.to_string().starts_with("Invalid response body"));
    }
}
