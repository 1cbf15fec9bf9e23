//! HMAC validation for Shopify OAuth callbacks.
//!
//! Shopify signs the query string it appends to the redirect URI. The
//! signature is the hex-encoded HMAC-SHA256 of every other parameter,
//! sorted by key and joined as `key=value` pairs with `&`, keyed with the
//! app's client secret.
//!
//! All comparisons are constant-time.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::auth::oauth::hmac::compute_signature;
//!
//! let signature = compute_signature("code=abc&shop=example.myshopify.com", "secret");
//! assert_eq!(signature.len(), 64);
//! assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Parameters that are never part of the signed message.
const UNSIGNED_PARAMS: &[&str] = &["hmac", "signature"];

/// Computes a lowercase hex HMAC-SHA256 signature of `message`.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());

    mac.finalize()
        .into_bytes()
        .iter()
        .fold(String::with_capacity(64), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

/// Performs constant-time comparison of two strings.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Builds the message Shopify signs from callback parameters.
///
/// `BTreeMap` iteration is already sorted by key.
#[must_use]
pub fn signable_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, _)| !UNSIGNED_PARAMS.contains(&key.as_str()))
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Returns `true` if `params["hmac"]` matches the signature computed with
/// `secret`. A callback without an `hmac` parameter does not validate.
#[must_use]
pub fn validate_hmac(params: &BTreeMap<String, String>, secret: &str) -> bool {
    let Some(received) = params.get("hmac") else {
        return false;
    };

    let computed = compute_signature(&signable_string(params), secret);
    constant_time_compare(&computed, received)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_compute_signature_known_vector() {
        // RFC 4231 test case 2
        let sig = compute_signature("what do ya want for nothing?", "Jefe");
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signable_string_sorts_and_excludes_hmac() {
        let p = params(&[
            ("timestamp", "1700000000"),
            ("shop", "test.myshopify.com"),
            ("hmac", "abc"),
            ("code", "xyz"),
        ]);
        assert_eq!(
            signable_string(&p),
            "code=xyz&shop=test.myshopify.com&timestamp=1700000000"
        );
    }

    #[test]
    fn test_validate_hmac_accepts_correct_signature() {
        let mut p = params(&[
            ("code", "auth-code"),
            ("shop", "test.myshopify.com"),
            ("timestamp", "1700000000"),
        ]);
        let signature = compute_signature(&signable_string(&p), "secret");
        p.insert("hmac".to_string(), signature);

        assert!(validate_hmac(&p, "secret"));
        assert!(!validate_hmac(&p, "other-secret"));
    }

    #[test]
    fn test_validate_hmac_rejects_tampering() {
        let mut p = params(&[("code", "auth-code"), ("shop", "test.myshopify.com")]);
        let signature = compute_signature(&signable_string(&p), "secret");
        p.insert("hmac".to_string(), signature);
        p.insert("shop".to_string(), "evil.myshopify.com".to_string());

        assert!(!validate_hmac(&p, "secret"));
    }

    #[test]
    fn test_validate_hmac_requires_parameter() {
        let p = params(&[("code", "auth-code")]);
        assert!(!validate_hmac(&p, "secret"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("state123", "state123"));
        assert!(!constant_time_compare("state123", "state124"));
        assert!(!constant_time_compare("short", "longer-value"));
    }
}
