//! Shopify Admin API version used by the diagnostic store-info call.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version.
///
/// Shopify names versions after their release quarter (`YYYY-MM`). The
/// `unstable` channel is accepted as well.
///
/// # Example
///
/// ```rust
/// use shopify_connect::ApiVersion;
///
/// let version: ApiVersion = "2024-10".parse().unwrap();
/// assert_eq!(version.to_string(), "2024-10");
/// assert_eq!(ApiVersion::default().to_string(), "2025-10");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    const DEFAULT: &'static str = "2025-10";

    fn is_valid_version_format(s: &str) -> bool {
        let Some((year, month)) = s.split_once('-') else {
            return false;
        };
        if year.len() != 4 || month.len() != 2 {
            return false;
        }
        if !year.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        matches!(month.parse::<u8>(), Ok(1..=12))
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "unstable" || Self::is_valid_version_format(&s) {
            Ok(Self(s))
        } else {
            Err(ConfigError::InvalidApiVersion { version: s })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_parses_quarterly_versions() {
        let version: ApiVersion = "2023-04".parse().unwrap();
        assert_eq!(version.to_string(), "2023-04");
    }

    #[test]
    fn test_api_version_accepts_unstable() {
        let version: ApiVersion = "Unstable".parse().unwrap();
        assert_eq!(version.to_string(), "unstable");
    }

    #[test]
    fn test_api_version_rejects_invalid() {
        assert!("2024".parse::<ApiVersion>().is_err());
        assert!("2024-13".parse::<ApiVersion>().is_err());
        assert!("24-01".parse::<ApiVersion>().is_err());
        assert!("latest".parse::<ApiVersion>().is_err());
        assert!(matches!(
            "v1".parse::<ApiVersion>(),
            Err(ConfigError::InvalidApiVersion { .. })
        ));
    }

    #[test]
    fn test_api_version_default() {
        assert_eq!(ApiVersion::default().to_string(), "2025-10");
    }
}
