//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL of the marketplace API, e.g.
/// `https://api.example.com/api/v1`.
///
/// Must use HTTPS, except for localhost where HTTP is allowed for
/// development. The trailing slash is normalized away so endpoint paths
/// (which always start with `/`) can be appended directly.
///
/// # Example
///
/// ```
/// use courseware_core::ApiUrl;
///
/// let api = ApiUrl::new("https://learn.example.com/api/v1/").unwrap();
/// assert_eq!(
///     api.resolve("/accounts/login/").unwrap().as_str(),
///     "https://learn.example.com/api/v1/accounts/login/"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let mut url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        if url.query().is_some() || url.fragment().is_some() {
            return Err(InvalidInputError::ApiUrl {
                value: s.to_string(),
                reason: "must not carry a query or fragment".to_string(),
            }
            .into());
        }

        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);

        Ok(Self(url))
    }

    /// Resolve an endpoint path (or a same-origin absolute URL) to a full URL.
    ///
    /// Absolute URLs appear in paginated responses as `next`/`previous`
    /// links. They are accepted only when they point at this API's origin so
    /// that a bearer token is never sent to another host.
    pub fn resolve(&self, path: &str) -> Result<Url, Error> {
        if path.starts_with("http://") || path.starts_with("https://") {
            let url = Url::parse(path).map_err(|e| InvalidInputError::Path {
                value: path.to_string(),
                reason: e.to_string(),
            })?;
            if url.origin() != self.0.origin() {
                return Err(InvalidInputError::Path {
                    value: path.to_string(),
                    reason: format!("must be on the API origin {}", self.origin_str()),
                }
                .into());
            }
            return Ok(url);
        }

        if !path.starts_with('/') {
            return Err(InvalidInputError::Path {
                value: path.to_string(),
                reason: "must start with '/'".to_string(),
            }
            .into());
        }

        let base = self.0.as_str().trim_end_matches('/');
        Url::parse(&format!("{}{}", base, path)).map_err(|e| {
            InvalidInputError::Path {
                value: path.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn origin_str(&self) -> String {
        self.0.origin().ascii_serialization()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for localhost)
        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_local_host(url)) {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn is_local_host(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]")
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let api = ApiUrl::new("https://learn.example.com/api/v1").unwrap();
        assert_eq!(api.host(), Some("learn.example.com"));
        assert!(!is_local_host(api.as_url()));
    }

    #[test]
    fn valid_localhost_http() {
        let api = ApiUrl::new("http://localhost:8000/api/v1").unwrap();
        assert!(is_local_host(api.as_url()));
    }

    #[test]
    fn resolves_paths_under_the_base_path() {
        let api = ApiUrl::new("https://learn.example.com/api/v1/").unwrap();
        assert_eq!(
            api.resolve("/courses/courses/").unwrap().as_str(),
            "https://learn.example.com/api/v1/courses/courses/"
        );
    }

    #[test]
    fn resolves_paths_at_root() {
        let api = ApiUrl::new("https://learn.example.com").unwrap();
        assert_eq!(
            api.resolve("/accounts/login/").unwrap().as_str(),
            "https://learn.example.com/accounts/login/"
        );
    }

    #[test]
    fn accepts_same_origin_absolute_links() {
        let api = ApiUrl::new("https://learn.example.com/api/v1").unwrap();
        let next = "https://learn.example.com/api/v1/courses/courses/?page=2";
        assert_eq!(api.resolve(next).unwrap().as_str(), next);
    }

    #[test]
    fn rejects_foreign_absolute_links() {
        let api = ApiUrl::new("https://learn.example.com/api/v1").unwrap();
        assert!(api.resolve("https://evil.example.net/steal").is_err());
    }

    #[test]
    fn rejects_relative_paths_without_slash() {
        let api = ApiUrl::new("https://learn.example.com/api/v1").unwrap();
        assert!(api.resolve("courses/").is_err());
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ApiUrl::new("http://learn.example.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ApiUrl::new("/api/v1").is_err());
    }

    #[test]
    fn invalid_query() {
        assert!(ApiUrl::new("https://learn.example.com/api?x=1").is_err());
    }
}
