//! Endpoint URLs: base URL + API version + resource path.

use reqwest::Url;

use crate::config::ApiVersion;
use crate::error::{Error, Result};

/// Versioned root every resource path is appended to.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    root: Url,
}

impl Endpoint {
    pub fn new(base_url: &str, version: ApiVersion) -> Result<Self> {
        let mut root = Url::parse(base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if root.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        root.set_query(None);
        root.set_fragment(None);

        let mut endpoint = Self { root };
        endpoint.root = endpoint.url(&[version.as_str()]);
        Ok(endpoint)
    }

    /// Appends path segments to the versioned root, percent-encoding each one.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Same as [`Endpoint::url`] with query parameters appended.
    pub fn url_with_query(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.url(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    pub fn root(&self) -> &Url {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_includes_version() {
        let endpoint = Endpoint::new("https://db.example.com", ApiVersion::V1).unwrap();
        assert_eq!(endpoint.root().as_str(), "https://db.example.com/v1");
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let endpoint = Endpoint::new("https://db.example.com/", ApiVersion::V1).unwrap();
        assert_eq!(
            endpoint.url(&["blockchain"]).as_str(),
            "https://db.example.com/v1/blockchain"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let endpoint = Endpoint::new("http://localhost:8080/db/", ApiVersion::V1).unwrap();
        assert_eq!(
            endpoint.url(&["user", "42", "application"]).as_str(),
            "http://localhost:8080/db/v1/user/42/application"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let endpoint = Endpoint::new("https://db.example.com", ApiVersion::V1).unwrap();
        assert_eq!(
            endpoint.url(&["application", "a/b c"]).as_str(),
            "https://db.example.com/v1/application/a%2Fb%20c"
        );
    }

    #[test]
    fn test_query() {
        let endpoint = Endpoint::new("https://db.example.com", ApiVersion::V1).unwrap();
        assert_eq!(
            endpoint
                .url_with_query(&["user", "7", "load_balancer"], &[("filter", "ADMIN")])
                .as_str(),
            "https://db.example.com/v1/user/7/load_balancer?filter=ADMIN"
        );
        assert_eq!(
            endpoint.url_with_query(&["pay_plan"], &[]).as_str(),
            "https://db.example.com/v1/pay_plan"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            Endpoint::new("not a url", ApiVersion::V1),
            Err(Error::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            Endpoint::new("mailto:db@example.com", ApiVersion::V1),
            Err(Error::InvalidBaseUrl(_))
        ));
    }
}
