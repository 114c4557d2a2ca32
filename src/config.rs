//! Client configuration and the recognized API versions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const ENV_BASE_URL: &str = "PHD_BASE_URL";
pub const ENV_API_KEY: &str = "PHD_API_KEY";
pub const ENV_API_VERSION: &str = "PHD_API_VERSION";
pub const ENV_RETRIES: &str = "PHD_RETRIES";
pub const ENV_TIMEOUT_MS: &str = "PHD_TIMEOUT_MS";

/// Retries applied when none are configured.
pub const DEFAULT_RETRIES: u32 = 3;

/// Per-call deadline applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API versions the server is known to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
}

impl ApiVersion {
    pub const ALL: &'static [ApiVersion] = &[ApiVersion::V1];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ApiVersion::ALL
            .iter()
            .copied()
            .find(|version| version.as_str() == s)
            .ok_or_else(|| Error::UnsupportedVersion(s.to_string()))
    }
}

/// Settings consumed when building a client.
///
/// Loading a `Config` never validates it; [`Config::validate`] runs when a
/// client is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub version: String,
    pub retries: u32,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            version: String::new(),
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the configuration from `PHD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Missing keys keep their default value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            config.api_key = api_key;
        }
        if let Some(version) = lookup(ENV_API_VERSION) {
            config.version = version;
        }
        if let Some(retries) = lookup(ENV_RETRIES) {
            config.retries = parse_value(ENV_RETRIES, &retries)?;
        }
        if let Some(timeout_ms) = lookup(ENV_TIMEOUT_MS) {
            config.timeout = Duration::from_millis(parse_value(ENV_TIMEOUT_MS, &timeout_ms)?);
        }

        Ok(config)
    }

    /// Checks the required fields in order and resolves the API version.
    pub fn validate(&self) -> Result<ApiVersion> {
        if self.base_url.is_empty() {
            return Err(Error::MissingBaseUrl);
        }
        if self.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        if self.version.is_empty() {
            return Err(Error::MissingVersion);
        }
        self.version.parse()
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfigValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_validate_success() {
        let config = Config::new("https://db.example.com", "secret", "v1");
        assert_eq!(config.validate().unwrap(), ApiVersion::V1);
    }

    #[test]
    fn test_validate_missing_base_url() {
        let config = Config::new("", "secret", "v1");
        assert!(matches!(config.validate(), Err(Error::MissingBaseUrl)));
    }

    #[test]
    fn test_validate_missing_api_key() {
        let config = Config::new("https://db.example.com", "", "v1");
        assert!(matches!(config.validate(), Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_validate_missing_version() {
        let config = Config::new("https://db.example.com", "secret", "");
        assert!(matches!(config.validate(), Err(Error::MissingVersion)));
    }

    #[test]
    fn test_validate_unsupported_version() {
        let config = Config::new("https://db.example.com", "secret", "v2");
        match config.validate() {
            Err(Error::UnsupportedVersion(v)) => assert_eq!(v, "v2"),
            other => panic!("Expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_checks_fields_in_order() {
        // Everything is missing: the base URL is reported first.
        let config = Config::new("", "", "");
        assert!(matches!(config.validate(), Err(Error::MissingBaseUrl)));

        let config = Config::new("https://db.example.com", "", "bogus");
        assert!(matches!(config.validate(), Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_every_known_version_validates() {
        for version in ApiVersion::ALL {
            let config = Config::new("https://db.example.com", "secret", version.as_str());
            assert_eq!(config.validate().unwrap(), *version);
        }
    }

    #[test]
    fn test_api_version_display() {
        assert_eq!(ApiVersion::V1.to_string(), "v1");
        assert!("V1".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.retries, DEFAULT_RETRIES);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://localhost:8080"),
            (ENV_API_KEY, "key"),
            (ENV_API_VERSION, "v1"),
            (ENV_RETRIES, "5"),
            (ENV_TIMEOUT_MS, "1500"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            Config {
                base_url: "http://localhost:8080".to_string(),
                api_key: "key".to_string(),
                version: "v1".to_string(),
                retries: 5,
                timeout: Duration::from_millis(1500),
            }
        );
    }

    #[test]
    fn test_from_lookup_keeps_defaults() {
        let config = Config::from_lookup(lookup_from(&[(ENV_API_KEY, "key")])).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.retries, DEFAULT_RETRIES);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let result = Config::from_lookup(lookup_from(&[(ENV_RETRIES, "-1")]));
        match result {
            Err(Error::InvalidConfigValue { key, value }) => {
                assert_eq!(key, ENV_RETRIES);
                assert_eq!(value, "-1");
            }
            other => panic!("Expected InvalidConfigValue, got {:?}", other),
        }

        let result = Config::from_lookup(lookup_from(&[(ENV_TIMEOUT_MS, "soon")]));
        assert!(matches!(result, Err(Error::InvalidConfigValue { .. })));
    }
}
