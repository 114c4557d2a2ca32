//! Header sets attached to read and write requests.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::{Error, Result};

/// Turns an API key into a sensitive `Authorization` header value.
pub fn credential(api_key: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Headers for requests that only read.
pub fn read_headers(credential: &HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, credential.clone());
    headers
}

/// Read headers plus the JSON content type.
pub fn write_headers(credential: &HeaderValue) -> HeaderMap {
    let mut headers = read_headers(credential);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_headers() {
        let key = credential("secret-key").unwrap();
        let headers = read_headers(&key);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "secret-key");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_write_headers() {
        let key = credential("secret-key").unwrap();
        let headers = write_headers(&key);

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "secret-key");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_credential_rejects_control_characters() {
        assert!(matches!(credential("bad\nkey"), Err(Error::InvalidApiKey)));
    }
}
