//! The client handle and the generic typed request pipeline.
//!
//! Every resource operation funnels through one of [`DbClient::fetch`],
//! [`DbClient::create`], [`DbClient::replace`] or [`DbClient::remove`], which
//! share a single execute-and-decode path:
//!
//! 1. the request goes through the configured transport (a
//!    [`RetryingTransport`] around reqwest by default) under the per-call
//!    deadline;
//! 2. a transport failure is returned as [`Error::Transport`] untouched;
//! 3. `200 OK` is decoded as JSON into `T`, a malformed body becomes
//!    [`Error::Decode`];
//! 4. any other status becomes [`Error::Status`] via
//!    [`parse_error_response`].

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::http::{
    HttpRequest, ReqwestTransport, RetryingTransport, Transport, credential, parse_error_response,
    read_headers, write_headers,
};
use crate::resources::{Reader, Writer};

/// Concrete client shared by the read-only and read-write handles.
///
/// Holds one transport for its whole lifetime; nothing about a call is
/// stored on the client, so a single instance can serve concurrent callers.
pub struct DbClient {
    endpoint: Endpoint,
    credential: HeaderValue,
    timeout: Duration,
    transport: Box<dyn Transport>,
}

impl DbClient {
    /// Validates `config` and builds the reqwest-backed retrying transport.
    ///
    /// No network I/O happens here.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_transport_result(config, || {
            let http = Client::builder().build().map_err(Error::HttpClient)?;
            Ok(RetryingTransport::new(ReqwestTransport::new(http), config.retries))
        })
    }

    /// Validates `config` and uses `transport` as-is (no retry wrapping).
    pub fn with_transport<T>(config: &Config, transport: T) -> Result<Self>
    where
        T: Transport + 'static,
    {
        Self::with_transport_result(config, || Ok(transport))
    }

    fn with_transport_result<T, F>(config: &Config, make_transport: F) -> Result<Self>
    where
        T: Transport + 'static,
        F: FnOnce() -> Result<T>,
    {
        let version = config.validate()?;
        let endpoint = Endpoint::new(&config.base_url, version)?;
        let credential = credential(&config.api_key)?;
        let transport = make_transport()?;

        Ok(Self {
            endpoint,
            credential,
            timeout: config.timeout,
            transport: Box::new(transport),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn read_headers(&self) -> HeaderMap {
        read_headers(&self.credential)
    }

    pub fn write_headers(&self) -> HeaderMap {
        write_headers(&self.credential)
    }

    /// GET `url` and decode the body into `T`.
    #[tracing::instrument(skip(self, url, headers), fields(url = %url))]
    pub async fn fetch<T: DeserializeOwned>(&self, url: Url, headers: HeaderMap) -> Result<T> {
        let request = HttpRequest::new(Method::GET, url, headers);
        self.execute(request, decode_json).await
    }

    /// POST a pre-serialized `body` to `url` and decode the body into `T`.
    #[tracing::instrument(skip(self, url, headers, body), fields(url = %url))]
    pub async fn create<T: DeserializeOwned>(
        &self,
        url: Url,
        headers: HeaderMap,
        body: impl Into<Bytes>,
    ) -> Result<T> {
        let request = HttpRequest::new(Method::POST, url, headers).with_body(body);
        self.execute(request, decode_json).await
    }

    /// PUT a pre-serialized `body` to `url` and decode the body into `T`.
    #[tracing::instrument(skip(self, url, headers, body), fields(url = %url))]
    pub async fn replace<T: DeserializeOwned>(
        &self,
        url: Url,
        headers: HeaderMap,
        body: impl Into<Bytes>,
    ) -> Result<T> {
        let request = HttpRequest::new(Method::PUT, url, headers).with_body(body);
        self.execute(request, decode_json).await
    }

    /// DELETE `url` and decode the body into `T`.
    #[tracing::instrument(skip(self, url, headers), fields(url = %url))]
    pub async fn remove<T: DeserializeOwned>(&self, url: Url, headers: HeaderMap) -> Result<T> {
        let request = HttpRequest::new(Method::DELETE, url, headers);
        self.execute(request, decode_json).await
    }

    async fn execute<T, D>(&self, request: HttpRequest, decode: D) -> Result<T>
    where
        D: FnOnce(&[u8]) -> serde_json::Result<T>,
    {
        let response = tokio::time::timeout(self.timeout, self.transport.execute(request))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        if response.status != StatusCode::OK {
            return Err(parse_error_response(&response));
        }

        decode(&response.body).map_err(Error::Decode)
    }
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<T> {
    serde_json::from_slice(body)
}

/// Builds a client exposing reads and writes.
pub fn new_read_write(config: &Config) -> Result<Arc<dyn Writer>> {
    Ok(Arc::new(DbClient::new(config)?))
}

/// Builds a client that can only read.
pub fn new_read_only(config: &Config) -> Result<Arc<dyn Reader>> {
    Ok(Arc::new(DbClient::new(config)?))
}

/// Builds one client and returns it behind both capability handles.
pub fn new_clients(config: &Config) -> Result<(Arc<dyn Writer>, Arc<dyn Reader>)> {
    let client = Arc::new(DbClient::new(config)?);
    let writer: Arc<dyn Writer> = client.clone();
    let reader: Arc<dyn Reader> = client;
    Ok((writer, reader))
}
