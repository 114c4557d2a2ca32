//! Outbound/inbound request types and the transport seam the retry layer wraps.

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode, Url};

use crate::error::TransportError;

/// A fully formed request: absolute URL, headers and an optional body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url, headers: HeaderMap) -> Self {
        Self {
            method,
            url,
            headers,
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A response read fully into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Performs one HTTP exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!("Received {} ({} bytes)", status, body.len());

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{CONTENT_TYPE, HeaderValue};

    #[tokio::test]
    async fn test_execute_get() {
        let mut server = mockito::Server::new_async().await;
        let url = Url::parse(&format!("{}/v1/blockchain", server.url())).unwrap();

        let mock = server
            .mock("GET", "/v1/blockchain")
            .with_status(200)
            .with_header("x-request-id", "abc")
            .with_body("[]")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Client::new());
        let response = transport
            .execute(HttpRequest::new(Method::GET, url, HeaderMap::new()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.as_ref(), b"[]");
        assert_eq!(response.headers.get("x-request-id").unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_execute_sends_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let url = Url::parse(&format!("{}/v1/application", server.url())).unwrap();

        let mock = server
            .mock("POST", "/v1/application")
            .match_header("content-type", "application/json")
            .match_body(r#"{"name":"app"}"#)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let transport = ReqwestTransport::new(Client::new());
        let request =
            HttpRequest::new(Method::POST, url, headers).with_body(r#"{"name":"app"}"#.as_bytes());
        let response = transport.execute(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_execute_returns_error_statuses_as_responses() {
        let mut server = mockito::Server::new_async().await;
        let url = Url::parse(&format!("{}/v1/pay_plan", server.url())).unwrap();

        let _mock = server
            .mock("GET", "/v1/pay_plan")
            .with_status(503)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Client::new());
        let response = transport
            .execute(HttpRequest::new(Method::GET, url, HeaderMap::new()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_execute_connection_refused() {
        // Port 1 is reserved and never listening in test environments.
        let url = Url::parse("http://127.0.0.1:1/v1/blockchain").unwrap();

        let transport = ReqwestTransport::new(Client::new());
        let result = transport
            .execute(HttpRequest::new(Method::GET, url, HeaderMap::new()))
            .await;

        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
