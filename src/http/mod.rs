//! HTTP plumbing: transport seam, retry layer, headers and error-response parsing.

mod error_response;
mod headers;
mod retry;
mod transport;

pub use error_response::parse_error_response;
pub use headers::{credential, read_headers, write_headers};
pub use retry::{BACKOFF_UNIT_MS, RetryingTransport, backoff_delay};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

#[cfg(test)]
pub use transport::MockTransport;
