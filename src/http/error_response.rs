//! Converts non-success responses into [`Error::Status`].

use std::collections::HashMap;

use super::transport::HttpResponse;
use crate::error::Error;

/// Key the server uses for its error message.
const ERROR_KEY: &str = "error";

/// Builds the status error for a non-success response.
///
/// The server message is taken from an `{"error": "..."}` body when the body
/// is a flat string map. Anything else (empty body, HTML, nested values)
/// degrades to the bare status.
pub fn parse_error_response(response: &HttpResponse) -> Error {
    let message = serde_json::from_slice::<HashMap<String, String>>(&response.body)
        .ok()
        .and_then(|mut fields| fields.remove(ERROR_KEY));

    Error::Status {
        status: response.status,
        message,
    }
}
