//! Response decoding shared by the async and blocking clients.

use crate::error::{Error, Result};
use crate::operation::Operation;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::Level;

/// Turn a status code and raw body into the parsed JSON value or an error.
///
/// A success status must carry valid JSON; an empty or non-JSON body is a
/// [`Error::MalformedResponse`]. Any other status becomes [`Error::Api`] with
/// the remote message when the body provides one.
///
/// # Errors
///
/// See above.
pub fn decode_response(operation: Operation, status: StatusCode, body: &[u8]) -> Result<Value> {
    if !status.is_success() {
        let error = Error::api(status.as_u16(), remote_message(body));
        log_failure(operation, &error);
        return Err(error);
    }

    serde_json::from_slice(body).map_err(|err| {
        let error = Error::MalformedResponse(format!(
            "Failed to parse response for `{operation}`: {err}"
        ));
        log_failure(operation, &error);
        error
    })
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `error` (string or object with `message`), then `message`.
#[must_use]
pub fn remote_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    let from_error = match value.get("error") {
        Some(Value::String(text)) => Some(text.as_str()),
        Some(Value::Object(map)) => map.get("message").and_then(Value::as_str),
        _ => None,
    };

    non_blank(from_error)
        .or_else(|| non_blank(value.get("message").and_then(Value::as_str)))
        .map(str::to_string)
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

/// Map a transport failure into an [`Error`] and log it.
#[must_use]
pub fn transport_error(operation: Operation, err: reqwest::Error) -> Error {
    let error = Error::from(err);
    log_failure(operation, &error);
    error
}

/// Level a failed call is logged at: `ERROR` for [`Error::should_log`],
/// `WARN` otherwise.
fn failure_level(error: &Error) -> Level {
    if error.should_log() {
        Level::ERROR
    } else {
        Level::WARN
    }
}

fn log_failure(operation: Operation, error: &Error) {
    if failure_level(error) == Level::ERROR {
        tracing::error!(operation = %operation, code = error.error_code(), error = %error, "24Fire request failed");
    } else {
        tracing::warn!(
            operation = %operation,
            code = error.error_code(),
            status = error.status(),
            error = %error,
            "24Fire request failed"
        );
    }
}
