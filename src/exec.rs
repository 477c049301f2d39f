//! Response envelope handling for the HTTP transport.

use serde_json::Value;

use crate::error::{MAX_ERROR_BODY_CHARS, Result, StsError, truncate_str};
use crate::operation::Operation;
use crate::response::ApiErrorResponse;
use crate::transport::RawOutput;

/// Unwraps `{"<Action>Response": {"<Action>Result": .., "ResponseMetadata": ..}}`.
pub(crate) fn parse_success_response(operation: Operation, text: &str) -> Result<RawOutput> {
    let mut envelope: Value = serde_json::from_str(text)?;
    let action = operation.action();

    let Some(response) = envelope.get_mut(format!("{}Response", action)) else {
        return Err(StsError::Http(format!(
            "response is missing {}Response: {}",
            action,
            truncate_str(text, MAX_ERROR_BODY_CHARS)
        )));
    };

    let request_id = response
        .pointer("/ResponseMetadata/RequestId")
        .and_then(Value::as_str)
        .map(str::to_string);

    // Operations with no output fields may omit the result or send null.
    let result = match response.get_mut(format!("{}Result", action)) {
        Some(result) if !result.is_null() => result.take(),
        _ => Value::Object(Default::default()),
    };

    Ok(RawOutput { request_id, result })
}

/// Parses an error response body and returns the matching StsError.
pub(crate) fn parse_error_response(status: reqwest::StatusCode, text: &str) -> StsError {
    match serde_json::from_str::<ApiErrorResponse>(text) {
        Ok(api_err) => StsError::Api {
            request_id: api_err.request_id,
            code: api_err.error.code,
            message: api_err.error.message,
            kind: api_err.error.kind,
        },
        Err(_) => StsError::Http(format!(
            "HTTP {} with body: {}",
            status,
            truncate_str(text, MAX_ERROR_BODY_CHARS)
        )),
    }
}

/// Handles response parsing for both success and error cases.
pub(crate) fn handle_response(
    operation: Operation,
    status: reqwest::StatusCode,
    text: &str,
) -> Result<RawOutput> {
    if status.is_success() {
        parse_success_response(operation, text)
    } else {
        Err(parse_error_response(status, text))
    }
}
