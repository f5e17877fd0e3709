use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::error::InventoryError;

/// Status for a failed command. Storage failures are reported to the
/// caller as bad requests with the raw message.
pub fn command_status(err: &InventoryError) -> StatusCode {
    match err {
        InventoryError::Validation(_) | InventoryError::Operation(_) => StatusCode::BAD_REQUEST,
        InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

/// `{success: false, error}` body for the JSON command endpoints.
pub fn command_failure(err: InventoryError) -> Response {
    warn!(error = %err, "inventory command failed");
    let status = command_status(&err);
    json_failure(status, err.to_string())
}

pub fn json_failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.into(),
        })),
    )
        .into_response()
}

/// Plain-text failure for the HTML form endpoints.
pub fn form_failure(err: InventoryError) -> Response {
    warn!(error = %err, "inventory form submission failed");
    (command_status(&err), format!("Error: {err}")).into_response()
}

/// Read endpoints have no validation path; anything reaching here is a
/// storage failure.
pub fn query_failure(err: InventoryError) -> Response {
    warn!(error = %err, "inventory query failed");
    let status = match err {
        InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
