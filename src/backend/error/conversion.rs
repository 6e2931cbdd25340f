/**
 * Error Conversion
 *
 * Renders backend errors as HTTP responses and as socket `error` events.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "recipient not found",
 *   "status": 404
 * }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;
use crate::shared::ServerEvent;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_infrastructure() {
            tracing::error!("[Http] Request failed: {}", self);
        } else {
            tracing::debug!("[Http] Request rejected: {}", self);
        }

        let body = serde_json::json!({
            "error": self.client_message(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<&BackendError> for ServerEvent {
    fn from(error: &BackendError) -> Self {
        ServerEvent::error(error.client_message())
    }
}
