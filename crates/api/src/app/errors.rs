use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockbook_core::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        LedgerError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        LedgerError::InsufficientStock { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_stock", err.to_string())
        }
        LedgerError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        LedgerError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        LedgerError::Unauthorized => json_error(StatusCode::FORBIDDEN, "forbidden", "unauthorized"),
        LedgerError::Transport(msg) => json_error(StatusCode::BAD_GATEWAY, "transport_error", msg),
        LedgerError::Internal(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
