use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use stockbook_auth::Principal;

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(serde_json::json!({
        "principal_id": principal.id.to_string(),
        "name": principal.name,
        "role": principal.role.as_str(),
    }))
}
