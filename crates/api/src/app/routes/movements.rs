use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use stockbook_ledger::{MovementKind, MovementQuery};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

// ─────────────────────────────────────────────────────────────────────────────
// Query Parameters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MovementListQuery {
    pub search: Option<String>,
    pub kind: Option<String>,
    pub recorded_by: Option<String>,
    /// Inclusive start date (`YYYY-MM-DD`), compared against the UTC day.
    pub from: Option<NaiveDate>,
    /// Inclusive end date (`YYYY-MM-DD`).
    pub to: Option<NaiveDate>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new().route("/", get(list_movements))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<MovementListQuery>,
) -> axum::response::Response {
    let kind = match query.kind.as_deref().map(str::parse::<MovementKind>).transpose() {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let filter = MovementQuery {
        search: query.search,
        kind,
        recorded_by: query.recorded_by,
        from: query.from,
        to: query.to,
    };

    match services.ledger().movements(&filter) {
        Ok(movements) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "movements": movements.iter().map(dto::movement_to_json).collect::<Vec<_>>(),
                "count": movements.len(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
