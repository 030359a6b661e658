use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{FixedOffset, Utc};
use serde::Deserialize;

use stockbook_ledger::{MovementQuery, ProductQuery};
use stockbook_reports::{daily_activity, inventory_summary, low_stock_alerts};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

const DEFAULT_ACTIVITY_DAYS: u32 = 7;
/// Largest chart window offered anywhere (one year).
const MAX_ACTIVITY_DAYS: u32 = 365;

// ─────────────────────────────────────────────────────────────────────────────
// Query Parameters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ActivityReportQuery {
    pub days: Option<u32>,
    /// Viewer timezone as minutes east of UTC (e.g. 120 for UTC+2). Buckets
    /// are calendar days in this zone.
    pub tz_offset_minutes: Option<i32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/activity", get(activity))
        .route("/alerts", get(alerts))
        .route("/summary", get(summary))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

pub async fn activity(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ActivityReportQuery>,
) -> axum::response::Response {
    let days = query
        .days
        .unwrap_or(DEFAULT_ACTIVITY_DAYS)
        .min(MAX_ACTIVITY_DAYS);

    let offset_minutes = query.tz_offset_minutes.unwrap_or(0);
    let Some(offset) = offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
    else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "tz_offset_minutes out of range",
        );
    };

    let movements = match services.ledger().movements(&MovementQuery::default()) {
        Ok(m) => m,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let buckets = daily_activity(&movements, days, Utc::now().with_timezone(&offset));
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "days": days,
            "buckets": buckets.iter().map(dto::activity_bucket_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

pub async fn alerts(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let products = match services.ledger().products(&ProductQuery::default()) {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let alerts = low_stock_alerts(&products);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "alerts": alerts.iter().map(dto::alert_to_json).collect::<Vec<_>>(),
            "count": alerts.len(),
        })),
    )
        .into_response()
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let products = match services.ledger().products(&ProductQuery::default()) {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let summary = inventory_summary(&products);
    (StatusCode::OK, Json(dto::summary_to_json(&summary))).into_response()
}
