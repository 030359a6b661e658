use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use stockbook_auth::Principal;
use stockbook_catalog::{ProductDraft, ProductPatch, StockStatus};
use stockbook_core::ProductId;
use stockbook_ledger::{Adjustment, MovementKind, ProductQuery};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

// ─────────────────────────────────────────────────────────────────────────────
// Query Parameters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/adjust", post(adjust_stock))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(draft): Json<ProductDraft>,
) -> axum::response::Response {
    if !principal.role.can_manage_products() {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "role cannot manage products");
    }

    match services.ledger().create_product(draft, &principal.name, Utc::now()) {
        Ok(product) => {
            (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ProductListQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref().map(str::parse::<StockStatus>).transpose() {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let filter = ProductQuery {
        search: query.search,
        category: query.category,
        status,
    };

    match services.ledger().products(&filter) {
        Ok(products) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "products": products.iter().map(dto::product_to_json).collect::<Vec<_>>(),
                "count": products.len(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger().product(id) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> axum::response::Response {
    if !principal.role.can_manage_products() {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "role cannot manage products");
    }

    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger().update_product(id, &patch, Utc::now()) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if !principal.role.can_delete_products() {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "role cannot delete products");
    }

    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger().delete_product(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let kind: MovementKind = match body.kind.parse() {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let adjustment = Adjustment {
        product_id: id,
        kind,
        quantity: body.quantity,
        occurred_at: Utc::now(),
    };

    match services.ledger().adjust(adjustment, &principal.name) {
        Ok(movement) => {
            (StatusCode::CREATED, Json(dto::movement_to_json(&movement))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

fn parse_product_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}
