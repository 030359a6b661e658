//! Axum application wiring.
//!
//! Layout of this folder:
//! - `services.rs`: shared state handed to handlers (the ledger)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: adjust request DTO and JSON mapping helpers
//! - `errors.rs`: the one error-response shape every handler uses
//! - `seed.rs`: optional demo catalog

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use stockbook_auth::Hs256TokenVerifier;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod seed;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(jwt_secret: String, seed_demo: bool) -> Router {
    let verifier = Arc::new(Hs256TokenVerifier::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { verifier };

    let services = Arc::new(services::build_services());
    if seed_demo {
        seed::seed_demo(&services);
    }

    // Protected routes: everything except the health endpoint.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/healthz", get(routes::system::healthz))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
