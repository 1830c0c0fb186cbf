use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::activity;
use super::admin;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;

/// Create the full router with application state
///
/// The admin routes are only mounted when `admin_enabled` is set.
pub fn create_router_with_state(state: AppState, admin_enabled: bool) -> Router {
    let mut router = Router::new()
        // Health endpoints (no state needed)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", activity::create_activity_router());

    if admin_enabled {
        router = router.nest("/admin", admin::create_admin_router());
    }

    router
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
