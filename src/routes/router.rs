/**
 * Router Assembly
 *
 * Merges the public and protected route tables, applies the
 * authentication middleware to the protected side only, and layers
 * CORS and request tracing over the whole app.
 */

use axum::{http::StatusCode, middleware, response::IntoResponse, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::auth::auth_middleware;
use crate::routes::api_routes::{protected_routes, public_routes};
use crate::server::state::AppState;

/// Build the complete application router
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = protected_routes().layer(middleware::from_fn_with_state(
        app_state.clone(),
        auth_middleware,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(public_routes())
        .merge(protected)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "مسیر درخواستی وجود ندارد",
            "status": 404
        })),
    )
}
