/**
 * Application State Management
 *
 * Defines the application state structure and implements the `FromRef`
 * traits Axum uses to extract specific parts of the state in handlers.
 *
 * # Thread Safety
 *
 * - `PgPool` is internally shared and cheap to clone
 * - `broadcast::Sender` is thread-safe and can be cloned
 * - `AiGateway` wraps a `reqwest::Client`, which is an `Arc` internally
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::ai::gateway::AiGateway;
use crate::realtime::broadcast::ChangeBroadcast;

/// Central state container for the Axum application
///
/// Handlers extract the parts they need via `FromRef` rather than
/// taking the whole state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` if the database is not configured (`DATABASE_URL` unset).
    /// Handlers check for `None` and answer 503 in that case.
    pub db_pool: Option<PgPool>,

    /// Broadcast channel for row-change events
    ///
    /// Every successful message write publishes a `ChangeEvent` here;
    /// SSE subscribers re-fetch the affected conversation on receipt.
    pub change_broadcast: ChangeBroadcast,

    /// Client for the external AI gateway
    pub ai: AiGateway,
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for ChangeBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.change_broadcast.clone()
    }
}

impl FromRef<AppState> for AiGateway {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ai.clone()
    }
}
