/**
 * Server Initialization
 *
 * Builds the application state and assembles the router. Missing
 * services (database, AI key) are logged and disabled rather than
 * aborting startup.
 */

use axum::Router;
use tokio::sync::broadcast;

use crate::ai::gateway::AiGateway;
use crate::realtime::broadcast::ChangeEvent;
use crate::routes::router::create_router;
use crate::server::config::{load_database, AiConfig};
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// 1. Loads the database pool (and runs migrations) if configured
/// 2. Builds the AI gateway client from environment settings
/// 3. Creates the change-event broadcast channel
/// 4. Assembles the router with all routes and middleware
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing StudyHub backend server");

    let db_pool = load_database().await;

    let ai = AiGateway::new(AiConfig::from_env());

    // Capacity of 1000 is generous for human-paced chat traffic; lagged
    // subscribers skip ahead and re-fetch, so overflow is not fatal.
    let (change_broadcast, _) = broadcast::channel::<ChangeEvent>(1000);

    let app_state = AppState {
        db_pool,
        change_broadcast,
        ai,
    };

    tracing::info!("Application state initialized");

    create_router(app_state)
}
