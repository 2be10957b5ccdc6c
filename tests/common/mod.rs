//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use studyhub::ai::gateway::AiGateway;
use studyhub::auth::sessions::create_token;
use studyhub::realtime::broadcast::ChangeEvent;
use studyhub::routes::router::create_router;
use studyhub::server::config::AiConfig;
use studyhub::server::state::AppState;

pub mod database;

/// Build a test server without a database, pointing the AI gateway at
/// the given URL (usually a wiremock server).
pub fn test_server_with_gateway(gateway_url: &str) -> TestServer {
    let ai = AiGateway::new(AiConfig {
        gateway_url: gateway_url.to_string(),
        api_key: Some("test-key".to_string()),
        model: "test-model".to_string(),
    });

    let (change_broadcast, _) = broadcast::channel::<ChangeEvent>(16);

    let app = create_router(AppState {
        db_pool: None,
        change_broadcast,
        ai,
    });

    TestServer::new(app).expect("failed to start test server")
}

/// Build a test server with neither database nor AI key.
pub fn test_server() -> TestServer {
    let ai = AiGateway::new(AiConfig {
        gateway_url: "http://127.0.0.1:1/unreachable".to_string(),
        api_key: None,
        model: "test-model".to_string(),
    });

    let (change_broadcast, _) = broadcast::channel::<ChangeEvent>(16);

    let app = create_router(AppState {
        db_pool: None,
        change_broadcast,
        ai,
    });

    TestServer::new(app).expect("failed to start test server")
}

/// Build a test server wired to a real database pool, for the
/// `#[ignore]`d suites that exercise handlers end to end.
pub fn test_server_with_db(pool: PgPool) -> TestServer {
    let ai = AiGateway::new(AiConfig {
        gateway_url: "http://127.0.0.1:1/unreachable".to_string(),
        api_key: None,
        model: "test-model".to_string(),
    });

    let (change_broadcast, _) = broadcast::channel::<ChangeEvent>(16);

    let app = create_router(AppState {
        db_pool: Some(pool),
        change_broadcast,
        ai,
    });

    TestServer::new(app).expect("failed to start test server")
}

/// Mint a bearer token for an arbitrary user.
///
/// With no database configured the middleware skips the existence
/// check, so any well-formed token authenticates.
pub fn bearer_token(user_id: Uuid, username: &str) -> String {
    create_token(user_id, username.to_string()).expect("failed to create token")
}
