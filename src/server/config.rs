/**
 * Server Configuration
 *
 * Loads server configuration from environment variables, with sensible
 * defaults for local development where possible.
 *
 * Configuration errors are logged but do not prevent server startup.
 * If the database cannot be reached the pool is set to `None` and the
 * persistence-backed routes respond with 503 until it comes back.
 */

use sqlx::PgPool;

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<PgPool>;

/// Settings for the external AI gateway
///
/// The gateway speaks the OpenAI-style chat-completions protocol. The
/// API key is required for any AI route to work; without it the AI
/// handlers return an upstream-configuration error.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the chat-completions endpoint
    pub gateway_url: String,
    /// Bearer token for the gateway
    pub api_key: Option<String>,
    /// Model identifier passed through on every request
    pub model: String,
}

impl AiConfig {
    /// Load AI gateway settings from the environment
    pub fn from_env() -> Self {
        let gateway_url = std::env::var("AI_GATEWAY_URL")
            .unwrap_or_else(|_| "https://ai.gateway.lovable.dev/v1/chat/completions".to_string());
        let api_key = std::env::var("AI_GATEWAY_API_KEY").ok();
        let model =
            std::env::var("AI_MODEL").unwrap_or_else(|_| "google/gemini-2.5-flash".to_string());

        if api_key.is_none() {
            tracing::warn!("AI_GATEWAY_API_KEY not set. AI endpoints will be disabled.");
        }

        Self {
            gateway_url,
            api_key,
            model,
        }
    }
}

/// Load and initialize the database connection pool
///
/// Reads `DATABASE_URL`, creates a PostgreSQL connection pool, and runs
/// the migrations in `./migrations`.
///
/// Returns `None` if `DATABASE_URL` is not set or the connection fails,
/// allowing the server to start without database features.
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
