//! Campus Web Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! `kernel::error::AppError` and the flash-message flow.

use accounts::{AccountsConfig, PgAccountsRepository, accounts_router};
use axum::{Router, routing::get};
use base64::Engine;
use base64::engine::general_purpose;
use contact::{PgContactRepository, contact_router};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod pages;

use pages::{AppEnv, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "web=info,accounts=info,contact=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_env = AppEnv::from_env_var(&env::var("APP_ENV").unwrap_or_default());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()?;

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../database/migrations").run(&pool).await?;

    tracing::info!("Migrations completed");

    let repo = PgAccountsRepository::new(pool.clone());

    // Startup cleanup: remove expired sessions.
    // Errors here should not prevent server startup.
    match repo.sweep_expired_sessions().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // Accounts configuration
    let accounts_config = if app_env.is_development() {
        AccountsConfig::development()
    } else {
        // In production, load the session secret from the environment
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        if secret_bytes.len() != 32 {
            anyhow::bail!("SESSION_SECRET must decode to exactly 32 bytes");
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);

        let password_pepper = env::var("PASSWORD_PEPPER").ok().map(|p| p.into_bytes());

        AccountsConfig {
            session_secret: secret,
            password_pepper,
            ..AccountsConfig::default()
        }
    };

    let contact_repo = PgContactRepository::new(pool.clone());

    let app_state = AppState {
        repo: Arc::new(repo.clone()),
        config: Arc::new(accounts_config.clone()),
        env: app_env,
    };

    // Build router
    let site = Router::new()
        .route("/", get(pages::home))
        .route("/test-error", get(pages::test_error))
        .fallback(pages::not_found)
        .with_state(app_state);

    let app = Router::new()
        .merge(site)
        .merge(accounts_router(repo.clone(), accounts_config.clone()))
        .merge(contact_router(contact_repo, repo, accounts_config))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
