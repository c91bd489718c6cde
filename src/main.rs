use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use storefront_identity::auth::TokenService;
use storefront_identity::config::{self, Environment};
use storefront_identity::database::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use storefront_identity::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting storefront identity API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set; refusing to issue unsigned tokens");
    }

    let store = build_store(config).await?;
    let state = AppState::new(store, TokenService::from_config());
    let app = app(state);

    // Allow deployments to override port via env
    let port = std::env::var("STOREFRONT_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn build_store(
    config: &config::AppConfig,
) -> anyhow::Result<Arc<dyn CredentialStore>> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(
                    config.database.connection_timeout,
                ))
                .connect(&url)
                .await
                .context("failed to connect to DATABASE_URL")?;

            let store = PgCredentialStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to ensure identities schema")?;

            Ok(Arc::new(store))
        }
        Err(_) if config.environment == Environment::Development => {
            tracing::warn!("DATABASE_URL not set; using in-memory credential store (development only)");
            Ok(Arc::new(MemoryCredentialStore::new()))
        }
        Err(_) => anyhow::bail!("DATABASE_URL must be set outside development"),
    }
}
