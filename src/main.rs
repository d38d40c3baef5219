//! saferound-api server entry point.
//!
//! Owns the lifecycle of the long-lived collaborators (store, HTTP client)
//! and starts the Axum HTTP server.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use saferound_api::api;
use saferound_api::app_state::AppState;
use saferound_api::config::ApiConfig;
use saferound_api::persistence::{DrinkStore, InMemoryStore, PostgresStore};
use saferound_api::upstream::{GeminiHttpClient, GenerativeClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ApiConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(addr = %config.listen_addr, "starting saferound-api");

    // Store
    let postgres = if config.persistence_enabled {
        let store = PostgresStore::connect(&config).await?;
        store.ensure_schema().await?;
        tracing::info!("connected to PostgreSQL");
        Some(store)
    } else {
        tracing::warn!("persistence disabled, using in-memory store");
        None
    };
    let store: Arc<dyn DrinkStore> = match &postgres {
        Some(pg) => Arc::new(pg.clone()),
        None => {
            let memory = InMemoryStore::new();
            if let Some(path) = &config.seed_users_file {
                let loaded = memory.seed_from_file(path).await?;
                tracing::info!(loaded, path = %path.display(), "seeded users");
            }
            Arc::new(memory)
        }
    };

    // Upstream AI client
    let client: Arc<dyn GenerativeClient> = Arc::new(GeminiHttpClient::new(
        config.sobriety.base_url.clone(),
        config.sobriety.request_timeout,
    )?);
    let app_state = AppState::new(store, client, &config.sobriety, config.cooldown_seconds);
    if !app_state.sobriety.is_configured() {
        tracing::warn!("GEMINI_API_KEY not set, sobriety assessment will use defaults");
    }
    tracing::info!(
        cooldown_secs = app_state.drink_validation.cooldown().num_seconds(),
        "drink validation ready"
    );

    // Build router
    let app = api::build_router();
    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::doc::ApiDoc::openapi()),
        )
    };
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = postgres {
        pg.close().await;
    }
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
