// src/bin/api_server.rs

use customer_update_service::transport;
use customer_update_service::{build_customer_service, AppConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Configuration ---
    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(
        environment = %config.environment,
        version = %config.version,
        "configuration loaded"
    );

    // --- Service Initialization ---
    let customers = Arc::new(build_customer_service(&config).await?);
    let app_state = transport::http::AppState {
        customers,
        config: config.clone(),
    };

    // --- API Server Initialization ---
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(transport::http::cors_layer(&config));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("API server listening on http://{}", config.bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
