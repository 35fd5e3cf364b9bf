use std::sync::Arc;
use std::time::Duration;

use ideaforge_clients::checkout::{CheckoutConfig, StripeCheckout};
use ideaforge_clients::generation::{GenerationApi, GenerationConfig};
use ideaforge_core::generator::GeneratorConfig;
use ideaforge_core::quota::QuotaPolicy;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ideaforge_api::config::ServerConfig;
use ideaforge_api::router::build_app_router;
use ideaforge_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ideaforge_api=debug,ideaforge_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let quota_policy = QuotaPolicy::from_env();
    let generator_config = GeneratorConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        free_baseline = quota_policy.free_baseline,
        max_prompt_chars = generator_config.max_prompt_chars,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = ideaforge_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    ideaforge_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    ideaforge_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External services ---
    let generation = GenerationApi::new(GenerationConfig::from_env())
        .expect("Failed to build generation client");
    let payments = StripeCheckout::new(CheckoutConfig::from_env());

    // --- App state ---
    let addr = config.bind_addr().expect("Invalid HOST address");
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let state = AppState::new(
        pool.clone(),
        config,
        Arc::new(generation),
        Arc::new(payments),
        quota_policy,
        generator_config,
    );
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("Server stopped accepting connections, closing database pool");
    if tokio::time::timeout(shutdown_timeout, pool.close()).await.is_err() {
        tracing::warn!("Database pool did not close within the shutdown timeout");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
