//! SmartBrief API server.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use smartbrief::adapters::auth::{Argon2PasswordHasher, JwtTokenService};
use smartbrief::adapters::clock::SystemClock;
use smartbrief::adapters::email::WebhookEmailSender;
use smartbrief::adapters::http::{app_router, AppPorts, AppSettings, AppState};
use smartbrief::adapters::postgres::{
    PostgresFavoriteRepository, PostgresUserRepository, PostgresViewHistoryRepository,
    PostgresWebhookEventRepository, PostgresWorkRepository,
};
use smartbrief::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use smartbrief::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config);

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    if config.database.run_migrations {
        info!("running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let payments = StripePaymentAdapter::new(
        StripeConfig::new(config.payment.stripe_api_key.clone())
            .with_base_url(config.payment.api_base_url.clone()),
    );

    let ports = AppPorts {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        works: Arc::new(PostgresWorkRepository::new(pool.clone())),
        views: Arc::new(PostgresViewHistoryRepository::new(pool.clone())),
        favorites: Arc::new(PostgresFavoriteRepository::new(pool.clone())),
        webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool.clone())),
        tokens: Arc::new(JwtTokenService::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expiry(),
        )),
        passwords: Arc::new(Argon2PasswordHasher::new()),
        email: Arc::new(WebhookEmailSender::new(
            config.email.verification_webhook_url.clone(),
            config.email.password_reset_webhook_url.clone(),
        )),
        payments: Arc::new(payments),
        clock: Arc::new(SystemClock),
    };
    let settings = AppSettings::from_config(&config).context("invalid limits")?;
    let app = app_router(AppState::new(ports, settings));

    let addr = config.server.socket_addr().context("invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, environment = ?config.server.environment, "smartbrief listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// JSON lines in production, human-readable output elsewhere.
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
