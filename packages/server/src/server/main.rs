// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use events_core::kernel::{CloudinaryImageHost, Database, ServerDeps, SmtpMailer};
use events_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SENDER_NAME: &str = "Dev Events";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,events_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Dev Events API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect and migrate; the handle is shared by every request afterwards
    let db = Arc::new(Database::new(
        config.database_url.clone(),
        config.database_max_connections,
    ));
    tracing::info!("Running database migrations...");
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let mailer = SmtpMailer::new(
        config.smtp_host.clone(),
        config.smtp_port,
        config.email_user.clone(),
        config.email_pass.clone(),
        &config.mail_from,
        SENDER_NAME,
    )
    .context("Failed to configure SMTP mailer")?;

    let image_host = CloudinaryImageHost::new(
        config.cloudinary_cloud_name.clone(),
        config.cloudinary_api_key.clone(),
        config.cloudinary_api_secret.clone(),
        config.cloudinary_folder.clone(),
    );

    if config.posthog_key.is_none() {
        tracing::debug!("POSTHOG_KEY not set; client analytics disabled");
    }

    let deps = ServerDeps::new(db.clone(), Arc::new(mailer), Arc::new(image_host));
    let app = build_app(deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
