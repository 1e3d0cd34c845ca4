use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clinic_portal::auth::provider_from_config;
use clinic_portal::config::{self, IdentityProviderKind};
use clinic_portal::{app, AppState};

#[derive(Parser)]
#[command(name = "clinic-portal")]
#[command(about = "Clinic Portal - session-gated pages for multi-tenant clinics")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides CLINIC_PORTAL_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Base URL of the clinic REST backend (overrides BACKEND_URL)")]
    backend_url: Option<String>,

    #[arg(long, help = "Identity provider: remote or jwt (overrides IDENTITY_PROVIDER)")]
    identity_provider: Option<IdentityProviderKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up BACKEND_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(backend_url) = args.backend_url {
        config.identity.backend_url = backend_url;
    }
    if let Some(provider) = args.identity_provider {
        config.identity.provider = provider;
    }

    tracing::info!(
        "Starting Clinic Portal in {:?} mode with {:?} identity provider",
        config.environment,
        config.identity.provider
    );

    let provider = provider_from_config(&config.identity).context("failed to set up identity provider")?;
    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let app = app(AppState::new(config, provider));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Clinic Portal listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
