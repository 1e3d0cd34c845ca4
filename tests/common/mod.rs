#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{http::HeaderMap, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use clinic_portal::auth::provider_from_config;
use clinic_portal::config::{AppConfig, IdentityProviderKind};
use clinic_portal::{app, AppState};

/// Token the stub backend accepts
pub const VALID_TOKEN: &str = "valid-token";
/// Token that makes the stub backend fail with a 500
pub const BROKEN_TOKEN: &str = "explode";
/// Token whose user record has its own `data` field and no envelope
pub const DATA_FIELD_TOKEN: &str = "data-field-token";

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve `router` on a free local port; returns its base URL once the socket is bound.
async fn serve(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let bind_addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://{}", bind_addr))
}

/// Stand-in for the clinic REST backend's `GET /auth/me`
pub async fn spawn_identity_backend() -> Result<String> {
    async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or_default();

        match token {
            VALID_TOKEN => (
                StatusCode::OK,
                Json(json!({ "success": true, "data": { "id": "patient-1", "name": "Ana" } })),
            ),
            DATA_FIELD_TOKEN => (
                StatusCode::OK,
                Json(json!({ "id": "patient-2", "name": "Bea", "data": null })),
            ),
            BROKEN_TOKEN => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "boom" })),
            ),
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "invalid token" })),
            ),
        }
    }

    serve(Router::new().route("/auth/me", get(me))).await
}

/// A base URL nothing listens on
pub fn unreachable_backend_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}", port))
}

pub fn remote_config(backend_url: &str) -> AppConfig {
    let mut config = AppConfig::development();
    config.identity.provider = IdentityProviderKind::Remote;
    config.identity.backend_url = backend_url.to_string();
    config.identity.timeout_secs = Some(5);
    config
}

pub async fn spawn_portal(config: AppConfig) -> Result<TestServer> {
    let provider = provider_from_config(&config.identity).context("failed to build identity provider")?;
    let base_url = serve(app(AppState::new(config, provider))).await?;
    Ok(TestServer { base_url })
}

/// Portal wired to a fresh stub backend
pub async fn spawn_portal_with_backend() -> Result<TestServer> {
    let backend_url = spawn_identity_backend().await?;
    spawn_portal(remote_config(&backend_url)).await
}

/// Client that reports redirects instead of following them
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build test client")
}

pub fn location(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
