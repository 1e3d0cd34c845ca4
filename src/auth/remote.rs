use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use super::{Credential, Identity, IdentityError, IdentityProvider};
use crate::config::IdentityConfig;

/// Asks the clinic REST backend who owns a session token (`GET /auth/me`).
pub struct RemoteIdentityProvider {
    client: Client,
    me_url: Url,
}

impl RemoteIdentityProvider {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let me_url = me_url(&config.backend_url)?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| IdentityError::Misconfigured(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, me_url })
    }
}

/// Resolve `auth/me` relative to the backend base, keeping any path prefix.
fn me_url(backend_url: &str) -> Result<Url, IdentityError> {
    let mut base = Url::parse(backend_url)
        .map_err(|e| IdentityError::Misconfigured(format!("invalid backend URL '{}': {}", backend_url, e)))?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join("auth/me")
        .map_err(|e| IdentityError::Misconfigured(format!("invalid backend URL '{}': {}", backend_url, e)))
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn current_user(&self, credential: &Credential) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .get(self.me_url.clone())
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Identity backend request to {} failed: {}", self.me_url, e);
                IdentityError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityError::Rejected(format!("backend answered {}", status)));
        }
        if !status.is_success() {
            tracing::warn!("Identity backend answered {} for {}", status, self.me_url);
            return Err(IdentityError::Unavailable(format!("backend answered {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        match Identity::from_profile(body) {
            Identity { profile: Value::Null, .. } => {
                Err(IdentityError::Rejected("backend reported no current user".to_string()))
            }
            identity => Ok(identity),
        }
    }
}
