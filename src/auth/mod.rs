//! Session credentials and the identity providers that resolve them.
//!
//! A credential is an opaque bearer token. Providers answer one question:
//! "is there a currently authenticated user for this token?" Every failure
//! mode comes back as an [`IdentityError`]; callers that gate pages treat all
//! of them the same way.

pub mod jwt;
pub mod remote;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::{IdentityConfig, IdentityProviderKind};

pub use jwt::{Claims, JwtIdentityProvider};
pub use remote::RemoteIdentityProvider;

/// Opaque session token presented by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only tokens.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// The authenticated user as reported by the identity provider.
///
/// Nothing in the gate looks inside `profile`; pages may pass it through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub subject: Option<String>,
    pub profile: Value,
}

impl Identity {
    /// Build an identity from a provider payload, unwrapping a
    /// `{ "success": .., "data": .. }` envelope when present. A user record
    /// with its own `data` field but no `success` key is kept whole.
    pub fn from_profile(body: Value) -> Self {
        let profile = match body {
            Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        let subject = ["id", "sub", "user_id"]
            .iter()
            .find_map(|key| match profile.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            });

        Self { subject, profile }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The provider looked at the credential and said no (expired, revoked, forged)
    #[error("credential rejected: {0}")]
    Rejected(String),

    /// The provider could not be asked (network failure, timeout, 5xx)
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered but the answer could not be understood
    #[error("invalid identity response: {0}")]
    InvalidResponse(String),

    #[error("identity provider misconfigured: {0}")]
    Misconfigured(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short label for logs and the service info endpoint.
    fn name(&self) -> &'static str;

    /// Resolve the user behind `credential`. One attempt, no retries.
    async fn current_user(&self, credential: &Credential) -> Result<Identity, IdentityError>;
}

/// Build the provider selected in configuration.
pub fn provider_from_config(config: &IdentityConfig) -> Result<Arc<dyn IdentityProvider>, IdentityError> {
    match config.provider {
        IdentityProviderKind::Remote => Ok(Arc::new(RemoteIdentityProvider::new(config)?)),
        IdentityProviderKind::Jwt => Ok(Arc::new(JwtIdentityProvider::new(&config.jwt_secret)?)),
    }
}
