use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{Credential, Identity, IdentityError, IdentityProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, tenant: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: sub.into(),
            tenant,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Verifies HS256 session tokens locally instead of asking the backend.
pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Result<Self, IdentityError> {
        if secret.is_empty() {
            return Err(IdentityError::Misconfigured("JWT secret not configured".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        })
    }

    pub fn issue(&self, claims: &Claims) -> Result<Credential, IdentityError> {
        let token = encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| IdentityError::Misconfigured(format!("JWT generation error: {}", e)))?;

        Credential::new(token).ok_or_else(|| IdentityError::Misconfigured("empty JWT generated".to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => IdentityError::Rejected("token expired".to_string()),
                _ => IdentityError::Rejected(format!("invalid JWT token: {}", e)),
            })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn current_user(&self, credential: &Credential) -> Result<Identity, IdentityError> {
        let claims = self.verify(credential.expose())?;
        let profile = serde_json::to_value(&claims)
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(Identity {
            subject: Some(claims.sub),
            profile,
        })
    }
}
