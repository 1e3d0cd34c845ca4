//! Session gate for protected pages.
//!
//! One identity check per request, no retries, no caching. Anything short of
//! a confirmed identity ends in a redirect to the group's fallback page.

use std::sync::Arc;

use crate::auth::{Credential, Identity, IdentityError, IdentityProvider};
use crate::tenant::{RouteGroup, TenantSlug};

/// Why a visitor is not treated as signed in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotAuthenticated {
    #[error("no session credential presented")]
    MissingCredential,

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(Identity),
    Unauthenticated(NotAuthenticated),
}

/// What the page pipeline does next.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Render(Identity),
    Redirect(String),
}

#[derive(Clone)]
pub struct AccessGuard {
    provider: Arc<dyn IdentityProvider>,
}

impl AccessGuard {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn evaluate(&self, credential: Option<&Credential>) -> AuthOutcome {
        let Some(credential) = credential else {
            return AuthOutcome::Unauthenticated(NotAuthenticated::MissingCredential);
        };

        match self.provider.current_user(credential).await {
            Ok(identity) => AuthOutcome::Authenticated(identity),
            Err(e) => AuthOutcome::Unauthenticated(e.into()),
        }
    }

    pub async fn decide(
        &self,
        group: RouteGroup,
        slug: &TenantSlug,
        credential: Option<&Credential>,
    ) -> GuardDecision {
        match self.evaluate(credential).await {
            AuthOutcome::Authenticated(identity) => {
                tracing::debug!(
                    "Session accepted for {:?} in tenant '{}' (subject: {:?})",
                    group, slug, identity.subject
                );
                GuardDecision::Render(identity)
            }
            AuthOutcome::Unauthenticated(reason) => {
                let target = group.fallback_path(slug);
                tracing::debug!(
                    "Redirecting {:?} visitor in tenant '{}' to {}: {}",
                    group, slug, target, reason
                );
                GuardDecision::Redirect(target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts exactly one token, or fails every lookup with a fixed error.
    struct StubProvider {
        valid_token: &'static str,
        failure: Option<IdentityError>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn accepting(valid_token: &'static str) -> Arc<Self> {
            Arc::new(Self { valid_token, failure: None, calls: AtomicUsize::new(0) })
        }

        fn failing(failure: IdentityError) -> Arc<Self> {
            Arc::new(Self { valid_token: "", failure: Some(failure), calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl IdentityProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn current_user(&self, credential: &Credential) -> Result<Identity, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(failure) = &self.failure {
                return Err(failure.clone());
            }
            if credential.expose() == self.valid_token {
                Ok(Identity::from_profile(json!({ "id": "patient-1" })))
            } else {
                Err(IdentityError::Rejected("unknown token".to_string()))
            }
        }
    }

    fn credential(token: &str) -> Credential {
        Credential::new(token).unwrap()
    }

    #[tokio::test]
    async fn test_valid_credential_renders() {
        let guard = AccessGuard::new(StubProvider::accepting("good"));
        let decision = guard
            .decide(RouteGroup::PatientBooking, &TenantSlug::new("clinic-a"), Some(&credential("good")))
            .await;

        match decision {
            GuardDecision::Render(identity) => assert_eq!(identity.subject.as_deref(), Some("patient-1")),
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_redirects_without_asking_provider() {
        let provider = StubProvider::accepting("good");
        let guard = AccessGuard::new(provider.clone());

        let decision = guard
            .decide(RouteGroup::PatientBooking, &TenantSlug::new("clinic-a"), None)
            .await;

        assert_eq!(decision, GuardDecision::Redirect("/clinic-a/patient/services".to_string()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_credential_matches_missing_credential() {
        let guard = AccessGuard::new(StubProvider::accepting("good"));
        let slug = TenantSlug::new("clinic-a");

        let missing = guard.decide(RouteGroup::PatientAccount, &slug, None).await;
        let invalid = guard
            .decide(RouteGroup::PatientAccount, &slug, Some(&credential("expired")))
            .await;

        assert_eq!(missing, invalid);
    }

    #[tokio::test]
    async fn test_provider_error_fails_closed() {
        let guard = AccessGuard::new(StubProvider::failing(IdentityError::Unavailable(
            "connection refused".to_string(),
        )));

        let decision = guard
            .decide(RouteGroup::PatientBooking, &TenantSlug::new("clinic-b"), Some(&credential("good")))
            .await;

        assert_eq!(decision, GuardDecision::Redirect("/clinic-b/patient/services".to_string()));
    }

    #[tokio::test]
    async fn test_redirect_target_ignores_credential_value() {
        let guard = AccessGuard::new(StubProvider::accepting("good"));
        let slug = TenantSlug::new("clinic-c");

        let a = guard.decide(RouteGroup::Therapist, &slug, Some(&credential("x"))).await;
        let b = guard.decide(RouteGroup::Therapist, &slug, Some(&credential("y"))).await;

        assert_eq!(a, GuardDecision::Redirect("/clinic-c/login".to_string()));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_repeated_evaluation_is_stable_and_uncached() {
        let provider = StubProvider::accepting("good");
        let guard = AccessGuard::new(provider.clone());
        let token = credential("good");

        let first = guard.evaluate(Some(&token)).await;
        let second = guard.evaluate(Some(&token)).await;

        assert_eq!(first, second);
        assert!(matches!(first, AuthOutcome::Authenticated(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unauthenticated_reason_is_kept() {
        let guard = AccessGuard::new(StubProvider::accepting("good"));

        assert_eq!(
            guard.evaluate(None).await,
            AuthOutcome::Unauthenticated(NotAuthenticated::MissingCredential)
        );
        assert_eq!(
            guard.evaluate(Some(&credential("bad"))).await,
            AuthOutcome::Unauthenticated(NotAuthenticated::Identity(IdentityError::Rejected(
                "unknown token".to_string()
            )))
        );
    }
}
