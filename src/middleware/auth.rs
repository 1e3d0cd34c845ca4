use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE, LOCATION},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::auth::Credential;
use crate::error::ApiError;
use crate::guard::GuardDecision;
use crate::tenant::{RouteGroup, TenantSlug};
use crate::view::ViewContext;

/// Middleware state for one protected route group
#[derive(Clone)]
pub struct SessionGate {
    pub state: AppState,
    pub group: RouteGroup,
}

/// Session gate for page routes under `/:slug/...`.
///
/// On success the identity and a [`ViewContext`] are injected into the
/// request; otherwise the visitor is redirected to the group's fallback page
/// and the handler never runs.
pub async fn require_session(
    State(gate): State<SessionGate>,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(slug) = params.get("slug").map(TenantSlug::new) else {
        tracing::error!("Session gate mounted on a route without a :slug parameter: {}", request.uri().path());
        return ApiError::internal_server_error("Route is missing its tenant").into_response();
    };

    let credential = extract_credential(&headers, &gate.state.config.session.cookie_name);

    match gate.state.guard.decide(gate.group, &slug, credential.as_ref()).await {
        GuardDecision::Render(identity) => {
            let context = ViewContext::protected(slug, gate.group, identity.clone());
            request.extensions_mut().insert(identity);
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        GuardDecision::Redirect(target) => redirect_to(&target),
    }
}

/// `307 Temporary Redirect` to `target`; a target that is not a valid header
/// value becomes a 500 instead of a panic.
fn redirect_to(target: &str) -> Response {
    match HeaderValue::try_from(target) {
        Ok(location) => (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!("Fallback path is not a valid Location header: {}", e);
            ApiError::internal_server_error("Unable to redirect").into_response()
        }
    }
}

/// Session credential from the request: `Authorization: Bearer` first, then the session cookie
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    extract_bearer_token(headers).or_else(|| extract_session_cookie(headers, cookie_name))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<Credential> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))?;

    Credential::new(token)
}

fn extract_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    // Browsers may split cookies over several headers
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == cookie_name)
        .and_then(|(_, value)| Credential::new(value.trim()))
}
