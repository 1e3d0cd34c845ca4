use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::guard::AuthOutcome;
use crate::middleware::{extract_credential, ApiResponse, ApiResult};
use crate::tenant::TenantSlug;

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub tenant: TenantSlug,
    pub user: Identity,
}

/// GET /:slug/api/session - Current session for API clients
///
/// Same identity check as the page gate, but answers 401 instead of
/// redirecting. The body never says why the session was refused.
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "tenant": "clinic-a",
///     "user": { "subject": "patient-1", "profile": { ... } }
///   }
/// }
/// ```
pub async fn session(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> ApiResult<SessionInfo> {
    let tenant = TenantSlug::new(slug);
    let credential = extract_credential(&headers, &state.config.session.cookie_name);

    match state.guard.evaluate(credential.as_ref()).await {
        AuthOutcome::Authenticated(user) => Ok(ApiResponse::success(SessionInfo { tenant, user })),
        AuthOutcome::Unauthenticated(reason) => {
            tracing::debug!("Session check refused in tenant '{}': {}", tenant, reason);
            Err(ApiError::unauthorized("Not authenticated"))
        }
    }
}
