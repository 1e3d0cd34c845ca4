use axum::{extract::State, http::Uri, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - Service information
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Clinic Portal",
            "version": version,
            "description": "Multi-tenant clinic portal page server",
            "identity_provider": state.guard.provider_name(),
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "patient_services": "/:slug/patient/services (public)",
                "login": "/:slug/login (public)",
                "patient_account": "/:slug/patient/complete-account (session, falls back to /:slug/patient/services)",
                "patient_booking": "/:slug/patient/booking[/confirm] (session, falls back to /:slug/patient/services)",
                "therapist": "/:slug/therapist/appointments (session, falls back to /:slug/login)",
                "admin": "/:slug/admin/services, /:slug/admin/settings (session, falls back to /:slug/login)",
                "session": "/:slug/api/session (session, 401 when signed out)",
            }
        }
    }))
}

/// GET /health - Liveness check
///
/// Does not call the identity provider; a provider outage shows up as
/// redirects on gated pages, not as an unhealthy server.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "environment": state.config.environment,
            "identity_provider": state.guard.provider_name(),
        }
    }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
