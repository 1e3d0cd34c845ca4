use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::IdentityProvider;
use crate::config::{AppConfig, SecurityConfig};
use crate::guard::AccessGuard;
use crate::handlers;
use crate::middleware::{require_session, SessionGate};
use crate::tenant::RouteGroup;

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub guard: AccessGuard,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config: Arc::new(config),
            guard: AccessGuard::new(provider),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(public_page_routes())
        // JSON session check for API clients
        .route("/:slug/api/session", get(handlers::api::session))
        // Session-gated pages
        .merge(patient_account_routes(&state))
        .merge(patient_booking_routes(&state))
        .merge(therapist_routes(&state))
        .merge(admin_routes(&state))
        .fallback(handlers::public::not_found)
        .with_state(state.clone());

    // Global middleware
    if let Some(cors) = cors_layer(&state.config) {
        router = router.layer(cors);
    }
    if state.config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn public_page_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/:slug/patient/services", get(public::patient_services))
        .route("/:slug/login", get(public::login))
}

fn patient_account_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::patient;

    gated(
        state,
        RouteGroup::PatientAccount,
        Router::new().route("/:slug/patient/complete-account", get(patient::complete_account)),
    )
}

fn patient_booking_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::patient;

    gated(
        state,
        RouteGroup::PatientBooking,
        Router::new()
            .route("/:slug/patient/booking", get(patient::booking))
            .route("/:slug/patient/booking/confirm", get(patient::booking_confirm)),
    )
}

fn therapist_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::staff;

    gated(
        state,
        RouteGroup::Therapist,
        Router::new().route("/:slug/therapist/appointments", get(staff::therapist_appointments)),
    )
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::staff;

    gated(
        state,
        RouteGroup::Admin,
        Router::new()
            .route("/:slug/admin/services", get(staff::admin_services))
            .route("/:slug/admin/settings", get(staff::admin_settings)),
    )
}

/// Put every route of `routes` behind the session gate for `group`.
fn gated(state: &AppState, group: RouteGroup, routes: Router<AppState>) -> Router<AppState> {
    let gate = SessionGate {
        state: state.clone(),
        group,
    };

    routes.route_layer(middleware::from_fn_with_state(gate, require_session))
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let SecurityConfig { enable_cors, cors_origins } = &config.security;
    if !enable_cors {
        return None;
    }
    if config.is_development() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
    )
}
