use axum::Extension;

use crate::middleware::ApiResponse;
use crate::view::{Page, ViewContext};

/// GET /:slug/therapist/appointments - Therapist agenda
pub async fn therapist_appointments(Extension(ctx): Extension<ViewContext>) -> ApiResponse<Page> {
    ApiResponse::success(ctx.page("therapist.appointments", "Appointments"))
}

/// GET /:slug/admin/services - Service catalog management
pub async fn admin_services(Extension(ctx): Extension<ViewContext>) -> ApiResponse<Page> {
    ApiResponse::success(ctx.page("admin.services", "Services"))
}

/// GET /:slug/admin/settings - Clinic settings
pub async fn admin_settings(Extension(ctx): Extension<ViewContext>) -> ApiResponse<Page> {
    ApiResponse::success(ctx.page("admin.settings", "Settings"))
}
