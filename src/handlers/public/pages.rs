use axum::extract::Path;

use crate::middleware::ApiResponse;
use crate::tenant::TenantSlug;
use crate::view::{Page, ViewContext};

/// GET /:slug/patient/services - Public service listing of a clinic
///
/// Landing page for signed-out patients; both patient route groups fall
/// back here.
pub async fn patient_services(Path(slug): Path<String>) -> ApiResponse<Page> {
    let ctx = ViewContext::public(TenantSlug::new(slug));
    ApiResponse::success(ctx.page("patient.services", "Services"))
}

/// GET /:slug/login - Staff sign-in page
pub async fn login(Path(slug): Path<String>) -> ApiResponse<Page> {
    let ctx = ViewContext::public(TenantSlug::new(slug));
    ApiResponse::success(ctx.page("login", "Sign in"))
}
