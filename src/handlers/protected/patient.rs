use axum::Extension;

use crate::middleware::ApiResponse;
use crate::view::{Page, ViewContext};

/// GET /:slug/patient/complete-account - Finish a patient profile after first sign-in
pub async fn complete_account(Extension(ctx): Extension<ViewContext>) -> ApiResponse<Page> {
    ApiResponse::success(ctx.page("patient.complete_account", "Complete your account"))
}

/// GET /:slug/patient/booking - Choose service, therapist and slot
pub async fn booking(Extension(ctx): Extension<ViewContext>) -> ApiResponse<Page> {
    ApiResponse::success(ctx.page("patient.booking", "Book an appointment"))
}

/// GET /:slug/patient/booking/confirm
pub async fn booking_confirm(Extension(ctx): Extension<ViewContext>) -> ApiResponse<Page> {
    ApiResponse::success(ctx.page("patient.booking.confirm", "Confirm your booking"))
}
