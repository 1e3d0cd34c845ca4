pub mod auth;
pub mod response;

pub use auth::{extract_credential, require_session, SessionGate};
pub use response::{ApiResponse, ApiResult};
