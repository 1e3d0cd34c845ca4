// handlers/public/mod.rs - Public handlers (no session required)
//
// Includes the tenant pages the session gate falls back to, so they must
// never be gated themselves.
pub mod info;
pub mod pages;

pub use info::{health, not_found, root};
pub use pages::{login, patient_services};
