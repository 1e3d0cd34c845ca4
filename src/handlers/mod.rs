// handlers/mod.rs - Page and API handlers
//
// Public (no session) → Protected (session gate, redirect on failure) → API
// (JSON session check, 401 on failure)
pub mod api;       // JSON endpoints for API clients (/:slug/api/*)
pub mod protected; // Session-gated pages; gate applied in app.rs
pub mod public;    // Service info, health, public tenant pages
