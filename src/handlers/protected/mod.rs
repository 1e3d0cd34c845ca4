// handlers/protected/mod.rs - Session-gated pages
//
// Handlers here only run after `require_session` accepted the visitor, so a
// `ViewContext` carrying the identity is always present in the extensions.
pub mod patient;
pub mod staff;
