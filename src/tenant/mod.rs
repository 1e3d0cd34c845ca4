//! Tenant-scoped paths.
//!
//! Every clinic lives under `/{slug}/...`. The slug is taken from the URL as
//! is; whether the clinic exists is the backend's business. Paths built from
//! it always carry the slug as one percent-encoded segment.

use std::fmt;

use serde::Serialize;

/// URL identifier of a clinic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TenantSlug(String);

impl TenantSlug {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Public service listing, where patients land when they are not signed in.
    pub fn patient_services_path(&self) -> String {
        self.path(&["patient", "services"])
    }

    /// Staff sign-in page.
    pub fn login_path(&self) -> String {
        self.path(&["login"])
    }

    /// `/{slug}/{rest...}` with the slug encoded as a single segment, so a
    /// decoded `/`, `\` or control character cannot leave the tenant prefix.
    fn path(&self, rest: &[&str]) -> String {
        let segment = match self.0.as_str() {
            // Dot segments would be collapsed by the client
            "." => "%2E".to_string(),
            ".." => "%2E%2E".to_string(),
            slug => urlencoding::encode(slug).into_owned(),
        };

        let mut path = format!("/{}", segment);
        for part in rest {
            path.push('/');
            path.push_str(part);
        }
        path
    }
}

impl fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of pages protected by the same session check and sharing a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteGroup {
    PatientAccount,
    PatientBooking,
    Therapist,
    Admin,
}

impl RouteGroup {
    pub const ALL: [RouteGroup; 4] = [
        RouteGroup::PatientAccount,
        RouteGroup::PatientBooking,
        RouteGroup::Therapist,
        RouteGroup::Admin,
    ];

    /// Where an unauthenticated visitor of this group is sent.
    pub fn fallback_path(self, slug: &TenantSlug) -> String {
        match self {
            RouteGroup::PatientAccount | RouteGroup::PatientBooking => slug.patient_services_path(),
            RouteGroup::Therapist | RouteGroup::Admin => slug.login_path(),
        }
    }
}
