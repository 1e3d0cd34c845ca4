//! Per-request view context.
//!
//! Page handlers receive everything they need to describe a page (tenant,
//! signed-in user, route group) in a [`ViewContext`] built for that request.
//! Nothing about the current page lives in process-wide state.

use serde::Serialize;

use crate::auth::Identity;
use crate::tenant::{RouteGroup, TenantSlug};

#[derive(Debug, Clone, Serialize)]
pub struct ViewContext {
    pub tenant: TenantSlug,
    pub group: Option<RouteGroup>,
    pub identity: Option<Identity>,
}

/// Page descriptor handed to the client that renders it.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub view: &'static str,
    pub title: String,
    pub tenant: TenantSlug,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<RouteGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

impl ViewContext {
    pub fn public(tenant: TenantSlug) -> Self {
        Self {
            tenant,
            group: None,
            identity: None,
        }
    }

    pub fn protected(tenant: TenantSlug, group: RouteGroup, identity: Identity) -> Self {
        Self {
            tenant,
            group: Some(group),
            identity: Some(identity),
        }
    }

    pub fn page(&self, view: &'static str, title: &str) -> Page {
        Page {
            view,
            title: title.to_string(),
            tenant: self.tenant.clone(),
            group: self.group,
            user: self.identity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_page_has_no_user() {
        let ctx = ViewContext::public(TenantSlug::new("clinic-a"));
        let page = serde_json::to_value(ctx.page("patient.services", "Services")).unwrap();

        assert_eq!(page["tenant"], "clinic-a");
        assert_eq!(page["title"], "Services");
        assert!(page.get("user").is_none());
        assert!(page.get("group").is_none());
    }

    #[test]
    fn test_protected_page_carries_identity() {
        let identity = Identity::from_profile(json!({ "id": "t-9" }));
        let ctx = ViewContext::protected(TenantSlug::new("clinic-a"), RouteGroup::Therapist, identity);
        let page = serde_json::to_value(ctx.page("therapist.appointments", "Appointments")).unwrap();

        assert_eq!(page["group"], "therapist");
        assert_eq!(page["user"]["subject"], "t-9");
    }
}
