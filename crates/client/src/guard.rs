//! Admin route gating.
//!
//! A pure function of the admin session state: no I/O, no side effects.
//! The rendering layer asks before mounting any admin console surface and
//! acts on the decision.

use crate::models::AdminProfile;
use crate::session::SessionState;

/// What to do with a request to show an admin route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Restoration has not settled; show nothing yet.
    ///
    /// Rendering a login redirect here would bounce an admin with a valid
    /// persisted session through the login page on every startup.
    Waiting,
    /// Render the requested admin route.
    Allow,
    /// Send the user to the admin login surface.
    RedirectToLogin,
}

/// Decide whether an admin route may render under `state`.
#[must_use]
pub const fn decide(state: &SessionState<AdminProfile>) -> RouteDecision {
    match state {
        SessionState::Loading => RouteDecision::Waiting,
        SessionState::Authenticated(_) => RouteDecision::Allow,
        SessionState::Unauthenticated => RouteDecision::RedirectToLogin,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use oakline_core::{AdminId, Email, Role};

    fn admin() -> AdminProfile {
        AdminProfile {
            id: AdminId::new("a-1"),
            admin_name: "Store Ops".to_string(),
            email: Email::parse("ops@oakline.shop").unwrap(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_loading_waits_instead_of_redirecting() {
        assert_eq!(decide(&SessionState::Loading), RouteDecision::Waiting);
    }

    #[test]
    fn test_authenticated_allows() {
        assert_eq!(
            decide(&SessionState::Authenticated(admin())),
            RouteDecision::Allow
        );
    }

    #[test]
    fn test_unauthenticated_redirects() {
        assert_eq!(
            decide(&SessionState::Unauthenticated),
            RouteDecision::RedirectToLogin
        );
    }
}
