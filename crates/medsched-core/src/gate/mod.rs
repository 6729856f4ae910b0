//! Access-control gate.
//!
//! One pure decision function evaluated on every navigation, before a
//! view renders. It folds the two checks the application needs
//! ("authenticated at all" and "inside the right role area") into a
//! single [`RouteDecision`], so there is exactly one authorization
//! routine to reason about.
//!
//! The gate never parses the session itself; callers resolve it through
//! [`crate::session::SessionStore`] and pass the result in. Anything
//! that failed to parse there arrives here as `None` and lands in the
//! redirect-to-login branch, so a malformed session can never reach a
//! protected view.

use crate::models::{Role, User};

/// The login/landing path unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/";

/// Paths reserved for unauthenticated visitors.
pub const PUBLIC_ONLY_PATHS: &[&str] = &["/", "/register"];

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested view.
    Allow,
    /// Send the visitor to the login page.
    RedirectLogin,
    /// Send the session to its role's landing page.
    RedirectRoleHome(Role),
}

impl RouteDecision {
    /// The path to navigate to, if this decision is a redirect.
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            RouteDecision::Allow => None,
            RouteDecision::RedirectLogin => Some(LOGIN_PATH),
            RouteDecision::RedirectRoleHome(role) => Some(role.home_path()),
        }
    }
}

/// Decide whether a navigation may render.
pub fn authorize(session: Option<&User>, path: &str) -> RouteDecision {
    let public_only = is_public_only(path);

    let Some(user) = session else {
        return if public_only {
            RouteDecision::Allow
        } else {
            RouteDecision::RedirectLogin
        };
    };

    if public_only {
        return RouteDecision::RedirectRoleHome(user.role);
    }

    // Inside a role-scoped area, the first segment must match the
    // session's own role.
    if let Some(area) = first_segment(path).and_then(Role::from_segment) {
        if area != user.role {
            return RouteDecision::RedirectRoleHome(user.role);
        }
    }

    RouteDecision::Allow
}

/// Check whether a path is reserved for unauthenticated visitors.
pub fn is_public_only(path: &str) -> bool {
    let normalized = normalize(path);
    PUBLIC_ONLY_PATHS.contains(&normalized)
}

/// Strip a trailing slash so `/register/` and `/register` agree.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

fn first_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
