//! Route guard — stateless capability check for protected views.
//!
//! A pure function of (required capability, current session snapshot).
//! It holds no state of its own and is re-evaluated on every use, so a
//! session change is reflected immediately without any invalidation
//! protocol.

use serde::Serialize;

use crate::session::SessionSnapshot;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated non-admins are sent when they hit an admin view.
pub const HOME_PATH: &str = "/";

/// Access level a protected view requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    /// Any logged-in account.
    Authenticated,
    /// A logged-in account with the admin role.
    Admin,
}

/// Outcome of a guard evaluation, consumed by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    /// Mount the protected content.
    Render,
    /// Navigate to the given fallback path instead.
    RedirectTo(&'static str),
}

/// Decide whether the current session may see a view requiring `capability`.
pub fn evaluate(capability: Capability, session: &SessionSnapshot) -> Decision {
    if !session.is_authenticated {
        return Decision::RedirectTo(LOGIN_PATH);
    }
    if capability == Capability::Admin && !session.is_admin {
        return Decision::RedirectTo(HOME_PATH);
    }
    Decision::Render
}

// ── Tests ───────────────────────────────────────────────────────────
