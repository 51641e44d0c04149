//! Application route table.
//!
//! The complaint app's views and which capability, if any, each one
//! requires. The table is static; access decisions come from evaluating
//! the guard against the live session snapshot at resolution time.

use crate::routing::guard::{self, Capability, Decision};
use crate::session::SessionSnapshot;

/// A navigable view of the application.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub title: &'static str,
    /// Capability required to view this route; `None` means public.
    pub capability: Option<Capability>,
}

/// Every route the application serves.
pub const APP_ROUTES: &[Route] = &[
    Route {
        path: "/",
        title: "Home",
        capability: None,
    },
    Route {
        path: "/login",
        title: "Login",
        capability: None,
    },
    Route {
        path: "/register",
        title: "Register",
        capability: None,
    },
    Route {
        path: "/submit-complaint",
        title: "Submit a Complaint",
        capability: None,
    },
    Route {
        path: "/admin/dashboard",
        title: "Admin Dashboard",
        capability: Some(Capability::Admin),
    },
];

/// Look up a route by exact path.
pub fn find(path: &str) -> Option<&'static Route> {
    APP_ROUTES.iter().find(|route| route.path == path)
}

/// Resolve a navigation attempt: look the path up and apply its guard.
/// Unknown paths are a lookup miss (`None`), not a guard decision.
pub fn resolve(path: &str, session: &SessionSnapshot) -> Option<(&'static Route, Decision)> {
    let route = find(path)?;
    let decision = match route.capability {
        Some(capability) => guard::evaluate(capability, session),
        None => Decision::Render,
    };
    Some((route, decision))
}

// ── Tests ───────────────────────────────────────────────────────────
