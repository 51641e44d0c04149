//! Capability-gated routing.
//!
//! A stateless guard deciding, per view, whether the current session may
//! see it ([`guard`]), plus the application's route table ([`routes`]).
//! The guard reads a [`crate::session::SessionSnapshot`] and holds no
//! state of its own.

pub mod guard;
pub mod routes;

pub use guard::{evaluate, Capability, Decision, HOME_PATH, LOGIN_PATH};
pub use routes::{find, resolve, Route, APP_ROUTES};
