//! transitdesk — terminal client for the city transit complaint service.
//!
//! The interesting part of the client is deciding, from a persisted
//! credential, who the current user is and what they may view:
//!
//! - [`session`] owns the credential store, the decoder, and the session
//!   state machine.
//! - [`routing`] gates views behind capabilities using a stateless guard
//!   over the session's live projection.
//!
//! Complaint submission and tracking are server-rendered flows outside
//! this crate's concern.

pub mod config;
pub mod routing;
pub mod session;
