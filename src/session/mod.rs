//! Client-side session management.
//!
//! Provides:
//! - Durable single-slot credential persistence ([`CredentialStore`])
//! - Pure credential decoding into typed claims ([`decoder`])
//! - The authoritative session state machine ([`SessionManager`])
//! - The external authentication boundary ([`AuthService`] and its HTTP
//!   implementation)
//!
//! ## Design Decisions
//! - No cryptographic verification of the credential — the server signs it
//!   and the client only reads the payload; transport security carries the
//!   trust.
//! - Decode failures never cross the session boundary as errors: a corrupt
//!   persisted credential is purged and the session settles to logged-out.
//! - The manager is an explicitly constructed, injected value — there is no
//!   global session reachable from anywhere.

pub mod decoder;
pub mod manager;
pub mod service;
pub mod store;

pub use decoder::{Claims, DecodeError, Role};
pub use manager::{SessionManager, SessionSnapshot};
pub use service::{
    AccountProfile, AuthService, HttpAuthService, LoginError, LoginRequest, LoginSuccess,
    RegisterRequest,
};
pub use store::CredentialStore;
