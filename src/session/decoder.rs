//! Session decoder — pure, local parsing of a bearer credential into claims.
//!
//! The credential is the standard three-segment bearer shape
//! `header.payload.signature`, each segment base64url-encoded. Only the
//! payload is inspected; the signature is stored and forwarded but never
//! verified here — trust in the claims is delegated to the issuing server
//! and transport security.
//!
//! Decoding never touches the network and never fails on unknown payload
//! fields. An unknown `role` string is accepted and normalized to the
//! non-admin [`Role::User`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

/// Number of dot-separated segments in a well-formed credential.
const SEGMENT_COUNT: usize = 3;

// ── Claims ───────────────────────────────────────────────────────

/// Access level carried by a credential. Closed set: anything the server
/// sends that isn't `admin` is a plain user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Normalize a raw role string. Unknown values are non-admin, not errors.
    fn from_raw(raw: &str) -> Self {
        match raw {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Decoded identity and access level extracted from a credential.
///
/// Derived, never persisted independently — always recomputed from the
/// currently stored credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Who the credential was issued to (the account email).
    pub identity: String,
    /// Access level.
    pub role: Role,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Payload shape as the server emits it. Extra fields (`user_id`, `exp`,
/// whatever future servers add) are ignored. The server historically names
/// the identity field `email`.
#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(alias = "email")]
    identity: String,
    role: String,
}

// ── Errors ───────────────────────────────────────────────────────

/// Ways a credential can be structurally malformed.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("credential has {0} segments, expected 3")]
    SegmentCount(usize),
    #[error("credential payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("credential payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("credential payload is not a valid claims object: {0}")]
    Payload(#[from] serde_json::Error),
}

// ── Decoding ─────────────────────────────────────────────────────

/// Decode a credential into [`Claims`], or fail with a [`DecodeError`]
/// describing how it is malformed. Pure and synchronous.
pub fn decode(credential: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = credential.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(DecodeError::SegmentCount(segments.len()));
    }

    let payload_bytes = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
    let payload_json = String::from_utf8(payload_bytes)?;
    let raw: RawPayload = serde_json::from_str(&payload_json)?;

    Ok(Claims {
        identity: raw.identity,
        role: Role::from_raw(&raw.role),
    })
}

// ── Tests ───────────────────────────────────────────────────────────
