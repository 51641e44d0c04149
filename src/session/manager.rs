//! Session manager — the authoritative in-memory session aggregate.
//!
//! One `SessionManager` is constructed at startup and owns the process's
//! session state for its lifetime; everything else (routing, CLI output)
//! reads projections from it. It is mutated only by [`SessionManager::init`],
//! [`SessionManager::login`] and [`SessionManager::logout`].
//!
//! ## State model
//! `LoggedOut` or `LoggedIn(claims)` — nothing else. `is_admin` is read out
//! of the claims inside `LoggedIn`, so an admin-without-identity state is
//! unrepresentable. Projections are recomputed from the state on every
//! read, never cached.
//!
//! ## Concurrency
//! All operations except `login` are synchronous and run to completion.
//! `login` awaits the remote service; the session keeps its prior state
//! while the call is pending. Concurrent logins are not fenced: the methods
//! take `&mut self`, which serializes calls within one task, and if a
//! caller interleaves logins across tasks anyway, whichever resolves last
//! determines the final state. Last-write-wins is accepted behavior, not a
//! bug.

use std::sync::Arc;

use crate::session::decoder::{self, Claims};
use crate::session::service::{AuthService, LoginError, LoginRequest, LoginSuccess};
use crate::session::store::CredentialStore;

/// The two reachable session states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    LoggedOut,
    LoggedIn(Claims),
}

/// Point-in-time projection of the session, consumed by the routing layer.
///
/// Only obtainable from a constructed [`SessionManager`], whose pre-`init`
/// state is the well-defined `LoggedOut` — there is no "uninitialized"
/// snapshot to misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub is_admin: bool,
}

/// Owns the session state and mediates every transition.
pub struct SessionManager {
    store: CredentialStore,
    service: Arc<dyn AuthService>,
    state: SessionState,
}

impl SessionManager {
    /// Construct a manager over the given store and auth service.
    /// The state is `LoggedOut` until [`SessionManager::init`] runs.
    pub fn new(store: CredentialStore, service: Arc<dyn AuthService>) -> Self {
        Self {
            store,
            service,
            state: SessionState::LoggedOut,
        }
    }

    // ── Transitions ──────────────────────────────────────────

    /// Settle the initial state from the persisted credential.
    ///
    /// Absent credential → `LoggedOut`. Present and decodable → `LoggedIn`.
    /// Present but malformed → the credential is purged and the session
    /// settles to `LoggedOut`; a corrupt persisted credential is the same
    /// as no session, and the recovery is silent apart from telemetry.
    pub fn init(&mut self) -> anyhow::Result<()> {
        let Some(credential) = self.store.get() else {
            self.state = SessionState::LoggedOut;
            return Ok(());
        };

        match decoder::decode(&credential) {
            Ok(claims) => {
                tracing::debug!(identity = %claims.identity, "Restored session from stored credential");
                self.state = SessionState::LoggedIn(claims);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Stored credential is malformed; clearing it");
                self.store.clear()?;
                self.state = SessionState::LoggedOut;
            }
        }
        Ok(())
    }

    /// Exchange credentials for a session via the remote auth service.
    ///
    /// On success the fresh credential is persisted, decoded, and the
    /// session transitions to `LoggedIn`. On failure the session keeps its
    /// prior state and the error (with its display-ready message) is
    /// propagated; no retry is attempted here.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<LoginSuccess, LoginError> {
        let success = self.service.login(request).await?;

        self.store
            .set(&success.credential)
            .map_err(|err| LoginError::new(format!("Could not persist credential: {err}")))?;

        let claims = decoder::decode(&success.credential).map_err(|err| {
            LoginError::new(format!("Service returned an unusable credential: {err}"))
        })?;

        tracing::info!(identity = %claims.identity, admin = claims.is_admin(), "Logged in");
        self.state = SessionState::LoggedIn(claims);
        Ok(success)
    }

    /// Drop the session and the persisted credential. Always succeeds and
    /// always lands in `LoggedOut`, whatever the current state.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            // The in-memory session still ends; a stale row will be purged
            // on the next init or login.
            tracing::warn!(error = %err, "Failed to clear stored credential on logout");
        }
        self.state = SessionState::LoggedOut;
        tracing::info!("Logged out");
    }

    // ── Projections ──────────────────────────────────────────

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn(_))
    }

    pub fn is_admin(&self) -> bool {
        match &self.state {
            SessionState::LoggedIn(claims) => claims.is_admin(),
            SessionState::LoggedOut => false,
        }
    }

    /// Identity of the logged-in account, if any.
    pub fn identity(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn(claims) => Some(&claims.identity),
            SessionState::LoggedOut => None,
        }
    }

    /// Projection for the routing layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            is_authenticated: self.is_authenticated(),
            is_admin: self.is_admin(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::service::AccountProfile;
    use async_trait::async_trait;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    /// Build a decodable (unsigned) credential for the given claims.
    fn make_credential(identity: &str, role: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD
            .encode(format!(r#"{{"identity":"{identity}","role":"{role}"}}"#).as_bytes());
        format!("{header}.{payload}.sig")
    }

    /// Scripted auth service: pops responses from the back, so the script
    /// vector lists them in reverse call order.
    struct ScriptedAuthService {
        responses: parking_lot::Mutex<Vec<Result<LoginSuccess, LoginError>>>,
    }

    impl ScriptedAuthService {
        fn with(responses: Vec<Result<LoginSuccess, LoginError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: parking_lot::Mutex::new(responses),
            })
        }

        fn succeeding_with(identity: &str, role: &str) -> Arc<Self> {
            Self::with(vec![Ok(success_for(identity, role))])
        }
    }

    fn success_for(identity: &str, role: &str) -> LoginSuccess {
        LoginSuccess {
            credential: make_credential(identity, role),
            user: AccountProfile {
                name: "Test Rider".to_string(),
                email: identity.to_string(),
                role: role.to_string(),
            },
        }
    }

    #[async_trait]
    impl AuthService for ScriptedAuthService {
        async fn login(&self, _request: &LoginRequest) -> Result<LoginSuccess, LoginError> {
            self.responses
                .lock()
                .pop()
                .expect("ScriptedAuthService ran out of responses")
        }
    }

    fn request() -> LoginRequest {
        LoginRequest {
            email: "rider@x.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    fn manager_with(
        store: CredentialStore,
        service: Arc<dyn AuthService>,
    ) -> SessionManager {
        SessionManager::new(store, service)
    }

    #[test]
    fn init_with_empty_store_is_logged_out() {
        let service = ScriptedAuthService::with(vec![]);
        let mut mgr = manager_with(CredentialStore::in_memory(), service);
        mgr.init().unwrap();

        assert!(!mgr.is_authenticated());
        assert!(!mgr.is_admin());
        assert!(mgr.identity().is_none());
    }

    #[test]
    fn init_restores_admin_session_from_stored_credential() {
        let store = CredentialStore::in_memory();
        store.set(&make_credential("a@x.com", "admin")).unwrap();

        let mut mgr = manager_with(store, ScriptedAuthService::with(vec![]));
        mgr.init().unwrap();

        assert!(mgr.is_authenticated());
        assert!(mgr.is_admin());
        assert_eq!(mgr.identity(), Some("a@x.com"));
    }

    #[test]
    fn init_with_corrupt_credential_clears_store_and_logs_out() {
        let store = CredentialStore::in_memory();
        store.set("not-a-token").unwrap();

        let mut mgr = manager_with(store, ScriptedAuthService::with(vec![]));
        mgr.init().unwrap();

        assert!(!mgr.is_authenticated());
        assert!(mgr.store.get().is_none());
    }

    #[tokio::test]
    async fn login_persists_credential_and_transitions() {
        let mut mgr = manager_with(
            CredentialStore::in_memory(),
            ScriptedAuthService::succeeding_with("rider@x.com", "user"),
        );
        mgr.init().unwrap();

        let success = mgr.login(&request()).await.unwrap();

        assert!(mgr.is_authenticated());
        assert!(!mgr.is_admin());
        assert_eq!(mgr.identity(), Some("rider@x.com"));
        assert_eq!(mgr.store.get().as_deref(), Some(success.credential.as_str()));
    }

    #[tokio::test]
    async fn failed_login_leaves_prior_state_untouched() {
        let store = CredentialStore::in_memory();
        let previous = make_credential("a@x.com", "admin");
        store.set(&previous).unwrap();

        let service =
            ScriptedAuthService::with(vec![Err(LoginError::new("Incorrect password."))]);
        let mut mgr = manager_with(store, service);
        mgr.init().unwrap();

        let err = mgr.login(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password.");

        // Still the admin session from before the attempt.
        assert!(mgr.is_authenticated());
        assert!(mgr.is_admin());
        assert_eq!(mgr.store.get().as_deref(), Some(previous.as_str()));
    }

    #[tokio::test]
    async fn failed_login_from_logged_out_stays_logged_out() {
        let service = ScriptedAuthService::with(vec![Err(LoginError::new("No account."))]);
        let mut mgr = manager_with(CredentialStore::in_memory(), service);
        mgr.init().unwrap();

        assert!(mgr.login(&request()).await.is_err());
        assert!(!mgr.is_authenticated());
        assert!(mgr.store.get().is_none());
    }

    #[tokio::test]
    async fn second_login_wins() {
        // Responses pop back-to-front: first call gets the admin session,
        // second gets the plain user. Last write wins.
        let service = ScriptedAuthService::with(vec![
            Ok(success_for("second@x.com", "user")),
            Ok(success_for("first@x.com", "admin")),
        ]);
        let mut mgr = manager_with(CredentialStore::in_memory(), service);
        mgr.init().unwrap();

        mgr.login(&request()).await.unwrap();
        assert!(mgr.is_admin());

        mgr.login(&request()).await.unwrap();
        assert!(!mgr.is_admin());
        assert_eq!(mgr.identity(), Some("second@x.com"));
        assert_eq!(
            mgr.store.get().as_deref(),
            Some(make_credential("second@x.com", "user").as_str())
        );
    }

    #[tokio::test]
    async fn login_with_unusable_returned_credential_fails() {
        let service = ScriptedAuthService::with(vec![Ok(LoginSuccess {
            credential: "garbage".to_string(),
            user: AccountProfile {
                name: "X".to_string(),
                email: "x@x.com".to_string(),
                role: "user".to_string(),
            },
        })]);
        let mut mgr = manager_with(CredentialStore::in_memory(), service);
        mgr.init().unwrap();

        let err = mgr.login(&request()).await.unwrap_err();
        assert!(err.to_string().contains("unusable credential"));
        assert!(!mgr.is_authenticated());
    }

    #[test]
    fn logout_from_logged_in_clears_everything() {
        let store = CredentialStore::in_memory();
        store.set(&make_credential("a@x.com", "admin")).unwrap();
        let mut mgr = manager_with(store, ScriptedAuthService::with(vec![]));
        mgr.init().unwrap();
        assert!(mgr.is_authenticated());

        mgr.logout();

        assert!(!mgr.is_authenticated());
        assert!(!mgr.is_admin());
        assert!(mgr.store.get().is_none());
    }

    #[test]
    fn logout_from_logged_out_is_a_no_op_that_succeeds() {
        let mut mgr = manager_with(
            CredentialStore::in_memory(),
            ScriptedAuthService::with(vec![]),
        );
        mgr.init().unwrap();

        mgr.logout();
        assert!(!mgr.is_authenticated());
        assert!(mgr.store.get().is_none());
    }

    #[test]
    fn admin_implies_authenticated_in_every_reachable_state() {
        // LoggedOut
        let mut mgr = manager_with(
            CredentialStore::in_memory(),
            ScriptedAuthService::with(vec![]),
        );
        mgr.init().unwrap();
        assert!(!mgr.is_admin() || mgr.is_authenticated());

        // LoggedIn(user)
        let store = CredentialStore::in_memory();
        store.set(&make_credential("u@x.com", "user")).unwrap();
        let mut mgr = manager_with(store, ScriptedAuthService::with(vec![]));
        mgr.init().unwrap();
        assert!(!mgr.is_admin() || mgr.is_authenticated());

        // LoggedIn(admin)
        let store = CredentialStore::in_memory();
        store.set(&make_credential("a@x.com", "admin")).unwrap();
        let mut mgr = manager_with(store, ScriptedAuthService::with(vec![]));
        mgr.init().unwrap();
        assert!(mgr.is_admin() && mgr.is_authenticated());
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let store = CredentialStore::in_memory();
        store.set(&make_credential("a@x.com", "admin")).unwrap();
        let mut mgr = manager_with(store, ScriptedAuthService::with(vec![]));

        // Before init: the defined initial state, not an invalid one.
        let snap = mgr.snapshot();
        assert!(!snap.is_authenticated && !snap.is_admin);

        mgr.init().unwrap();
        let snap = mgr.snapshot();
        assert!(snap.is_authenticated && snap.is_admin);

        mgr.logout();
        let snap = mgr.snapshot();
        assert!(!snap.is_authenticated && !snap.is_admin);
    }
}
