//! Session state machines.
//!
//! Two independent sessions run side by side: the end-user session
//! ([`AuthSession`]) and the admin session ([`AdminSession`]). Both are
//! instances of the same core over different profile types and credential
//! namespaces, but they deliberately differ in one place: startup
//! restoration. The user session refreshes its cached profile against the
//! backend and treats any failure as fatal to the restored session; the
//! admin session trusts its cached profile as-is and lets the first real
//! admin request surface an expired token.

mod admin;
mod user;

pub use admin::AdminSession;
pub use user::AuthSession;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::models::{AdminProfile, UserProfile};
use crate::store::{self, CredentialStore, Namespace};

/// A profile type that can back a session.
pub trait Profile: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Credential slot this profile persists into.
    const NAMESPACE: Namespace;

    /// Whether this profile grants admin-console access.
    fn grants_admin(&self) -> bool;
}

impl Profile for UserProfile {
    const NAMESPACE: Namespace = Namespace::User;

    fn grants_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl Profile for AdminProfile {
    const NAMESPACE: Namespace = Namespace::Admin;

    fn grants_admin(&self) -> bool {
        true
    }
}

/// Observable state of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState<P> {
    /// Startup restoration has not finished yet.
    #[default]
    Loading,
    /// No credential; the user must sign in.
    Unauthenticated,
    /// Signed in as the contained profile.
    Authenticated(P),
}

impl<P> SessionState<P> {
    /// The signed-in profile, if any.
    pub const fn profile(&self) -> Option<&P> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            Self::Loading | Self::Unauthenticated => None,
        }
    }

    /// Whether the session is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Shared session machinery: state cell, credential slot, and the
/// generation counter that lets a sign-out win against an in-flight
/// restoration.
pub(crate) struct SessionCore<P> {
    state: Mutex<SessionState<P>>,
    generation: AtomicU64,
    store: Arc<dyn CredentialStore>,
}

impl<P: Profile> SessionCore<P> {
    pub(crate) fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: Mutex::new(SessionState::Loading),
            generation: AtomicU64::new(0),
            store,
        }
    }

    pub(crate) fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    pub(crate) fn state(&self) -> SessionState<P> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Snapshot the generation before starting async work whose result
    /// should be discarded if the session changes underneath it.
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub(crate) fn set_state(&self, next: SessionState<P>) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *state = next;
    }

    /// Install `next` only if no sign-in or sign-out happened since
    /// `generation` was snapshotted. Returns whether the state was applied.
    pub(crate) fn commit_if_current(&self, generation: u64, next: SessionState<P>) -> bool {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            warn!("discarding stale session restoration result");
            return false;
        }
        *state = next;
        true
    }

    /// Authenticate and bump the generation, invalidating any in-flight
    /// restoration.
    pub(crate) fn authenticate(&self, profile: P) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.set_state(SessionState::Authenticated(profile));
    }

    /// Drop the session locally: bump the generation, clear the credential
    /// slot, and move to `Unauthenticated`. Never performs a network call.
    pub(crate) fn sign_out(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Err(err) = store::clear_credential(self.store.as_ref(), P::NAMESPACE) {
            warn!(%err, "failed to clear credential on sign-out");
        }
        self.set_state(SessionState::Unauthenticated);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use oakline_core::{Email, Role, UserId};

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            id: UserId::new("u-1"),
            name: name.to_string(),
            email: Email::parse("asha@example.com").unwrap(),
            role: Role::Customer,
            addresses: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_starts_loading() {
        let core: SessionCore<UserProfile> = SessionCore::new(Arc::new(MemoryStore::new()));
        assert_eq!(core.state(), SessionState::Loading);
    }

    #[test]
    fn test_sign_out_invalidates_inflight_restore() {
        let core: SessionCore<UserProfile> = SessionCore::new(Arc::new(MemoryStore::new()));
        let snapshot = core.generation();

        core.sign_out();

        // The restoration finished after the sign-out; its result loses.
        let applied =
            core.commit_if_current(snapshot, SessionState::Authenticated(profile("Asha")));
        assert!(!applied);
        assert_eq!(core.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_commit_applies_when_generation_unchanged() {
        let core: SessionCore<UserProfile> = SessionCore::new(Arc::new(MemoryStore::new()));
        let snapshot = core.generation();

        let applied =
            core.commit_if_current(snapshot, SessionState::Authenticated(profile("Asha")));
        assert!(applied);
        assert!(core.state().is_authenticated());
    }
}
