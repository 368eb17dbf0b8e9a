//! Admin console session.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, instrument, warn};

use crate::api::AdminApi;
use crate::error::SessionError;
use crate::gateway::Gateway;
use crate::models::AdminProfile;
use crate::store::{self, Credential, CredentialStore};

use super::{Profile, SessionCore, SessionState};

/// The admin console session.
///
/// Kept entirely separate from [`super::AuthSession`]: its own credential
/// slot, its own state, its own lifecycle. Unlike the user session it does
/// not revalidate the cached profile at startup; an expired admin token
/// surfaces on the first authenticated admin request instead.
pub struct AdminSession {
    core: SessionCore<AdminProfile>,
    api: AdminApi,
}

impl AdminSession {
    #[must_use]
    pub fn new(gateway: Gateway, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            core: SessionCore::new(store),
            api: AdminApi::new(gateway),
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState<AdminProfile> {
        self.core.state()
    }

    /// Restore the session from the credential store without a network
    /// round trip.
    #[instrument(skip_all)]
    pub fn restore(&self) {
        let generation = self.core.generation();

        match store::load_credential::<AdminProfile>(self.core.store(), AdminProfile::NAMESPACE) {
            Ok(Some(credential)) => {
                debug!(admin = %credential.profile.id, "admin session restored from cache");
                self.core.commit_if_current(
                    generation,
                    SessionState::Authenticated(credential.profile),
                );
            }
            Ok(None) => {
                self.core
                    .commit_if_current(generation, SessionState::Unauthenticated);
            }
            Err(err) => {
                warn!(%err, "credential store unreadable; starting signed out");
                self.core
                    .commit_if_current(generation, SessionState::Unauthenticated);
            }
        }
    }

    /// Sign in to the admin console.
    ///
    /// The response shape is validated before anything is persisted: a 200
    /// with a missing or empty token, or a missing admin record, yields
    /// [`SessionError::InvalidResponse`] and leaves both the state and the
    /// store untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on backend rejection or a malformed response.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminProfile, SessionError> {
        let response = self.api.login(email, password).await?;

        let (Some(token), Some(admin)) = (response.token, response.admin) else {
            warn!("admin login response missing token or admin record");
            return Err(SessionError::InvalidResponse);
        };
        if token.is_empty() {
            warn!("admin login response carried an empty token");
            return Err(SessionError::InvalidResponse);
        }

        let credential = Credential {
            token: SecretString::from(token),
            profile: admin.clone(),
        };
        if let Err(err) =
            store::save_credential(self.core.store(), AdminProfile::NAMESPACE, &credential)
        {
            warn!(%err, "failed to persist admin credential; session will not survive restart");
        }
        self.core.authenticate(admin.clone());
        Ok(admin)
    }

    /// Sign out of the admin console locally.
    ///
    /// Clears only the admin credential slot; a user session signed in
    /// alongside is unaffected.
    pub fn logout(&self) {
        self.core.sign_out();
    }
}
