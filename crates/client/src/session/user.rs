//! End-user session.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, instrument, warn};

use oakline_core::Email;

use crate::api::{AuthApi, LoginResponse};
use crate::error::SessionError;
use crate::gateway::Gateway;
use crate::models::UserProfile;
use crate::store::{self, Credential, CredentialStore};
use crate::validate;

use super::{Profile, SessionCore, SessionState};

/// The end-user authentication session.
///
/// Holds the observable [`SessionState`] and owns every transition:
/// restoration at startup, sign-up, sign-in, sign-out, and best-effort
/// profile refresh. All persistence goes through the user credential slot.
pub struct AuthSession {
    core: SessionCore<UserProfile>,
    api: AuthApi,
}

impl AuthSession {
    #[must_use]
    pub fn new(gateway: Gateway, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            core: SessionCore::new(store),
            api: AuthApi::new(gateway),
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState<UserProfile> {
        self.core.state()
    }

    /// Whether the signed-in user may enter the admin console.
    #[must_use]
    pub fn grants_admin(&self) -> bool {
        self.state().profile().is_some_and(Profile::grants_admin)
    }

    /// Restore the session from the credential store.
    ///
    /// Authenticates optimistically from the cached profile, then refreshes
    /// it with a live fetch. A refresh failure discards the credential
    /// entirely rather than keeping a session the backend may have revoked.
    /// Always settles on `Authenticated` or `Unauthenticated`, unless a
    /// sign-in or sign-out won the race in the meantime.
    #[instrument(skip_all)]
    pub async fn restore(&self) {
        let generation = self.core.generation();

        let credential = match store::load_credential::<UserProfile>(
            self.core.store(),
            UserProfile::NAMESPACE,
        ) {
            Ok(credential) => credential,
            Err(err) => {
                warn!(%err, "credential store unreadable; starting signed out");
                self.core
                    .commit_if_current(generation, SessionState::Unauthenticated);
                return;
            }
        };

        let Some(credential) = credential else {
            self.core
                .commit_if_current(generation, SessionState::Unauthenticated);
            return;
        };

        // Authenticate optimistically from the cache so the UI can settle,
        // then revalidate against the backend.
        self.core.commit_if_current(
            generation,
            SessionState::Authenticated(credential.profile),
        );
        match self.api.profile().await {
            Ok(fresh) => {
                if let Err(err) =
                    store::save_profile(self.core.store(), UserProfile::NAMESPACE, &fresh)
                {
                    warn!(%err, "failed to persist refreshed profile");
                }
                debug!(user = %fresh.id, "session restored");
                self.core
                    .commit_if_current(generation, SessionState::Authenticated(fresh));
            }
            Err(err) => {
                warn!(%err, "profile refresh failed; discarding persisted session");
                if let Err(err) =
                    store::clear_credential(self.core.store(), UserProfile::NAMESPACE)
                {
                    warn!(%err, "failed to clear stale credential");
                }
                self.core
                    .commit_if_current(generation, SessionState::Unauthenticated);
            }
        }
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on invalid input, a backend rejection, or a
    /// structurally incomplete response. The state is unchanged on failure.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<UserProfile, SessionError> {
        let email = Email::parse(email).map_err(crate::error::ValidationError::from)?;
        validate::password_confirmation(password, password_confirmation)?;

        let response = self.api.register(name, email.as_str(), password).await?;
        self.install(response)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on invalid input, wrong credentials, or a
    /// structurally incomplete response. The state is unchanged on failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let email = Email::parse(email).map_err(crate::error::ValidationError::from)?;
        let response = self.api.login(email.as_str(), password).await?;
        self.install(response)
    }

    /// Sign out locally: clear the credential slot and the state.
    ///
    /// Never calls the backend, so it works offline and cannot fail on a
    /// network error.
    pub fn sign_out(&self) {
        self.core.sign_out();
    }

    /// Re-fetch the profile for an authenticated session.
    ///
    /// Best effort: a failure is logged and the cached profile stays in
    /// place. Forced logout on an expired token is the gateway's job. A
    /// sign-out racing the in-flight fetch wins: the stale result is
    /// discarded and nothing is written back to the cleared store.
    #[instrument(skip_all)]
    pub async fn refresh_profile(&self) {
        if !self.state().is_authenticated() {
            return;
        }
        let generation = self.core.generation();
        match self.api.profile().await {
            Ok(fresh) => {
                if !self
                    .core
                    .commit_if_current(generation, SessionState::Authenticated(fresh.clone()))
                {
                    return;
                }
                if let Err(err) =
                    store::save_profile(self.core.store(), UserProfile::NAMESPACE, &fresh)
                {
                    warn!(%err, "failed to persist refreshed profile");
                }
            }
            Err(err) => {
                warn!(%err, "profile refresh failed; keeping cached profile");
            }
        }
    }

    /// Request a password-reset OTP for `email`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on invalid input or backend rejection.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, SessionError> {
        let email = Email::parse(email).map_err(crate::error::ValidationError::from)?;
        let ack = self.api.forgot_password(email.as_str()).await?;
        Ok(ack.message)
    }

    /// Check a password-reset OTP without consuming it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on invalid input or backend rejection.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), SessionError> {
        let email = Email::parse(email).map_err(crate::error::ValidationError::from)?;
        validate::otp(otp)?;
        self.api.verify_otp(email.as_str(), otp).await?;
        Ok(())
    }

    /// Reset the password using a verified OTP.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on invalid input or backend rejection.
    pub async fn reset_password_with_otp(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        password_confirmation: &str,
    ) -> Result<(), SessionError> {
        let email = Email::parse(email).map_err(crate::error::ValidationError::from)?;
        validate::otp(otp)?;
        validate::password_confirmation(new_password, password_confirmation)?;
        self.api
            .reset_password_with_otp(email.as_str(), otp, new_password)
            .await?;
        Ok(())
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on invalid input or backend rejection.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        validate::password(new_password)?;
        self.api
            .change_password(current_password, new_password)
            .await?;
        Ok(())
    }

    /// Validate a login-shaped response, persist it, and authenticate.
    fn install(&self, response: LoginResponse) -> Result<UserProfile, SessionError> {
        let (Some(token), Some(user)) = (response.token, response.user) else {
            warn!("login response missing token or user");
            return Err(SessionError::InvalidResponse);
        };
        if token.is_empty() {
            warn!("login response carried an empty token");
            return Err(SessionError::InvalidResponse);
        }

        let credential = Credential {
            token: SecretString::from(token),
            profile: user.clone(),
        };
        if let Err(err) =
            store::save_credential(self.core.store(), UserProfile::NAMESPACE, &credential)
        {
            warn!(%err, "failed to persist credential; session will not survive restart");
        }
        self.core.authenticate(user.clone());
        Ok(user)
    }
}
