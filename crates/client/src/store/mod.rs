//! Durable credential storage.
//!
//! The store is a flat string key-value surface with two disjoint key
//! namespaces, one per identity: the end-user slot and the admin slot. Each
//! slot holds a bearer token and a cached profile record under separate
//! keys. The session managers are the only writers; the gateway reads
//! tokens and clears the user slot on forced logout.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Errors from the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage I/O failed.
    #[error("credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded or decoded.
    #[error("credential store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The two independent credential slots.
///
/// The namespaces never share keys and are never cross-read by the wrong
/// role's request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// End-user identity.
    User,
    /// Admin identity.
    Admin,
}

impl Namespace {
    /// Storage key holding the bearer token.
    #[must_use]
    pub const fn token_key(self) -> &'static str {
        match self {
            Self::User => "auth_token",
            Self::Admin => "admin_token",
        }
    }

    /// Storage key holding the cached profile record.
    #[must_use]
    pub const fn profile_key(self) -> &'static str {
        match self {
            Self::User => "auth_profile",
            Self::Admin => "admin_profile",
        }
    }
}

/// A persisted credential: opaque bearer token plus cached profile.
#[derive(Debug, Clone)]
pub struct Credential<P> {
    /// Opaque bearer token.
    pub token: SecretString,
    /// Cached profile record, as fresh as the last persist.
    pub profile: P,
}

/// Durable string key-value storage.
///
/// Implementations must be cheap to call from the request path; the gateway
/// reads a token on every outbound call.
pub trait CredentialStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Load the credential persisted in `namespace`, if any.
///
/// A slot is only considered present when both the token and a parseable
/// profile exist. A token with a corrupt profile record is treated as
/// absent and the slot is cleared, matching the policy that staleness is
/// never trusted past one failed read.
///
/// # Errors
///
/// Returns `StoreError` only for storage I/O failures, not for corrupt
/// records (those clear the slot and yield `Ok(None)`).
pub fn load_credential<P: DeserializeOwned>(
    store: &dyn CredentialStore,
    namespace: Namespace,
) -> Result<Option<Credential<P>>, StoreError> {
    let Some(token) = store.get(namespace.token_key())? else {
        return Ok(None);
    };
    let Some(raw_profile) = store.get(namespace.profile_key())? else {
        return Ok(None);
    };

    match serde_json::from_str::<P>(&raw_profile) {
        Ok(profile) => Ok(Some(Credential {
            token: SecretString::from(token),
            profile,
        })),
        Err(err) => {
            warn!(%err, ?namespace, "discarding credential with corrupt profile record");
            clear_credential(store, namespace)?;
            Ok(None)
        }
    }
}

/// Persist a credential into `namespace`, replacing any previous one.
///
/// # Errors
///
/// Returns `StoreError` if the profile cannot be serialized or storage
/// cannot be written.
pub fn save_credential<P: Serialize>(
    store: &dyn CredentialStore,
    namespace: Namespace,
    credential: &Credential<P>,
) -> Result<(), StoreError> {
    let raw_profile = serde_json::to_string(&credential.profile)?;
    store.put(namespace.token_key(), credential.token.expose_secret())?;
    store.put(namespace.profile_key(), &raw_profile)?;
    Ok(())
}

/// Update only the cached profile of an already-persisted credential.
///
/// # Errors
///
/// Returns `StoreError` if the profile cannot be serialized or storage
/// cannot be written.
pub fn save_profile<P: Serialize>(
    store: &dyn CredentialStore,
    namespace: Namespace,
    profile: &P,
) -> Result<(), StoreError> {
    let raw_profile = serde_json::to_string(profile)?;
    store.put(namespace.profile_key(), &raw_profile)
}

/// Remove both keys of `namespace`. Clearing an empty slot is a no-op.
///
/// # Errors
///
/// Returns `StoreError` if the underlying storage cannot be written.
pub fn clear_credential(
    store: &dyn CredentialStore,
    namespace: Namespace,
) -> Result<(), StoreError> {
    store.remove(namespace.token_key())?;
    store.remove(namespace.profile_key())?;
    Ok(())
}

/// Read just the bearer token of `namespace`, if present.
///
/// Used by the gateway's request path; a store read failure is logged and
/// treated as "no token" so an outbound request degrades to unauthenticated
/// rather than failing before it is sent.
#[must_use]
pub fn token(store: &dyn CredentialStore, namespace: Namespace) -> Option<String> {
    match store.get(namespace.token_key()) {
        Ok(token) => token,
        Err(err) => {
            warn!(%err, ?namespace, "credential store read failed; sending unauthenticated");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
    }

    #[test]
    fn test_namespaces_are_disjoint() {
        assert_ne!(Namespace::User.token_key(), Namespace::Admin.token_key());
        assert_ne!(
            Namespace::User.profile_key(),
            Namespace::Admin.profile_key()
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = MemoryStore::new();
        let credential = Credential {
            token: SecretString::from("tok-1"),
            profile: Profile {
                name: "Asha".to_string(),
            },
        };
        save_credential(&store, Namespace::User, &credential).unwrap();

        let loaded: Credential<Profile> = load_credential(&store, Namespace::User)
            .unwrap()
            .expect("credential present");
        assert_eq!(loaded.token.expose_secret(), "tok-1");
        assert_eq!(loaded.profile.name, "Asha");
    }

    #[test]
    fn test_load_absent_slot() {
        let store = MemoryStore::new();
        let loaded: Option<Credential<Profile>> =
            load_credential(&store, Namespace::Admin).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_clear_is_namespace_scoped() {
        let store = MemoryStore::new();
        let user = Credential {
            token: SecretString::from("user-tok"),
            profile: Profile {
                name: "user".to_string(),
            },
        };
        let admin = Credential {
            token: SecretString::from("admin-tok"),
            profile: Profile {
                name: "admin".to_string(),
            },
        };
        save_credential(&store, Namespace::User, &user).unwrap();
        save_credential(&store, Namespace::Admin, &admin).unwrap();

        clear_credential(&store, Namespace::User).unwrap();

        let user_slot: Option<Credential<Profile>> =
            load_credential(&store, Namespace::User).unwrap();
        assert!(user_slot.is_none());
        assert_eq!(token(&store, Namespace::Admin).as_deref(), Some("admin-tok"));
    }

    #[test]
    fn test_corrupt_profile_clears_slot() {
        let store = MemoryStore::new();
        store.put(Namespace::User.token_key(), "tok").unwrap();
        store.put(Namespace::User.profile_key(), "{not json").unwrap();

        let loaded: Option<Credential<Profile>> =
            load_credential(&store, Namespace::User).unwrap();
        assert!(loaded.is_none());
        // The broken slot was discarded entirely.
        assert!(token(&store, Namespace::User).is_none());
    }
}
