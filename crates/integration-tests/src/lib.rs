//! Test harness for the Oakline client.
//!
//! Wires a real [`Gateway`] against a mock HTTP server with in-memory
//! collaborators so tests can observe every side effect the client
//! performs: notices raised, navigations forced, and credential slots
//! written or cleared.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

use oakline_client::checkout::{
    PaymentConfirmation, PaymentError, PaymentRequest, PaymentWidget,
};
use oakline_client::config::ClientConfig;
use oakline_client::gateway::{Gateway, MemoryNavigator, Navigator, Notice, Notifier};
use oakline_client::models::{AdminProfile, Product, UserProfile};
use oakline_client::store::{self, Credential, CredentialStore, MemoryStore, Namespace};

/// A [`Notifier`] that records every notice for later assertions.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    /// Notices raised so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Whether a notice with `title` was raised.
    #[must_use]
    pub fn saw(&self, title: &str) -> bool {
        self.notices().iter().any(|notice| notice.title == title)
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}

/// What a [`ScriptedWidget`] should do when invoked.
#[derive(Debug, Clone, Copy)]
pub enum WidgetScript {
    /// Complete the payment with fixed references.
    Approve,
    /// Dismiss the widget without paying.
    Cancel,
}

/// A [`PaymentWidget`] that follows a script instead of driving real UI.
pub struct ScriptedWidget {
    script: WidgetScript,
    requests: Mutex<Vec<PaymentRequest>>,
}

impl ScriptedWidget {
    #[must_use]
    pub const fn new(script: WidgetScript) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Payment requests the widget was asked to collect.
    #[must_use]
    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PaymentWidget for ScriptedWidget {
    async fn collect(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());
        match self.script {
            WidgetScript::Approve => Ok(PaymentConfirmation {
                payment_id: "pay_test_1".to_string(),
                payment_signature: "sig_test_1".to_string(),
            }),
            WidgetScript::Cancel => Err(PaymentError::Cancelled),
        }
    }
}

/// Everything a test needs to drive the client against a mock backend.
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<CollectingNotifier>,
    pub navigator: Arc<MemoryNavigator>,
    pub gateway: Gateway,
}

impl TestHarness {
    /// Build a harness whose gateway targets `base_url`, positioned at `/`.
    ///
    /// # Panics
    ///
    /// Panics if `base_url` is not a valid URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let config = ClientConfig {
            api_base_url: Url::parse(base_url).expect("mock server URL"),
            request_timeout: Duration::from_secs(5),
            credentials_path: PathBuf::from("unused"),
        };
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(CollectingNotifier::default());
        let navigator = Arc::new(MemoryNavigator::at("/"));
        let gateway = Gateway::new(
            &config,
            Arc::clone(&store) as Arc<dyn CredentialStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
        )
        .expect("gateway construction");

        Self {
            store,
            notifier,
            navigator,
            gateway,
        }
    }

    /// Store handle with the concrete type erased, as the sessions take it.
    #[must_use]
    pub fn store_handle(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store) as Arc<dyn CredentialStore>
    }

    /// Seed a signed-in user credential.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory store rejects the write.
    pub fn seed_user(&self, token: &str, profile: &UserProfile) {
        let credential = Credential {
            token: SecretString::from(token),
            profile: profile.clone(),
        };
        store::save_credential(self.store.as_ref(), Namespace::User, &credential)
            .expect("seed user credential");
    }

    /// Seed a signed-in admin credential.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory store rejects the write.
    pub fn seed_admin(&self, token: &str, profile: &AdminProfile) {
        let credential = Credential {
            token: SecretString::from(token),
            profile: profile.clone(),
        };
        store::save_credential(self.store.as_ref(), Namespace::Admin, &credential)
            .expect("seed admin credential");
    }

    /// The persisted token of `namespace`, if any.
    #[must_use]
    pub fn stored_token(&self, namespace: Namespace) -> Option<String> {
        store::token(self.store.as_ref(), namespace)
    }
}

/// User profile JSON in the backend's wire shape.
#[must_use]
pub fn user_json(name: &str, role: &str) -> Value {
    json!({
        "_id": "u-1",
        "name": name,
        "email": "asha@example.com",
        "role": role,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

/// Admin profile JSON in the backend's wire shape.
#[must_use]
pub fn admin_json(name: &str) -> Value {
    json!({
        "_id": "a-1",
        "adminName": name,
        "email": "ops@oakline.shop",
        "role": "admin",
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

/// Deserialize a [`UserProfile`] fixture.
///
/// # Panics
///
/// Panics if the fixture shape drifts from the model.
#[must_use]
pub fn user_profile(name: &str, role: &str) -> UserProfile {
    serde_json::from_value(user_json(name, role)).expect("user fixture")
}

/// Deserialize an [`AdminProfile`] fixture.
///
/// # Panics
///
/// Panics if the fixture shape drifts from the model.
#[must_use]
pub fn admin_profile(name: &str) -> AdminProfile {
    serde_json::from_value(admin_json(name)).expect("admin fixture")
}

/// Deserialize a [`Product`] fixture.
///
/// # Panics
///
/// Panics if the fixture shape drifts from the model.
#[must_use]
pub fn product(id: &str, name: &str, price: u32) -> Product {
    serde_json::from_value(json!({
        "_id": id,
        "name": name,
        "price": price,
        "category": "Kitchen",
        "inStock": true,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    }))
    .expect("product fixture")
}
