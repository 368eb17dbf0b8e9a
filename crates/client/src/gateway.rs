//! HTTP gateway.
//!
//! Every backend call flows through [`Gateway`]. It owns the three
//! cross-cutting concerns no call site should repeat:
//!
//! - **Request authentication** - the target path is classified as
//!   admin-space or user-space and the matching bearer token is attached
//!   from the credential store.
//! - **Error normalization** - every failure becomes an [`ApiError`].
//! - **Authorization side effects** - a 401 outside the login endpoints
//!   force-clears the user credential and redirects to the login surface.
//!   No other component mutates session state on a network error.
//!
//! All error branches re-propagate after their side effects so the calling
//! code path can still settle local UI state (e.g. stop a busy spinner).

use std::sync::{Arc, Mutex};

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::store::{self, CredentialStore, Namespace};

/// Path of the general sign-in surface.
pub const AUTH_PATH: &str = "/auth";

/// Path of the admin sign-in surface.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Path prefixes served by the admin-space API.
///
/// Product, order, and user management endpoints are reachable by both
/// roles, so admin-space requests fall back to the user token when no admin
/// token is present.
const ADMIN_SPACE_PREFIXES: &[&str] = &["/api/admin", "/api/products", "/api/orders", "/api/users"];

/// Whether `path` targets the admin-space API.
#[must_use]
pub fn is_admin_space(path: &str) -> bool {
    ADMIN_SPACE_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Whether `path` is a login endpoint.
///
/// A 401 from a login endpoint means "wrong credentials", which is the
/// caller's to display, not a session invalidation event.
#[must_use]
pub fn is_login_endpoint(path: &str) -> bool {
    path.contains("/login")
}

/// Whether the user is already on a sign-in surface.
fn on_auth_surface(current_path: &str) -> bool {
    current_path == AUTH_PATH || current_path.contains(ADMIN_LOGIN_PATH)
}

// =============================================================================
// Collaborator traits
// =============================================================================

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-facing notification emitted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Notice {
    fn error(title: &str, body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.to_string(),
            body: body.into(),
        }
    }
}

/// Sink for user-facing notifications (the rendering layer's toast).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Navigation surface (the rendering layer's location handling).
pub trait Navigator: Send + Sync {
    /// Path the user is currently on.
    fn current_path(&self) -> String;

    /// Force navigation to `path`.
    fn navigate(&self, path: &str);
}

/// [`Notifier`] that logs notices through `tracing`.
///
/// Used by headless consumers such as the CLI.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => info!(title = %notice.title, "{}", notice.body),
            Severity::Warning => warn!(title = %notice.title, "{}", notice.body),
            Severity::Error => tracing::error!(title = %notice.title, "{}", notice.body),
        }
    }
}

/// [`Navigator`] that tracks the current path in memory.
///
/// Headless consumers set the path explicitly; forced navigations are
/// recorded and logged.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    /// Create a navigator positioned at `path`.
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Move to `path` without recording a forced navigation.
    pub fn set_current_path(&self, path: &str) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        path.clone_into(&mut current);
    }

    /// Forced navigations performed so far, oldest first.
    #[must_use]
    pub fn forced_navigations(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, path: &str) {
        info!(%path, "forced navigation");
        self.set_current_path(path);
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(path.to_string());
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Error body shape used by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// The single outbound channel to the backend.
///
/// Cheap to clone; all clones share one connection pool and one view of the
/// credential store.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    /// Create a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be constructed.
    pub fn new(
        config: &ClientConfig,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("OAKLINE_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                client,
                base_url: config.api_base_url.clone(),
                store,
                notifier,
                navigator,
            }),
        })
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` per the gateway's response classification.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    /// POST a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` per the gateway's response classification.
    pub async fn post<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// PUT a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` per the gateway's response classification.
    pub async fn put<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// DELETE a resource, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` per the gateway's response classification.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    /// Bearer token for a request to `path`, honoring the route class.
    fn token_for(&self, path: &str) -> Option<String> {
        if is_admin_space(path) {
            store::token(self.inner.store.as_ref(), Namespace::Admin)
                .or_else(|| store::token(self.inner.store.as_ref(), Namespace::User))
        } else {
            store::token(self.inner.store.as_ref(), Namespace::User)
        }
    }

    async fn request<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let text = self.execute(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(%path, error = %e, "failed to decode backend response");
            ApiError::InvalidResponse(e.to_string())
        })
    }

    /// Send the request and classify the outcome, returning the raw body
    /// text on success.
    #[instrument(skip_all, fields(%method, %path))]
    async fn execute<B: serde::Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let url = self.inner.base_url.join(path).map_err(|e| {
            ApiError::InvalidResponse(format!("invalid request path {path}: {e}"))
        })?;

        let mut request = self.inner.client.request(method, url);
        if let Some(token) = self.token_for(path) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                // Network failure: notify, never touch session state.
                self.inner.notifier.notify(Notice::error(
                    "Network Error",
                    "Unable to connect to the server. Please check your connection.",
                ));
                return Err(ApiError::Network(err));
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(ApiError::Network)?;

        if status.is_success() {
            debug!(status = %status, "request succeeded");
            return Ok(text);
        }

        Err(self.classify_failure(path, status, &text))
    }

    /// Apply the response classification table and its side effects.
    fn classify_failure(&self, path: &str, status: StatusCode, body: &str) -> ApiError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message);

        match status {
            StatusCode::UNAUTHORIZED => {
                let message =
                    message.unwrap_or_else(|| "authentication required".to_string());
                if is_login_endpoint(path) {
                    // Login failure is the caller's to display.
                    return ApiError::Unauthorized { message };
                }

                let current = self.inner.navigator.current_path();
                if !on_auth_surface(&current) {
                    if let Err(err) =
                        store::clear_credential(self.inner.store.as_ref(), Namespace::User)
                    {
                        warn!(%err, "failed to clear user credential after 401");
                    }
                    self.inner.notifier.notify(Notice::error(
                        "Session Expired",
                        "Please login again to continue.",
                    ));
                    let destination = if current.contains("/admin") {
                        ADMIN_LOGIN_PATH
                    } else {
                        AUTH_PATH
                    };
                    self.inner.navigator.navigate(destination);
                }
                ApiError::Unauthorized { message }
            }
            StatusCode::FORBIDDEN => {
                let message = message.unwrap_or_else(|| {
                    "You do not have permission to perform this action.".to_string()
                });
                self.inner
                    .notifier
                    .notify(Notice::error("Access Denied", message.clone()));
                ApiError::Forbidden { message }
            }
            StatusCode::NOT_FOUND => {
                let message = message
                    .unwrap_or_else(|| "The requested resource was not found.".to_string());
                self.inner
                    .notifier
                    .notify(Notice::error("Not Found", message.clone()));
                ApiError::NotFound { message }
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                self.inner.notifier.notify(Notice::error(
                    "Server Error",
                    "An internal server error occurred. Please try again later.",
                ));
                ApiError::Server
            }
            other => {
                // Only backend-authored messages are worth surfacing.
                let message = if let Some(message) = message {
                    self.inner
                        .notifier
                        .notify(Notice::error("Error", message.clone()));
                    message
                } else {
                    format!("request failed ({other})")
                };
                ApiError::Backend {
                    status: other.as_u16(),
                    message,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_space_classification() {
        assert!(is_admin_space("/api/admin/login"));
        assert!(is_admin_space("/api/products/64fa"));
        assert!(is_admin_space("/api/orders"));
        assert!(is_admin_space("/api/users"));
        assert!(!is_admin_space("/api/contact"));
    }

    #[test]
    fn test_login_endpoint_classification() {
        assert!(is_login_endpoint("/api/users/login"));
        assert!(is_login_endpoint("/api/admin/login"));
        assert!(!is_login_endpoint("/api/users/profile"));
    }

    #[test]
    fn test_auth_surface_detection() {
        assert!(on_auth_surface("/auth"));
        assert!(on_auth_surface("/admin/login"));
        assert!(!on_auth_surface("/admin/orders"));
        assert!(!on_auth_surface("/shop"));
    }

    #[test]
    fn test_memory_navigator_records_forced_navigations() {
        let navigator = MemoryNavigator::at("/admin/orders");
        navigator.navigate(ADMIN_LOGIN_PATH);
        assert_eq!(navigator.current_path(), ADMIN_LOGIN_PATH);
        assert_eq!(navigator.forced_navigations(), vec![ADMIN_LOGIN_PATH]);
    }
}
