//! Error types shared across the client.
//!
//! The gateway normalizes every backend failure into an [`ApiError`] before
//! it reaches a caller. Session managers wrap those into [`SessionError`]
//! so call sites always receive a value they can render, never a raw
//! transport failure.

use thiserror::Error;

/// Errors produced by the HTTP gateway.
///
/// Each variant corresponds to one row of the gateway's response
/// classification. The gateway has already performed any side effects
/// (notification, forced logout, redirect) by the time one of these is
/// returned; callers only need to settle their local UI state.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response received from the backend.
    #[error("unable to connect to the server")]
    Network(#[source] reqwest::Error),

    /// Status 401. Outside login endpoints the gateway has already cleared
    /// the user credential and redirected.
    #[error("{message}")]
    Unauthorized {
        /// Backend-provided message, if any.
        message: String,
    },

    /// Status 403. No session state was mutated.
    #[error("{message}")]
    Forbidden {
        /// Backend-provided message, if any.
        message: String,
    },

    /// Status 404.
    #[error("{message}")]
    NotFound {
        /// Backend-provided message, if any.
        message: String,
    },

    /// Status 500.
    #[error("internal server error")]
    Server,

    /// Any other non-success status.
    #[error("{message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Backend-provided message, or a generic fallback.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status code, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network(_) | Self::InvalidResponse(_) => None,
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Server => Some(500),
            Self::Backend { status, .. } => Some(*status),
        }
    }
}

/// Errors returned by the session managers.
///
/// A session operation either succeeds or yields one of these; the state
/// machine is left exactly where the contract says (unchanged on failed
/// sign-in, cleared on forced logout, and so on).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected the operation or was unreachable.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend answered with a structurally incomplete payload
    /// (e.g. a login response missing the token or profile).
    #[error("invalid response from server")]
    InvalidResponse,

    /// Input failed validation before any network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Input validation failures caught before any network call or persistence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Password shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum allowed length.
        min: usize,
    },

    /// Password and confirmation do not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// One-time password is not a 6-digit code.
    #[error("OTP must be a 6-digit code")]
    InvalidOtp,

    /// Email failed structural validation.
    #[error("{0}")]
    Email(#[from] oakline_core::EmailError),
}
