//! End-user account endpoints.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::UserProfile;

use super::Ack;

/// Response of the register and login endpoints.
///
/// Both fields are optional on the wire; the session layer refuses to treat
/// a response as a successful login unless both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    email: &'a str,
    otp: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: UserProfile,
}

/// End-user account service.
#[derive(Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.gateway
            .post(
                "/api/users/register",
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
            )
            .await
    }

    /// Sign in with email and password.
    ///
    /// A 401 from this endpoint means wrong credentials and passes through
    /// without session side effects.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.gateway
            .post("/api/users/login", &LoginRequest { email, password })
            .await
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let response: ProfileResponse = self.gateway.get("/api/users/profile").await?;
        Ok(response.user)
    }

    /// Request a password-reset OTP to be emailed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn forgot_password(&self, email: &str) -> Result<Ack, ApiError> {
        self.gateway
            .post("/api/users/forgot-password", &EmailRequest { email })
            .await
    }

    /// Check an OTP without consuming it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Ack, ApiError> {
        self.gateway
            .post("/api/users/verify-otp", &VerifyOtpRequest { email, otp })
            .await
    }

    /// Reset the password using a verified OTP.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn reset_password_with_otp(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<Ack, ApiError> {
        self.gateway
            .post(
                "/api/users/reset-password-otp",
                &ResetPasswordRequest {
                    email,
                    otp,
                    new_password,
                },
            )
            .await
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<Ack, ApiError> {
        self.gateway
            .put(
                "/api/users/change-password",
                &ChangePasswordRequest {
                    current_password,
                    new_password,
                },
            )
            .await
    }
}
