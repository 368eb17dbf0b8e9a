//! Input validation run before any network call.

use crate::error::ValidationError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Expected one-time password length.
pub const OTP_LENGTH: usize = 6;

/// Validate a password against the length policy.
///
/// # Errors
///
/// Returns `ValidationError::PasswordTooShort` when too short.
pub fn password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validate a password together with its confirmation field.
///
/// # Errors
///
/// Returns `ValidationError` when the password fails the length policy or
/// the confirmation does not match.
pub fn password_confirmation(password_value: &str, confirmation: &str) -> Result<(), ValidationError> {
    password(password_value)?;
    if password_value != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validate a one-time password: exactly six ASCII digits.
///
/// # Errors
///
/// Returns `ValidationError::InvalidOtp` otherwise.
pub fn otp(code: &str) -> Result<(), ValidationError> {
    if code.len() != OTP_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidOtp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_length() {
        assert!(password("hunter22!").is_ok());
        assert!(matches!(
            password("short"),
            Err(ValidationError::PasswordTooShort { min: 8 })
        ));
    }

    #[test]
    fn test_password_confirmation() {
        assert!(password_confirmation("hunter22!", "hunter22!").is_ok());
        assert!(matches!(
            password_confirmation("hunter22!", "hunter23!"),
            Err(ValidationError::PasswordMismatch)
        ));
        // Length is checked before the match.
        assert!(matches!(
            password_confirmation("short", "short"),
            Err(ValidationError::PasswordTooShort { .. })
        ));
    }

    #[test]
    fn test_otp_shape() {
        assert!(otp("042913").is_ok());
        assert!(otp("04291").is_err());
        assert!(otp("0429131").is_err());
        assert!(otp("04a913").is_err());
        assert!(otp("٠٤٢٩١٣").is_err());
    }
}
