//! User-facing authentication errors

use eventhub_identity::{codes, ProviderError};
use thiserror::Error;

/// Authentication failure as shown to the user.
///
/// The display string is the message a view renders; it never contains the
/// provider's raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AuthError {
    #[error("This email is already registered")]
    EmailAlreadyInUse,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("No account found with this email")]
    UserNotFound,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("Too many attempts. Please try again later")]
    TooManyRequests,

    #[error("An error occurred. Please try again")]
    Unknown,
}

/// Provider code to user-facing error. Codes not listed map to `Unknown`.
pub const PROVIDER_ERROR_CODES: &[(&str, AuthError)] = &[
    (codes::EMAIL_ALREADY_IN_USE, AuthError::EmailAlreadyInUse),
    (codes::INVALID_EMAIL, AuthError::InvalidEmail),
    (codes::USER_NOT_FOUND, AuthError::UserNotFound),
    (codes::WRONG_PASSWORD, AuthError::WrongPassword),
    (codes::WEAK_PASSWORD, AuthError::WeakPassword),
    (codes::TOO_MANY_REQUESTS, AuthError::TooManyRequests),
];

impl AuthError {
    /// Translate a provider code
    pub fn from_code(code: &str) -> Self {
        PROVIDER_ERROR_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, err)| *err)
            .unwrap_or(AuthError::Unknown)
    }

    /// The message a view displays for this error
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        AuthError::from_code(err.code())
    }
}

impl From<&ProviderError> for AuthError {
    fn from(err: &ProviderError) -> Self {
        AuthError::from_code(err.code())
    }
}
