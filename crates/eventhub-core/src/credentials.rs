//! Credential form checks done before any provider call

use eventhub_util::is_valid_email;
use thiserror::Error;

/// Shortest password the form accepts
pub const MIN_PASSWORD_LEN: usize = 6;

/// Whether the auth form signs in or creates an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    SignIn,
    SignUp,
}

impl FormMode {
    pub fn toggled(self) -> Self {
        match self {
            FormMode::SignIn => FormMode::SignUp,
            FormMode::SignUp => FormMode::SignIn,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormMode::SignIn => "Welcome Back",
            FormMode::SignUp => "Create Account",
        }
    }
}

/// Form problem, shown to the user as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Contents of the auth form
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialForm {
    pub mode: FormMode,
    pub email: String,
    pub password: String,
    /// Only checked in sign-up mode
    pub confirm_password: String,
}

impl CredentialForm {
    pub fn sign_in(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: FormMode::SignIn,
            email: email.into(),
            password: password.into(),
            confirm_password: String::new(),
        }
    }

    pub fn sign_up(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            mode: FormMode::SignUp,
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Run the checks in order and report the first failure
    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }

        if !is_valid_email(&self.email) {
            return Err(FormError::InvalidEmail);
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }

        if self.mode == FormMode::SignUp && self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }

        Ok(())
    }
}

impl std::fmt::Debug for CredentialForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialForm")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
