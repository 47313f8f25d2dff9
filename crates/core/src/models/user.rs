//! Authentication payloads.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::Violations;

/// Minimum password length accepted by `/user/login` and `/user/register`.
pub const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let mut violations = Violations::new();
        violations.require_non_blank("email", &self.email, "Email is required");
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            violations.push("email", "Email address is not valid");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            violations.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        violations.into_result()
    }

    /// Sign-up additionally requires the confirmation to match.
    pub fn validate_sign_up(&self, confirm_password: &str) -> Result<(), CoreError> {
        if self.password != confirm_password {
            return Err(CoreError::invalid_field(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        self.validate()
    }
}

/// Response of `/user/login` and `/user/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credentials() {
        assert!(Credentials::new("a@b.c", "secret").validate().is_ok());
    }

    #[test]
    fn short_password_and_bad_email() {
        let err = Credentials::new("nobody", "ab").validate().unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn mismatched_confirmation() {
        let err = Credentials::new("a@b.c", "secret")
            .validate_sign_up("secreT")
            .unwrap_err();
        assert_eq!(err.violations()[0].message, "Passwords do not match");
    }
}
