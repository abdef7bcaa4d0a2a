// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! This module enforces password requirements for operator credentials.
//! It applies to operator accounts only; applicant CGI passwords are
//! opaque external credentials the engine never interprets.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password matches a forbidden value.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password against the policy.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to validate
    /// * `confirmation` - The password confirmation
    /// * `login_name` - The operator login name (password must not
    ///   match)
    /// * `display_name` - The operator display name (password must not
    ///   match)
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password does not meet
    /// policy requirements.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        login_name: &str,
        display_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.len() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        if password.eq_ignore_ascii_case(login_name) {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("login name"),
            });
        }
        if password.eq_ignore_ascii_case(display_name) {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("display name"),
            });
        }

        Ok(())
    }

    /// Counts the character classes present in a password.
    fn calculate_complexity(password: &str) -> usize {
        let has_upper: bool = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lower: bool = password.chars().any(|c| c.is_ascii_lowercase());
        let has_digit: bool = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol: bool = password.chars().any(|c| !c.is_ascii_alphanumeric());

        usize::from(has_upper) + usize::from(has_lower) + usize::from(has_digit)
            + usize::from(has_symbol)
    }
}
