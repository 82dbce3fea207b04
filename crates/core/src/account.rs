//! Account credential constants and validation.
//!
//! Passwords are accepted only as input and are never persisted in clear;
//! see [`crate::crypto::PasswordCipher`].

use validator::ValidateUrl;

use crate::error::CoreError;
use crate::patch::Patch;
use crate::validation::{check_max_len, optional_text_patch, required_text, required_text_patch};

pub const MAX_ACCOUNT_NAME_LEN: usize = 255;
pub const MAX_USERNAME_LEN: usize = 100;
pub const MAX_ACCOUNT_TYPE_LEN: usize = 100;
pub const MAX_LOGIN_URL_LEN: usize = 2048;

/// Upper bound on plaintext password length, in bytes.
pub const MAX_PASSWORD_LEN: usize = 1024;

/// A password supplied on create or update must be non-empty.
///
/// Whitespace is significant in passwords, so only the empty string is
/// rejected (not blank ones).
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.is_empty() {
        return Err(CoreError::Validation("password must not be empty".to_string()));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "password must be at most {MAX_PASSWORD_LEN} bytes"
        )));
    }
    Ok(())
}

/// Whether an update carries a new password to encrypt.
///
/// Only a non-empty value replaces the stored ciphertext. Absent, `null`, and
/// the empty string (what a form sends when the password box is left alone)
/// all leave it untouched.
pub fn password_change(password: &Patch<String>) -> Option<&str> {
    password.value().map(String::as_str).filter(|p| !p.is_empty())
}

/// Validate a password field on update. See [`password_change`].
pub fn validate_password_patch(password: &Patch<String>) -> Result<(), CoreError> {
    match password_change(password) {
        Some(p) => validate_password(p),
        None => Ok(()),
    }
}

/// A login URL must parse as an absolute URL and fit the column.
pub fn validate_login_url(url: &str) -> Result<(), CoreError> {
    check_max_len("login_url", url, MAX_LOGIN_URL_LEN)?;
    if !url.validate_url() {
        return Err(CoreError::Validation(format!(
            "login_url '{url}' is not a valid URL"
        )));
    }
    Ok(())
}

pub fn validate_new_account(
    account_name: &str,
    username: &str,
    password: &str,
    login_url: Option<&str>,
    account_type: Option<&str>,
) -> Result<(), CoreError> {
    required_text("account_name", account_name, MAX_ACCOUNT_NAME_LEN)?;
    required_text("username", username, MAX_USERNAME_LEN)?;
    validate_password(password)?;
    if let Some(login_url) = login_url {
        validate_login_url(login_url)?;
    }
    if let Some(account_type) = account_type {
        check_max_len("account_type", account_type, MAX_ACCOUNT_TYPE_LEN)?;
    }
    Ok(())
}

pub fn validate_account_patch(
    account_name: &Patch<String>,
    username: &Patch<String>,
    password: &Patch<String>,
    login_url: &Patch<String>,
    account_type: &Patch<String>,
) -> Result<(), CoreError> {
    required_text_patch("account_name", account_name, MAX_ACCOUNT_NAME_LEN)?;
    required_text_patch("username", username, MAX_USERNAME_LEN)?;
    validate_password_patch(password)?;
    if let Some(url) = login_url.value() {
        validate_login_url(url)?;
    }
    optional_text_patch("account_type", account_type, MAX_ACCOUNT_TYPE_LEN)?;
    Ok(())
}
