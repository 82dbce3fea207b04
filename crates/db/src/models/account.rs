//! Account credential model and DTOs.
//!
//! [`Account`] has no password field of any kind: the repository never
//! selects `encrypted_password` into it, so no read, create, or update result
//! can carry the ciphertext to a caller.

use lawmox_core::account::{validate_account_patch, validate_new_account};
use lawmox_core::error::CoreError;
use lawmox_core::patch::Patch;
use lawmox_core::types::{DbId, Timestamp};
use lawmox_core::validation::{blank_to_none, blank_to_null, trim_owned};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::field_set::{Column, FieldSet};

/// An account row from the `accounts` table, without its password.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub entity_id: DbId,
    pub account_name: String,
    pub username: String,
    pub login_url: Option<String>,
    pub account_type: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new account. `password` is plaintext input only.
#[derive(Clone, Deserialize)]
pub struct CreateAccount {
    pub entity_id: DbId,
    pub account_name: String,
    pub username: String,
    pub password: String,
    pub login_url: Option<String>,
    pub account_type: Option<String>,
    pub notes: Option<String>,
}

impl std::fmt::Debug for CreateAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAccount")
            .field("entity_id", &self.entity_id)
            .field("account_name", &self.account_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("login_url", &self.login_url)
            .field("account_type", &self.account_type)
            .finish_non_exhaustive()
    }
}

impl CreateAccount {
    /// Blank optional strings are stored as `NULL`. The username is trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            entity_id: self.entity_id,
            account_name: self.account_name.clone(),
            username: trim_owned(&self.username),
            password: self.password.clone(),
            login_url: blank_to_none(self.login_url.clone()),
            account_type: blank_to_none(self.account_type.clone()),
            notes: blank_to_none(self.notes.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_new_account(
            &self.account_name,
            &self.username,
            &self.password,
            self.login_url.as_deref(),
            self.account_type.as_deref(),
        )
    }
}

/// DTO for partially updating an account.
///
/// A non-empty `password` is re-encrypted and replaces the stored
/// ciphertext; absent, `null`, or `""` leave it as is.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAccount {
    pub entity_id: Patch<DbId>,
    pub account_name: Patch<String>,
    pub username: Patch<String>,
    pub password: Patch<String>,
    pub login_url: Patch<String>,
    pub account_type: Patch<String>,
    pub notes: Patch<String>,
}

impl std::fmt::Debug for UpdateAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateAccount")
            .field("entity_id", &self.entity_id)
            .field("account_name", &self.account_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("login_url", &self.login_url)
            .field("account_type", &self.account_type)
            .finish_non_exhaustive()
    }
}

/// Updatable columns of `accounts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountColumn {
    EntityId,
    AccountName,
    Username,
    EncryptedPassword,
    LoginUrl,
    AccountType,
    Notes,
}

impl Column for AccountColumn {
    fn name(self) -> &'static str {
        match self {
            AccountColumn::EntityId => "entity_id",
            AccountColumn::AccountName => "account_name",
            AccountColumn::Username => "username",
            AccountColumn::EncryptedPassword => "encrypted_password",
            AccountColumn::LoginUrl => "login_url",
            AccountColumn::AccountType => "account_type",
            AccountColumn::Notes => "notes",
        }
    }
}

impl UpdateAccount {
    /// Blank optional strings clear the column. The username is trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            entity_id: self.entity_id.clone(),
            account_name: self.account_name.clone(),
            username: self.username.clone().map(|v| trim_owned(&v)),
            password: self.password.clone(),
            login_url: blank_to_null(self.login_url.clone()),
            account_type: blank_to_null(self.account_type.clone()),
            notes: blank_to_null(self.notes.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if matches!(self.entity_id, Patch::Null) {
            return Err(CoreError::Validation("entity_id cannot be null".to_string()));
        }
        validate_account_patch(
            &self.account_name,
            &self.username,
            &self.password,
            &self.login_url,
            &self.account_type,
        )
    }

    /// Map every field except the password onto its column.
    ///
    /// The password is plaintext here; the repository encrypts it and adds
    /// [`AccountColumn::EncryptedPassword`] itself.
    pub fn field_set_without_password(&self) -> FieldSet<AccountColumn> {
        let mut fields = FieldSet::new();
        fields.id(AccountColumn::EntityId, self.entity_id.clone());
        fields.text(AccountColumn::AccountName, self.account_name.clone());
        fields.text(AccountColumn::Username, self.username.clone());
        fields.text(AccountColumn::LoginUrl, self.login_url.clone());
        fields.text(AccountColumn::AccountType, self.account_type.clone());
        fields.text(AccountColumn::Notes, self.notes.clone());
        fields
    }
}
