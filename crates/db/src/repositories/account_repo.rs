//! Repository for the `accounts` table.
//!
//! Passwords are encrypted with the caller's [`PasswordCipher`] before they
//! are bound; `encrypted_password` is never part of [`COLUMNS`].

use lawmox_core::account::password_change;
use lawmox_core::crypto::PasswordCipher;
use lawmox_core::error::CoreError;
use lawmox_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::field_set::FieldValue;
use crate::models::account::{Account, AccountColumn, CreateAccount, UpdateAccount};

/// Column list for the `accounts` table, minus the password ciphertext.
const COLUMNS: &str = "id, entity_id, account_name, username, login_url, account_type, \
    notes, created_at, updated_at";

/// Provides CRUD operations for stored account credentials.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account, storing only the ciphertext of its password.
    pub async fn create(
        pool: &PgPool,
        cipher: &PasswordCipher,
        input: &CreateAccount,
    ) -> DbResult<Account> {
        let input = input.normalized();
        input.validate()?;

        let encrypted = cipher.encrypt(&input.password)?;

        let query = format!(
            "INSERT INTO accounts \
                (entity_id, account_name, username, encrypted_password, \
                 login_url, account_type, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(input.entity_id)
            .bind(&input.account_name)
            .bind(&input.username)
            .bind(&encrypted)
            .bind(&input.login_url)
            .bind(&input.account_type)
            .bind(&input.notes)
            .fetch_one(pool)
            .await?;
        Ok(account)
    }

    /// Find an account by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List accounts newest first, optionally restricted to one entity.
    pub async fn list(
        pool: &PgPool,
        entity_id: Option<DbId>,
    ) -> Result<Vec<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts \
             WHERE ($1::uuid IS NULL OR entity_id = $1) \
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// Apply the supplied fields to an account.
    ///
    /// A non-empty password is re-encrypted; otherwise the stored ciphertext
    /// is left alone. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        cipher: &PasswordCipher,
        id: DbId,
        input: &UpdateAccount,
    ) -> DbResult<Option<Account>> {
        let input = input.normalized();
        input.validate()?;

        let mut fields = input.field_set_without_password();
        if let Some(password) = password_change(&input.password) {
            let encrypted = cipher.encrypt(password)?;
            fields.set(
                AccountColumn::EncryptedPassword,
                FieldValue::Text(Some(encrypted)),
            );
        }
        if fields.is_empty() {
            return Err(CoreError::Validation("No fields to update".to_string()).into());
        }

        let mut query = fields.into_update("accounts", id, COLUMNS);
        let account = query
            .build_query_as::<Account>()
            .fetch_optional(pool)
            .await?;
        Ok(account)
    }

    /// Delete an account. Tasks that pointed at it keep existing with no
    /// account. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Read the stored ciphertext for an account.
    ///
    /// Not exposed over HTTP; used by operational tooling and tests that
    /// check what actually lands in the store.
    pub async fn find_encrypted_password(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT encrypted_password FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
