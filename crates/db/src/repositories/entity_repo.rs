//! Repository for the `entities` table.

use lawmox_core::entity::DEFAULT_ENTITY_STATUS;
use lawmox_core::error::CoreError;
use lawmox_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::entity::{CreateEntity, Entity, UpdateEntity};

/// Column list for the `entities` table.
const COLUMNS: &str = "id, entity_name, ein, date_of_formation, registered_address, \
    state_of_formation, entity_type, status, created_at, updated_at";

/// Provides CRUD operations for legal entities.
pub struct EntityRepo;

impl EntityRepo {
    /// Insert a new entity. `status` defaults to `active`.
    pub async fn create(pool: &PgPool, input: &CreateEntity) -> DbResult<Entity> {
        let input = input.normalized();
        input.validate()?;

        let query = format!(
            "INSERT INTO entities \
                (entity_name, ein, date_of_formation, registered_address, \
                 state_of_formation, entity_type, status) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, $8)) \
             RETURNING {COLUMNS}"
        );
        let entity = sqlx::query_as::<_, Entity>(&query)
            .bind(&input.entity_name)
            .bind(&input.ein)
            .bind(input.date_of_formation)
            .bind(&input.registered_address)
            .bind(&input.state_of_formation)
            .bind(&input.entity_type)
            .bind(&input.status)
            .bind(DEFAULT_ENTITY_STATUS)
            .fetch_one(pool)
            .await?;
        Ok(entity)
    }

    /// Find an entity by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Entity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM entities WHERE id = $1");
        sqlx::query_as::<_, Entity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all entities, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Entity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM entities ORDER BY created_at DESC, id");
        sqlx::query_as::<_, Entity>(&query).fetch_all(pool).await
    }

    /// Apply the supplied fields to an entity.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEntity,
    ) -> DbResult<Option<Entity>> {
        let input = input.normalized();
        input.validate()?;

        let fields = input.into_field_set();
        if fields.is_empty() {
            return Err(CoreError::Validation("No fields to update".to_string()).into());
        }

        let mut query = fields.into_update("entities", id, COLUMNS);
        let entity = query
            .build_query_as::<Entity>()
            .fetch_optional(pool)
            .await?;
        Ok(entity)
    }

    /// Delete an entity.
    ///
    /// Fails with a conflict while any account or task still references it.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM entities WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(false);
        }

        let (accounts, tasks): (i64, i64) = sqlx::query_as(
            "SELECT \
                (SELECT COUNT(*) FROM accounts WHERE entity_id = $1), \
                (SELECT COUNT(*) FROM tasks WHERE entity_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if accounts > 0 || tasks > 0 {
            return Err(CoreError::Conflict(format!(
                "Entity is still referenced by {accounts} account(s) and {tasks} task(s)"
            ))
            .into());
        }

        let result = sqlx::query("DELETE FROM entities WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
