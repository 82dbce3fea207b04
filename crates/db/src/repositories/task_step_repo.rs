//! Repository for the `task_steps` table.
//!
//! Step lists are only ever written as a whole, inside the transaction of
//! the task that owns them.

use lawmox_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::task_step::{CreateTaskStep, TaskStep};

/// Column list for the `task_steps` table.
const COLUMNS: &str =
    "id, task_id, step_order, step_description, completed, completion_date, created_at";

/// Provides read access to steps and transactional batch writes.
pub struct TaskStepRepo;

impl TaskStepRepo {
    /// List the steps of one task in `step_order`.
    pub async fn list_by_task(pool: &PgPool, task_id: DbId) -> Result<Vec<TaskStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_steps WHERE task_id = $1 ORDER BY step_order"
        );
        sqlx::query_as::<_, TaskStep>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// List the steps of one task within an existing transaction.
    pub async fn list_by_task_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        task_id: DbId,
    ) -> Result<Vec<TaskStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_steps WHERE task_id = $1 ORDER BY step_order"
        );
        sqlx::query_as::<_, TaskStep>(&query)
            .bind(task_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// List the steps of several tasks at once, grouped by task and sorted
    /// by `step_order` within each task.
    pub async fn list_by_tasks(
        pool: &PgPool,
        task_ids: &[DbId],
    ) -> Result<Vec<TaskStep>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM task_steps \
             WHERE task_id = ANY($1) \
             ORDER BY task_id, step_order"
        );
        sqlx::query_as::<_, TaskStep>(&query)
            .bind(task_ids)
            .fetch_all(pool)
            .await
    }

    /// List every step of every task.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TaskStep>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_steps ORDER BY task_id, step_order");
        sqlx::query_as::<_, TaskStep>(&query).fetch_all(pool).await
    }

    /// Batch-insert the steps of a task within an existing transaction.
    ///
    /// Steps submitted as completed get their completion time stamped.
    /// Returns the stored rows sorted by `step_order`.
    pub async fn insert_batch(
        tx: &mut Transaction<'_, Postgres>,
        task_id: DbId,
        steps: &[CreateTaskStep],
    ) -> Result<Vec<TaskStep>, sqlx::Error> {
        if steps.is_empty() {
            return Ok(vec![]);
        }

        let orders: Vec<i32> = steps.iter().map(|s| s.step_order).collect();
        let descriptions: Vec<String> =
            steps.iter().map(|s| s.step_description.clone()).collect();
        let completed: Vec<bool> = steps.iter().map(|s| s.completed).collect();

        let query = format!(
            "INSERT INTO task_steps \
                (task_id, step_order, step_description, completed, completion_date) \
             SELECT $1, s.step_order, s.step_description, s.completed, \
                    CASE WHEN s.completed THEN NOW() END \
             FROM UNNEST($2::int[], $3::text[], $4::bool[]) \
                AS s(step_order, step_description, completed) \
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, TaskStep>(&query)
            .bind(task_id)
            .bind(&orders)
            .bind(&descriptions)
            .bind(&completed)
            .fetch_all(&mut **tx)
            .await?;
        rows.sort_by_key(|s| s.step_order);
        Ok(rows)
    }

    /// Delete every step of a task within an existing transaction.
    pub async fn delete_for_task(
        tx: &mut Transaction<'_, Postgres>,
        task_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_steps WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
