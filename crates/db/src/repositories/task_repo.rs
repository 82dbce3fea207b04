//! Repository for the `tasks` table and the step lists they own.
//!
//! Every write that touches both tables runs in one transaction, so a task
//! is never observed with a partially written step list.

use std::collections::HashMap;

use chrono::Utc;
use lawmox_core::error::CoreError;
use lawmox_core::task::{
    completion_change, validate_task_status, CompletionChange, DEFAULT_TASK_PRIORITY,
    DEFAULT_TASK_STATUS, TASK_STATUS_COMPLETED,
};
use lawmox_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::field_set::FieldValue;
use crate::models::task::{CreateTask, Task, TaskColumn, TaskFilter, TaskWithSteps, UpdateTask};
use crate::models::task_step::TaskStep;
use crate::repositories::TaskStepRepo;

/// Column list for the `tasks` table.
const COLUMNS: &str = "id, entity_id, account_id, task_title, description, status, \
    priority, deadline, completion_date, created_at, updated_at";

/// Provides CRUD operations for tasks, embedding their ordered steps.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task together with its initial steps.
    ///
    /// A task created as `completed` without an explicit completion time is
    /// stamped with the current time.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> DbResult<TaskWithSteps> {
        let input = input.normalized();
        input.validate()?;

        let status = input.status.as_deref().unwrap_or(DEFAULT_TASK_STATUS);
        let priority = input.priority.as_deref().unwrap_or(DEFAULT_TASK_PRIORITY);
        let completion_date = input
            .completion_date
            .or_else(|| (status == TASK_STATUS_COMPLETED).then(Utc::now));

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tasks \
                (entity_id, account_id, task_title, description, status, priority, \
                 deadline, completion_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(input.entity_id)
            .bind(input.account_id)
            .bind(&input.task_title)
            .bind(&input.description)
            .bind(status)
            .bind(priority)
            .bind(input.deadline)
            .bind(completion_date)
            .fetch_one(&mut *tx)
            .await?;

        let steps = TaskStepRepo::insert_batch(&mut tx, task.id, &input.steps).await?;

        tx.commit().await?;
        tracing::debug!(task_id = %task.id, steps = steps.len(), "Created task");
        Ok(TaskWithSteps { task, steps })
    }

    /// Find a task by its ID, without steps.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task by its ID, enriched with its ordered steps.
    pub async fn find_by_id_with_steps(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaskWithSteps>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(task) => {
                let steps = TaskStepRepo::list_by_task(pool, task.id).await?;
                Ok(Some(TaskWithSteps { task, steps }))
            }
            None => Ok(None),
        }
    }

    /// List tasks newest first with their steps, optionally filtered by
    /// owning entity and status.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> DbResult<Vec<TaskWithSteps>> {
        if let Some(status) = &filter.status {
            validate_task_status(status)?;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE ($1::uuid IS NULL OR entity_id = $1) \
               AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC, id"
        );
        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(filter.entity_id)
            .bind(&filter.status)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = tasks.iter().map(|t| t.id).collect();
        let mut steps_by_task: HashMap<DbId, Vec<TaskStep>> = HashMap::new();
        for step in TaskStepRepo::list_by_tasks(pool, &ids).await? {
            steps_by_task.entry(step.task_id).or_default().push(step);
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let steps = steps_by_task.remove(&task.id).unwrap_or_default();
                TaskWithSteps { task, steps }
            })
            .collect())
    }

    /// Apply the supplied fields to a task, replacing its steps when a step
    /// list is given.
    ///
    /// A status change into or out of `completed` stamps or clears the
    /// completion time unless the caller sets it explicitly.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> DbResult<Option<TaskWithSteps>> {
        let input = input.normalized();
        input.validate()?;
        if input.is_empty() {
            return Err(CoreError::Validation("No fields to update".to_string()).into());
        }

        let mut tx = pool.begin().await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT status FROM tasks WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        let mut fields = input.field_set();
        if let (Some(next), true) = (input.status.value(), input.completion_date.is_absent()) {
            match completion_change(&previous, next) {
                CompletionChange::Stamp => fields.set(
                    TaskColumn::CompletionDate,
                    FieldValue::Timestamp(Some(Utc::now())),
                ),
                CompletionChange::Clear => {
                    fields.set(TaskColumn::CompletionDate, FieldValue::Timestamp(None))
                }
                CompletionChange::Keep => {}
            }
        }

        let mut query = fields.into_update("tasks", id, COLUMNS);
        let task = query
            .build_query_as::<Task>()
            .fetch_one(&mut *tx)
            .await?;

        let steps = match &input.steps {
            Some(new_steps) => {
                TaskStepRepo::delete_for_task(&mut tx, id).await?;
                TaskStepRepo::insert_batch(&mut tx, id, new_steps).await?
            }
            None => TaskStepRepo::list_by_task_in_tx(&mut tx, id).await?,
        };

        tx.commit().await?;
        Ok(Some(TaskWithSteps { task, steps }))
    }

    /// Delete a task and all of its steps.
    ///
    /// Returns `true` if the task existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed_steps = TaskStepRepo::delete_for_task(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(task_id = %id, removed_steps, "Deleted task");
        }
        Ok(deleted)
    }
}
