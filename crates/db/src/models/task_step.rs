//! Task step model and DTO.
//!
//! Steps have no standalone create or update: they are written as a whole
//! set when their task is created or when the task's step list is replaced.

use lawmox_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A step row from the `task_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskStep {
    pub id: DbId,
    pub task_id: DbId,
    /// Position within the task, unique per task, starting at 1.
    pub step_order: i32,
    pub step_description: String,
    pub completed: bool,
    /// Set when the step is stored as completed.
    pub completion_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// One step of a submitted step list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskStep {
    pub step_order: i32,
    pub step_description: String,
    #[serde(default)]
    pub completed: bool,
}
