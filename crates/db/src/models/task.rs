//! Task model and DTOs.

use lawmox_core::error::CoreError;
use lawmox_core::patch::Patch;
use lawmox_core::task::{validate_new_task, validate_steps, validate_task_patch};
use lawmox_core::types::{Date, DbId, Timestamp};
use lawmox_core::validation::{blank_to_none, blank_to_null};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::field_set::{Column, FieldSet};
use crate::models::task_step::{CreateTaskStep, TaskStep};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub entity_id: DbId,
    pub account_id: Option<DbId>,
    pub task_title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub deadline: Option<Date>,
    pub completion_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task together with its steps, sorted by `step_order` ascending.
///
/// `steps` is always present in the JSON output, empty when the task has
/// no steps.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithSteps {
    #[serde(flatten)]
    pub task: Task,
    pub steps: Vec<TaskStep>,
}

/// DTO for creating a new task, optionally with its initial steps.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub entity_id: DbId,
    pub account_id: Option<DbId>,
    pub task_title: String,
    pub description: Option<String>,
    pub deadline: Option<Date>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
    /// Stamped automatically when the task is created as `completed`.
    pub completion_date: Option<Timestamp>,
    #[serde(default)]
    pub steps: Vec<CreateTaskStep>,
}

impl CreateTask {
    /// Blank optional strings are stored as `NULL`; blank status and
    /// priority fall back to their defaults.
    pub fn normalized(&self) -> Self {
        Self {
            entity_id: self.entity_id,
            account_id: self.account_id,
            task_title: self.task_title.clone(),
            description: blank_to_none(self.description.clone()),
            deadline: self.deadline,
            priority: blank_to_none(self.priority.clone()),
            status: blank_to_none(self.status.clone()),
            completion_date: self.completion_date,
            steps: self.steps.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_new_task(
            &self.task_title,
            self.status.as_deref(),
            self.priority.as_deref(),
        )?;
        validate_steps(step_keys(&self.steps))
    }
}

/// DTO for partially updating a task.
///
/// `steps`, when present (even as `[]`), replaces the task's entire step
/// list. When absent or `null` the steps are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTask {
    pub entity_id: Patch<DbId>,
    pub account_id: Patch<DbId>,
    pub task_title: Patch<String>,
    pub description: Patch<String>,
    pub deadline: Patch<Date>,
    pub priority: Patch<String>,
    pub status: Patch<String>,
    pub completion_date: Patch<Timestamp>,
    pub steps: Option<Vec<CreateTaskStep>>,
}

/// Updatable columns of `tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskColumn {
    EntityId,
    AccountId,
    TaskTitle,
    Description,
    Deadline,
    Priority,
    Status,
    CompletionDate,
}

impl Column for TaskColumn {
    fn name(self) -> &'static str {
        match self {
            TaskColumn::EntityId => "entity_id",
            TaskColumn::AccountId => "account_id",
            TaskColumn::TaskTitle => "task_title",
            TaskColumn::Description => "description",
            TaskColumn::Deadline => "deadline",
            TaskColumn::Priority => "priority",
            TaskColumn::Status => "status",
            TaskColumn::CompletionDate => "completion_date",
        }
    }
}

impl UpdateTask {
    /// A blank description clears the column.
    pub fn normalized(&self) -> Self {
        Self {
            description: blank_to_null(self.description.clone()),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if matches!(self.entity_id, Patch::Null) {
            return Err(CoreError::Validation("entity_id cannot be null".to_string()));
        }
        validate_task_patch(&self.task_title, &self.status, &self.priority)?;
        if let Some(steps) = &self.steps {
            validate_steps(step_keys(steps))?;
        }
        Ok(())
    }

    /// Map the scalar fields onto their columns. `steps` is handled by the
    /// repository as a separate replace operation.
    pub fn field_set(&self) -> FieldSet<TaskColumn> {
        let mut fields = FieldSet::new();
        fields.id(TaskColumn::EntityId, self.entity_id.clone());
        fields.id(TaskColumn::AccountId, self.account_id.clone());
        fields.text(TaskColumn::TaskTitle, self.task_title.clone());
        fields.text(TaskColumn::Description, self.description.clone());
        fields.date(TaskColumn::Deadline, self.deadline.clone());
        fields.text(TaskColumn::Priority, self.priority.clone());
        fields.text(TaskColumn::Status, self.status.clone());
        fields.timestamp(TaskColumn::CompletionDate, self.completion_date.clone());
        fields
    }

    /// Whether the request changes nothing at all.
    pub fn is_empty(&self) -> bool {
        self.steps.is_none() && self.field_set().is_empty()
    }
}

/// Optional filters for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub entity_id: Option<DbId>,
    pub status: Option<String>,
}

fn step_keys(steps: &[CreateTaskStep]) -> impl Iterator<Item = (i32, &str)> {
    steps
        .iter()
        .map(|s| (s.step_order, s.step_description.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_steps_key_leaves_steps_untouched() {
        let input: UpdateTask = serde_json::from_str(r#"{"task_title": "File annual report"}"#)
            .unwrap();
        assert!(input.steps.is_none());
        assert!(!input.is_empty());
    }

    #[test]
    fn empty_steps_list_is_a_replace() {
        let input: UpdateTask = serde_json::from_str(r#"{"steps": []}"#).unwrap();
        assert_eq!(input.steps.as_ref().map(Vec::len), Some(0));
        assert!(!input.is_empty());
        assert!(input.field_set().is_empty());
    }

    #[test]
    fn empty_body_is_empty() {
        let input: UpdateTask = serde_json::from_str("{}").unwrap();
        assert!(input.is_empty());
    }

    #[test]
    fn create_defaults_to_no_steps() {
        let input: CreateTask = serde_json::from_value(serde_json::json!({
            "entity_id": DbId::nil(),
            "task_title": "Renew registration",
        }))
        .unwrap();
        assert!(input.steps.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn create_rejects_duplicate_step_orders() {
        let input: CreateTask = serde_json::from_value(serde_json::json!({
            "entity_id": DbId::nil(),
            "task_title": "Renew registration",
            "steps": [
                {"step_order": 1, "step_description": "Gather documents"},
                {"step_order": 1, "step_description": "Submit form"},
            ],
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn blank_description_clears_on_update() {
        let input: UpdateTask = serde_json::from_str(r#"{"description": "  "}"#).unwrap();
        assert_eq!(input.normalized().description, Patch::Null);
    }

    #[test]
    fn update_rejects_unknown_status() {
        let input: UpdateTask = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn task_with_steps_serializes_flat_with_steps_array() {
        let task = Task {
            id: DbId::nil(),
            entity_id: DbId::nil(),
            account_id: None,
            task_title: "t".into(),
            description: None,
            status: "pending".into(),
            priority: "medium".into(),
            deadline: None,
            completion_date: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(TaskWithSteps { task, steps: vec![] }).unwrap();
        assert_eq!(json["task_title"], "t");
        assert_eq!(json["steps"], serde_json::json!([]));
    }
}
