//! Task and task step constants and validation.
//!
//! A task's steps form a strictly ordered sequence: `step_order` values are
//! positive and unique within one task. Step sets are always written whole
//! (create or full replace), so uniqueness is checked on the submitted list
//! before anything reaches the database.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::patch::Patch;
use crate::validation::{required_text, required_text_patch};

// ---------------------------------------------------------------------------
// Status and priority vocabularies
// ---------------------------------------------------------------------------

pub const TASK_STATUS_PENDING: &str = "pending";
pub const TASK_STATUS_IN_PROGRESS: &str = "in_progress";
pub const TASK_STATUS_COMPLETED: &str = "completed";
pub const TASK_STATUS_CANCELLED: &str = "cancelled";

pub const VALID_TASK_STATUSES: &[&str] = &[
    TASK_STATUS_PENDING,
    TASK_STATUS_IN_PROGRESS,
    TASK_STATUS_COMPLETED,
    TASK_STATUS_CANCELLED,
];

pub const DEFAULT_TASK_STATUS: &str = TASK_STATUS_PENDING;

pub const VALID_TASK_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

pub const DEFAULT_TASK_PRIORITY: &str = "medium";

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_TASK_TITLE_LEN: usize = 255;
pub const MAX_STEP_DESCRIPTION_LEN: usize = 2000;

/// Maximum number of steps in a single task.
pub const MAX_STEPS_PER_TASK: usize = 200;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

pub fn validate_task_status(status: &str) -> Result<(), CoreError> {
    if !VALID_TASK_STATUSES.contains(&status) {
        return Err(CoreError::Validation(format!(
            "Invalid task status '{status}'. Must be one of: {}",
            VALID_TASK_STATUSES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_task_priority(priority: &str) -> Result<(), CoreError> {
    if !VALID_TASK_PRIORITIES.contains(&priority) {
        return Err(CoreError::Validation(format!(
            "Invalid task priority '{priority}'. Must be one of: {}",
            VALID_TASK_PRIORITIES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_new_task(
    task_title: &str,
    status: Option<&str>,
    priority: Option<&str>,
) -> Result<(), CoreError> {
    required_text("task_title", task_title, MAX_TASK_TITLE_LEN)?;
    if let Some(status) = status {
        validate_task_status(status)?;
    }
    if let Some(priority) = priority {
        validate_task_priority(priority)?;
    }
    Ok(())
}

pub fn validate_task_patch(
    task_title: &Patch<String>,
    status: &Patch<String>,
    priority: &Patch<String>,
) -> Result<(), CoreError> {
    required_text_patch("task_title", task_title, MAX_TASK_TITLE_LEN)?;
    match status {
        Patch::Absent => {}
        Patch::Null => return Err(CoreError::Validation("status cannot be null".to_string())),
        Patch::Value(s) => validate_task_status(s)?,
    }
    match priority {
        Patch::Absent => {}
        Patch::Null => return Err(CoreError::Validation("priority cannot be null".to_string())),
        Patch::Value(p) => validate_task_priority(p)?,
    }
    Ok(())
}

/// Validate a submitted step list: bounded size, positive and unique
/// `step_order` values, non-blank descriptions.
///
/// Accepts `(step_order, step_description)` pairs so callers can pass any
/// step DTO shape.
pub fn validate_steps<'a, I>(steps: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = (i32, &'a str)>,
{
    let mut seen = HashSet::new();
    for (order, description) in steps {
        if order < 1 {
            return Err(CoreError::Validation(format!(
                "step_order must be >= 1, got {order}"
            )));
        }
        if !seen.insert(order) {
            return Err(CoreError::Validation(format!(
                "duplicate step_order {order}; step orders must be unique within a task"
            )));
        }
        required_text("step_description", description, MAX_STEP_DESCRIPTION_LEN)?;
    }
    if seen.len() > MAX_STEPS_PER_TASK {
        return Err(CoreError::Validation(format!(
            "a task may have at most {MAX_STEPS_PER_TASK} steps, got {}",
            seen.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Completion tracking
// ---------------------------------------------------------------------------

/// What to do with `tasks.completion_date` when the status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    /// Leave the stored value alone.
    Keep,
    /// Stamp the completion time with the current time.
    Stamp,
    /// Clear the completion time.
    Clear,
}

/// Decide how a status transition affects the completion timestamp.
///
/// Entering `completed` stamps it, leaving `completed` clears it, and any
/// other transition (including `completed` -> `completed`) keeps it.
pub fn completion_change(previous: &str, next: &str) -> CompletionChange {
    let was_done = previous == TASK_STATUS_COMPLETED;
    let is_done = next == TASK_STATUS_COMPLETED;
    match (was_done, is_done) {
        (false, true) => CompletionChange::Stamp,
        (true, false) => CompletionChange::Clear,
        _ => CompletionChange::Keep,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
