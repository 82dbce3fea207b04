//! Query parameter types for list endpoints.

use lawmox_core::types::DbId;
use lawmox_db::models::task::TaskFilter;
use serde::{Deserialize, Deserializer};

/// `GET /accounts?entity_id=`
#[derive(Debug, Default, Deserialize)]
pub struct AccountListParams {
    #[serde(default, deserialize_with = "blank_id_as_none")]
    pub entity_id: Option<DbId>,
}

/// `GET /tasks?entity_id=&status=`
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    #[serde(default, deserialize_with = "blank_id_as_none")]
    pub entity_id: Option<DbId>,
    pub status: Option<String>,
}

impl From<TaskListParams> for TaskFilter {
    fn from(params: TaskListParams) -> Self {
        TaskFilter {
            entity_id: params.entity_id,
            status: params.status.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// An empty `entity_id=` means no filter; anything else must be a UUID.
fn blank_id_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DbId>, D::Error> {
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
