//! Legal entity model and DTOs.

use lawmox_core::entity::{validate_entity_patch, validate_new_entity};
use lawmox_core::error::CoreError;
use lawmox_core::patch::Patch;
use lawmox_core::types::{Date, DbId, Timestamp};
use lawmox_core::validation::{blank_to_none, blank_to_null, trim_owned};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::field_set::{Column, FieldSet};

/// An entity row from the `entities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Entity {
    pub id: DbId,
    pub entity_name: String,
    /// Federal tax identifier. Unique across entities when present.
    pub ein: Option<String>,
    pub date_of_formation: Option<Date>,
    pub registered_address: Option<String>,
    pub state_of_formation: Option<String>,
    pub entity_type: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new entity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntity {
    pub entity_name: String,
    pub ein: Option<String>,
    pub date_of_formation: Option<Date>,
    pub registered_address: Option<String>,
    pub state_of_formation: Option<String>,
    pub entity_type: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<String>,
}

impl CreateEntity {
    /// Blank optional strings are stored as `NULL`. The EIN is trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            entity_name: self.entity_name.clone(),
            ein: blank_to_none(self.ein.as_deref().map(trim_owned)),
            date_of_formation: self.date_of_formation,
            registered_address: blank_to_none(self.registered_address.clone()),
            state_of_formation: blank_to_none(self.state_of_formation.clone()),
            entity_type: blank_to_none(self.entity_type.clone()),
            status: blank_to_none(self.status.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_new_entity(
            &self.entity_name,
            self.ein.as_deref(),
            self.state_of_formation.as_deref(),
            self.entity_type.as_deref(),
            self.status.as_deref(),
        )
    }
}

/// DTO for partially updating an entity.
///
/// Missing keys leave the column untouched; `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEntity {
    pub entity_name: Patch<String>,
    pub ein: Patch<String>,
    pub date_of_formation: Patch<Date>,
    pub registered_address: Patch<String>,
    pub state_of_formation: Patch<String>,
    pub entity_type: Patch<String>,
    pub status: Patch<String>,
}

/// Updatable columns of `entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityColumn {
    EntityName,
    Ein,
    DateOfFormation,
    RegisteredAddress,
    StateOfFormation,
    EntityType,
    Status,
}

impl Column for EntityColumn {
    fn name(self) -> &'static str {
        match self {
            EntityColumn::EntityName => "entity_name",
            EntityColumn::Ein => "ein",
            EntityColumn::DateOfFormation => "date_of_formation",
            EntityColumn::RegisteredAddress => "registered_address",
            EntityColumn::StateOfFormation => "state_of_formation",
            EntityColumn::EntityType => "entity_type",
            EntityColumn::Status => "status",
        }
    }
}

impl UpdateEntity {
    /// Blank optional strings clear the column. The EIN is trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            entity_name: self.entity_name.clone(),
            ein: blank_to_null(self.ein.clone().map(|v| trim_owned(&v))),
            date_of_formation: self.date_of_formation.clone(),
            registered_address: blank_to_null(self.registered_address.clone()),
            state_of_formation: blank_to_null(self.state_of_formation.clone()),
            entity_type: blank_to_null(self.entity_type.clone()),
            status: self.status.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_entity_patch(
            &self.entity_name,
            &self.ein,
            &self.state_of_formation,
            &self.entity_type,
            &self.status,
        )
    }

    pub fn into_field_set(self) -> FieldSet<EntityColumn> {
        let mut fields = FieldSet::new();
        fields.text(EntityColumn::EntityName, self.entity_name);
        fields.text(EntityColumn::Ein, self.ein);
        fields.date(EntityColumn::DateOfFormation, self.date_of_formation);
        fields.text(EntityColumn::RegisteredAddress, self.registered_address);
        fields.text(EntityColumn::StateOfFormation, self.state_of_formation);
        fields.text(EntityColumn::EntityType, self.entity_type);
        fields.text(EntityColumn::Status, self.status);
        fields
    }
}
