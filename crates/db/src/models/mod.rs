//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all [`Patch`](lawmox_core::patch::Patch) fields)
//!   plus the column enum its patches map onto

pub mod account;
pub mod entity;
pub mod task;
pub mod task_step;
