//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod entity_repo;
pub mod task_repo;
pub mod task_step_repo;

pub use account_repo::AccountRepo;
pub use entity_repo::EntityRepo;
pub use task_repo::TaskRepo;
pub use task_step_repo::TaskStepRepo;
