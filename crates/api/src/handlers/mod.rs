pub mod account;
pub mod entity;
pub mod task;
