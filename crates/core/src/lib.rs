//! Domain types, validation rules, and the password cipher shared by the
//! persistence and HTTP layers. Nothing in this crate performs I/O.

pub mod account;
pub mod crypto;
pub mod entity;
pub mod error;
pub mod patch;
pub mod task;
pub mod types;
pub mod validation;
