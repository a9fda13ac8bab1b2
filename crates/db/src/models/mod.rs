//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize`-free input DTOs built by the services
//! - Any joined/read-model shapes returned by listing queries

pub mod collection;
pub mod rights;
pub mod task;
pub mod user;
