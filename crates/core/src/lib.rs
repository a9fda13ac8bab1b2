//! Domain primitives for the taskboard service.
//!
//! This crate performs no I/O. It holds the shared id/timestamp aliases, the
//! domain error type, and the pure rules (rights resolution, task ordering,
//! pagination, input limits) that the persistence and API layers build on.

pub mod collection;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod rights;
pub mod task;
pub mod types;
