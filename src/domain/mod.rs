//! Core domain model: run configuration and per-project runtime state.

pub mod entities;
pub mod value_objects;
