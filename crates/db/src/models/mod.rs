//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, where rows are created here

pub mod claim;
pub mod idea;
pub mod user;
