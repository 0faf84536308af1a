//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Update DTOs and list filters where the entity supports them

pub mod client;
pub mod document;
pub mod document_assignment;
pub mod inquiry;
pub mod task;
pub mod user;
