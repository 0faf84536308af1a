//! Domain rules for the compliance platform.
//!
//! Everything here is independent of HTTP and SQL so the `db` and `api`
//! crates (and unit tests) share a single definition of each rule.

pub mod access;
pub mod document_types;
pub mod error;
pub mod ingest;
pub mod inquiry;
pub mod pagination;
pub mod priority;
pub mod task;
pub mod tenant;
pub mod types;
