//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod document_assignment_repo;
pub mod document_repo;
pub mod inquiry_repo;
pub mod task_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use document_assignment_repo::DocumentAssignmentRepo;
pub use document_repo::DocumentRepo;
pub use inquiry_repo::InquiryRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
