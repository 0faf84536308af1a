//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the calling user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires an admin account.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
