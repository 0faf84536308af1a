//! Shared query parameter types for API handlers.

use compliance_core::pagination::{clamp_limit, clamp_offset};
use compliance_core::types::DbId;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `1..=MAX_LIMIT`, defaulting to `DEFAULT_LIMIT`.
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Tenant selector for admin list endpoints (`?client_id=&all_clients=`).
#[derive(Debug, Default, Deserialize)]
pub struct AdminScopeParams {
    pub client_id: Option<DbId>,
    #[serde(default)]
    pub all_clients: bool,
}

/// Tenant selector accepted by client-facing endpoints. Only admins may use it.
#[derive(Debug, Default, Deserialize)]
pub struct ClientScopeParams {
    pub client_id: Option<DbId>,
}
