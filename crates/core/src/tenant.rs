//! Tenant scoping for client-company data.
//!
//! Client users are always pinned to their own tenant. Admins must name the
//! tenant they want; an omitted tenant is an error rather than "everything".

use crate::access::Principal;
use crate::error::CoreError;
use crate::types::DbId;

/// Which tenants an admin list request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    Client(DbId),
    AllClients,
}

impl TenantScope {
    /// The single tenant filter, or `None` for all tenants.
    pub fn client_id(self) -> Option<DbId> {
        match self {
            TenantScope::Client(id) => Some(id),
            TenantScope::AllClients => None,
        }
    }
}

/// Resolve the tenant a client-facing request operates on.
///
/// For client users `requested` is ignored and their own tenant is used.
pub fn resolve_client_scope(
    principal: &Principal,
    requested: Option<DbId>,
) -> Result<DbId, CoreError> {
    if principal.is_admin {
        return requested.ok_or(CoreError::MissingTenantContext);
    }
    principal.client_id.ok_or_else(|| {
        CoreError::Forbidden("User is not associated with a client company".into())
    })
}

/// Resolve the scope of an admin list request. Listing every tenant requires
/// the explicit `all_clients` opt-in.
pub fn resolve_admin_scope(
    client_id: Option<DbId>,
    all_clients: bool,
) -> Result<TenantScope, CoreError> {
    match (client_id, all_clients) {
        (Some(id), _) => Ok(TenantScope::Client(id)),
        (None, true) => Ok(TenantScope::AllClients),
        (None, false) => Err(CoreError::MissingTenantContext),
    }
}

/// Check that a tenant-owned row may be read by `principal`. Admins see every
/// tenant; client users only their own.
pub fn ensure_tenant_access(principal: &Principal, owner: DbId) -> Result<(), CoreError> {
    if principal.is_admin || principal.client_id == Some(owner) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Access denied".into()))
    }
}
