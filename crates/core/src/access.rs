//! Document access gate.
//!
//! Decides whether a caller may read or download a document. The decision is
//! a pure function of the caller, the document's lifecycle flag and the
//! assignment grants the caller's tenant holds.

use crate::error::CoreError;
use crate::types::DbId;

/// The authenticated caller as seen by authorization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub is_admin: bool,
    /// Tenant of a client user. Always `None` for admins.
    pub client_id: Option<DbId>,
}

impl Principal {
    pub fn admin(user_id: DbId) -> Self {
        Self {
            user_id,
            is_admin: true,
            client_id: None,
        }
    }

    pub fn client_user(user_id: DbId, client_id: DbId) -> Self {
        Self {
            user_id,
            is_admin: false,
            client_id: Some(client_id),
        }
    }
}

/// The parts of a document the gate needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: DbId,
    pub is_active: bool,
}

/// One document-to-tenant assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGrant {
    pub document_id: DbId,
    pub client_id: DbId,
    pub is_active: bool,
}

/// Whether `principal` may see `document`.
///
/// Admins see every active document. Client users see a document only when
/// one of `grants` is an active assignment of that document to their own
/// tenant. A client user without a tenant sees nothing.
pub fn can_access<'a, I>(principal: &Principal, document: DocumentRef, grants: I) -> bool
where
    I: IntoIterator<Item = &'a AccessGrant>,
{
    if !document.is_active {
        return false;
    }
    if principal.is_admin {
        return true;
    }
    let Some(client_id) = principal.client_id else {
        return false;
    };
    grants
        .into_iter()
        .any(|g| g.is_active && g.document_id == document.id && g.client_id == client_id)
}

/// [`can_access`] as a `Result`, failing with [`CoreError::Forbidden`].
pub fn ensure_access<'a, I>(
    principal: &Principal,
    document: DocumentRef,
    grants: I,
) -> Result<(), CoreError>
where
    I: IntoIterator<Item = &'a AccessGrant>,
{
    if can_access(principal, document, grants) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Access denied".into()))
    }
}
