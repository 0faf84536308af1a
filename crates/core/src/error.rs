use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// The API layer maps each variant to a fixed HTTP status and error code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An admin request to a tenant-scoped operation named no tenant.
    #[error("A target client_id is required for this request")]
    MissingTenantContext,

    #[error("Payload too large: {0}")]
    TooLarge(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
