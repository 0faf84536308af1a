//! Document-to-client assignment model and DTOs.

use compliance_core::access::AccessGrant;
use compliance_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `document_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentAssignment {
    pub id: DbId,
    pub document_id: DbId,
    pub client_id: DbId,
    pub assigned_by: DbId,
    pub notes: Option<String>,
    pub is_active: bool,
    pub assigned_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&DocumentAssignment> for AccessGrant {
    fn from(a: &DocumentAssignment) -> Self {
        AccessGrant {
            document_id: a.document_id,
            client_id: a.client_id,
            is_active: a.is_active,
        }
    }
}

/// DTO for assigning a document to a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentAssignment {
    pub document_id: DbId,
    pub client_id: DbId,
    pub assigned_by: DbId,
    pub notes: Option<String>,
}

/// Result of [`DocumentAssignmentRepo::assign`](crate::repositories::DocumentAssignmentRepo::assign).
#[derive(Debug, Clone)]
pub enum AssignOutcome {
    Created(DocumentAssignment),
    /// The document does not exist or has been deactivated.
    DocumentNotFound,
    /// The client does not exist or has been deactivated.
    ClientNotFound,
    /// An active assignment for the same pair already exists.
    Duplicate,
}

/// An active assignment joined with the document it grants.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignedDocument {
    pub assignment_id: DbId,
    pub document_id: DbId,
    pub client_id: DbId,
    pub assigned_by: DbId,
    pub assigned_at: Timestamp,
    pub notes: Option<String>,
    pub original_filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub description: Option<String>,
    pub document_type: String,
    pub uploaded_at: Timestamp,
}

/// Filter for [`DocumentAssignmentRepo::list`](crate::repositories::DocumentAssignmentRepo::list).
#[derive(Debug, Clone, Default)]
pub struct AssignmentListFilter {
    pub client_id: Option<DbId>,
    pub document_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
