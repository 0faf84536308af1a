//! Document metadata model and DTOs.

use compliance_core::access::DocumentRef;
use compliance_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    /// Opaque storage name on disk.
    pub filename: String,
    /// Name the uploader gave the file; used for display and downloads.
    pub original_filename: String,
    /// Server-side location. Not exposed to API clients.
    #[serde(skip_serializing)]
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub description: Option<String>,
    pub document_type: String,
    pub uploaded_by: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    pub fn access_ref(&self) -> DocumentRef {
        DocumentRef {
            id: self.id,
            is_active: self.is_active,
        }
    }
}

/// DTO for recording an ingested file.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub description: Option<String>,
    pub document_type: String,
    pub uploaded_by: DbId,
}

/// Filter for [`DocumentRepo::list`](crate::repositories::DocumentRepo::list).
#[derive(Debug, Clone, Default)]
pub struct DocumentListFilter {
    /// Exact match on the document-type tag.
    pub document_type: Option<String>,
    pub include_inactive: bool,
    pub limit: i64,
    pub offset: i64,
}
