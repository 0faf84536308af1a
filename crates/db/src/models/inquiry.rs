//! Client inquiry model and DTOs.

use compliance_core::inquiry::InquiryStatus;
use compliance_core::priority::Priority;
use compliance_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `client_inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inquiry {
    pub id: DbId,
    pub subject: String,
    pub description: String,
    pub inquiry_type: String,
    #[sqlx(try_from = "String")]
    pub status: InquiryStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub client_id: DbId,
    pub submitted_by: DbId,
    pub assigned_to: Option<DbId>,
    pub admin_response: Option<String>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting an inquiry. Status always starts at `open`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInquiry {
    pub subject: String,
    pub description: String,
    pub inquiry_type: String,
    #[serde(default)]
    pub priority: Priority,
    pub client_id: DbId,
    pub submitted_by: DbId,
}

/// Values written when an admin responds to an inquiry.
#[derive(Debug, Clone)]
pub struct InquiryResponse {
    pub admin_response: String,
    pub status: InquiryStatus,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub responder_id: DbId,
}

/// Filter for [`InquiryRepo::list`](crate::repositories::InquiryRepo::list).
#[derive(Debug, Clone, Default)]
pub struct InquiryListFilter {
    /// `None` lists every tenant.
    pub client_id: Option<DbId>,
    pub status: Option<InquiryStatus>,
    pub limit: i64,
    pub offset: i64,
}
