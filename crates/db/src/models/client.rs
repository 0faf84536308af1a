//! Client company (tenant) model and DTOs.

use compliance_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub company_name: String,
    pub industry: String,
    pub employee_count: i32,
    pub point_of_contact: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    /// Internal admin notes.
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub company_name: String,
    pub industry: String,
    pub employee_count: i32,
    pub point_of_contact: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a client company. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<i32>,
    pub point_of_contact: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Filter for [`ClientRepo::list`](crate::repositories::ClientRepo::list).
#[derive(Debug, Clone, Default)]
pub struct ClientListFilter {
    pub industry: Option<String>,
    pub include_inactive: bool,
    pub limit: i64,
    pub offset: i64,
}
