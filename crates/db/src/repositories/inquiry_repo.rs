//! Repository for the `client_inquiries` table.

use compliance_core::inquiry::{InquiryStatus, OPEN_INQUIRY_STATUSES};
use compliance_core::types::DbId;
use sqlx::PgPool;

use crate::models::inquiry::{CreateInquiry, Inquiry, InquiryListFilter, InquiryResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject, description, inquiry_type, status, priority, client_id, \
                        submitted_by, assigned_to, admin_response, resolution_notes, \
                        resolved_at, created_at, updated_at";

/// Provides CRUD operations for client inquiries.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Insert a new inquiry in `open` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateInquiry) -> Result<Inquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_inquiries
                (subject, description, inquiry_type, status, priority, client_id, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(&input.subject)
            .bind(&input.description)
            .bind(&input.inquiry_type)
            .bind(InquiryStatus::Open.as_str())
            .bind(input.priority.as_str())
            .bind(input.client_id)
            .bind(input.submitted_by)
            .fetch_one(pool)
            .await
    }

    /// Find an inquiry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_inquiries WHERE id = $1");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List inquiries, newest first. A `None` client lists every tenant.
    pub async fn list(
        pool: &PgPool,
        filter: &InquiryListFilter,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_inquiries
             WHERE ($1::BIGINT IS NULL OR client_id = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(filter.client_id)
            .bind(filter.status.map(InquiryStatus::as_str))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Record an admin response only if the inquiry still has
    /// `expected_status`.
    ///
    /// Returns `None` when the row is missing or its status moved since it
    /// was read.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        expected_status: InquiryStatus,
        response: &InquiryResponse,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE client_inquiries SET
                admin_response = $3,
                status = $4,
                resolution_notes = COALESCE($5, resolution_notes),
                resolved_at = $6,
                assigned_to = $7
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .bind(expected_status.as_str())
            .bind(&response.admin_response)
            .bind(response.status.as_str())
            .bind(&response.resolution_notes)
            .bind(response.resolved_at)
            .bind(response.responder_id)
            .fetch_optional(pool)
            .await
    }

    /// Number of inquiries awaiting staff attention for a client.
    pub async fn count_open_for_client(pool: &PgPool, client_id: DbId) -> Result<i64, sqlx::Error> {
        let open: Vec<&str> = OPEN_INQUIRY_STATUSES.iter().map(|s| s.as_str()).collect();
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM client_inquiries WHERE client_id = $1 AND status = ANY($2)",
        )
        .bind(client_id)
        .bind(open)
        .fetch_one(pool)
        .await
    }
}
