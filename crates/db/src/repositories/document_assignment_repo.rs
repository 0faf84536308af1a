//! Repository for the `document_assignments` table (the assignment ledger).
//!
//! At most one active assignment exists per `(document_id, client_id)`,
//! enforced by the partial unique index `uq_document_assignments_active_pair`.

use compliance_core::types::DbId;
use sqlx::PgPool;

use crate::models::document_assignment::{
    AssignOutcome, AssignedDocument, AssignmentListFilter, CreateDocumentAssignment,
    DocumentAssignment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, document_id, client_id, assigned_by, notes, is_active, \
                        assigned_at, created_at, updated_at";

/// Provides operations on document-to-client assignments.
pub struct DocumentAssignmentRepo;

impl DocumentAssignmentRepo {
    /// Grant a client access to a document.
    ///
    /// The active document row is locked `FOR SHARE` so a concurrent
    /// deactivation cannot slip between the check and the insert. Concurrent
    /// assigns of the same pair collapse on the partial unique index: exactly
    /// one returns [`AssignOutcome::Created`], the rest
    /// [`AssignOutcome::Duplicate`].
    pub async fn assign(
        pool: &PgPool,
        input: &CreateDocumentAssignment,
    ) -> Result<AssignOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let document: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM documents WHERE id = $1 AND is_active = true FOR SHARE",
        )
        .bind(input.document_id)
        .fetch_optional(&mut *tx)
        .await?;
        if document.is_none() {
            return Ok(AssignOutcome::DocumentNotFound);
        }

        let client: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM clients WHERE id = $1 AND is_active = true")
                .bind(input.client_id)
                .fetch_optional(&mut *tx)
                .await?;
        if client.is_none() {
            return Ok(AssignOutcome::ClientNotFound);
        }

        let query = format!(
            "INSERT INTO document_assignments (document_id, client_id, assigned_by, notes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (document_id, client_id) WHERE is_active DO NOTHING
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, DocumentAssignment>(&query)
            .bind(input.document_id)
            .bind(input.client_id)
            .bind(input.assigned_by)
            .bind(&input.notes)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(match created {
            Some(assignment) => AssignOutcome::Created(assignment),
            None => AssignOutcome::Duplicate,
        })
    }

    /// Whether an active assignment exists for the pair.
    pub async fn has_active(
        pool: &PgPool,
        document_id: DbId,
        client_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM document_assignments
                WHERE document_id = $1 AND client_id = $2 AND is_active = true
             )",
        )
        .bind(document_id)
        .bind(client_id)
        .fetch_one(pool)
        .await
    }

    /// Active assignments, newest first, optionally filtered by client and/or
    /// document.
    pub async fn list(
        pool: &PgPool,
        filter: &AssignmentListFilter,
    ) -> Result<Vec<DocumentAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_assignments
             WHERE is_active = true
               AND ($1::BIGINT IS NULL OR client_id = $1)
               AND ($2::BIGINT IS NULL OR document_id = $2)
             ORDER BY assigned_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, DocumentAssignment>(&query)
            .bind(filter.client_id)
            .bind(filter.document_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Active assignments of one document.
    pub async fn list_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<DocumentAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_assignments
             WHERE document_id = $1 AND is_active = true
             ORDER BY assigned_at DESC, id DESC"
        );
        sqlx::query_as::<_, DocumentAssignment>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Documents currently visible to a client, newest assignment first.
    ///
    /// Both the assignment and the document must be active.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AssignedDocument>, sqlx::Error> {
        sqlx::query_as::<_, AssignedDocument>(
            "SELECT a.id AS assignment_id, a.document_id, a.client_id, a.assigned_by,
                    a.assigned_at, a.notes,
                    d.original_filename, d.file_size, d.mime_type, d.description,
                    d.document_type, d.created_at AS uploaded_at
             FROM document_assignments a
             JOIN documents d ON d.id = a.document_id
             WHERE a.client_id = $1 AND a.is_active = true AND d.is_active = true
             ORDER BY a.assigned_at DESC, a.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Number of active documents assigned to a client.
    pub async fn count_active_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM document_assignments a
             JOIN documents d ON d.id = a.document_id
             WHERE a.client_id = $1 AND a.is_active = true AND d.is_active = true",
        )
        .bind(client_id)
        .fetch_one(pool)
        .await
    }
}
