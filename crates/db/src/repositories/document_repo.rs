//! Repository for the `documents` table (the document catalog).

use compliance_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, DocumentListFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, filename, original_filename, file_path, file_size, mime_type, \
                        description, document_type, uploaded_by, is_active, \
                        created_at, updated_at";

/// Provides CRUD operations for document metadata.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Record an ingested file, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (filename, original_filename, file_path, file_size, mime_type,
                 description, document_type, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&input.filename)
            .bind(&input.original_filename)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(&input.mime_type)
            .bind(&input.description)
            .bind(&input.document_type)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a document by ID, active or not. Callers decide how to treat
    /// inactive rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List documents, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &DocumentListFilter,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE ($1::TEXT IS NULL OR document_type = $1)
               AND ($2 OR is_active = true)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&filter.document_type)
            .bind(filter.include_inactive)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a document together with every assignment that references
    /// it, in one transaction.
    ///
    /// Returns the deactivated row, or `None` if the document does not exist
    /// or was already inactive.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE documents SET is_active = false
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(document) = document else {
            return Ok(None);
        };

        let cascaded = sqlx::query(
            "UPDATE document_assignments SET is_active = false
             WHERE document_id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::debug!(document_id = id, assignments = cascaded, "Document deactivated");
        Ok(Some(document))
    }

    /// Distinct document-type tags in use, sorted.
    pub async fn list_types(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT document_type FROM documents ORDER BY document_type",
        )
        .fetch_all(pool)
        .await
    }
}
