//! Repository for the `clients` table.

use compliance_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, ClientListFilter, CreateClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_name, industry, employee_count, point_of_contact, \
                        contact_email, contact_phone, address, notes, is_active, \
                        created_at, updated_at";

/// Provides CRUD operations for client companies.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients
                (company_name, industry, employee_count, point_of_contact,
                 contact_email, contact_phone, address, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.company_name)
            .bind(&input.industry)
            .bind(input.employee_count)
            .bind(&input.point_of_contact)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a client by ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active client by ID.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients ordered by company name.
    pub async fn list(pool: &PgPool, filter: &ClientListFilter) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE ($1::TEXT IS NULL OR industry = $1)
               AND ($2 OR is_active = true)
             ORDER BY company_name, id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&filter.industry)
            .bind(filter.include_inactive)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                company_name = COALESCE($2, company_name),
                industry = COALESCE($3, industry),
                employee_count = COALESCE($4, employee_count),
                point_of_contact = COALESCE($5, point_of_contact),
                contact_email = COALESCE($6, contact_email),
                contact_phone = COALESCE($7, contact_phone),
                address = COALESCE($8, address),
                notes = COALESCE($9, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.company_name)
            .bind(&input.industry)
            .bind(input.employee_count)
            .bind(&input.point_of_contact)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a client. Related users, tasks and assignments are
    /// left untouched.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE clients SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
