use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Invoice, InvoiceStatus};

const INVOICE_COLUMNS: &str = r#"
    id,
    invoice_number,
    client_name,
    client_email,
    invoice_date,
    due_date,
    items,
    currency,
    subtotal,
    total,
    notes,
    status,
    created_by,
    pdf_data,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn number_exists(&self, invoice_number: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE invoice_number = $1")
                .bind(invoice_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn create(&self, invoice: &Invoice) -> Result<Invoice> {
        let created = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO
                invoices (
                    id, invoice_number, client_name, client_email, invoice_date,
                    due_date, items, currency, subtotal, total, notes, status,
                    created_by, pdf_data, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.client_name)
        .bind(&invoice.client_email)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(&invoice.items)
        .bind(&invoice.currency)
        .bind(&invoice.subtotal)
        .bind(&invoice.total)
        .bind(&invoice.notes)
        .bind(invoice.status)
        .bind(invoice.created_by)
        .bind(&invoice.pdf_data)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn list(
        &self,
        status: Option<InvoiceStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Invoice>> {
        let invoices = match status {
            Some(s) => {
                sqlx::query_as::<_, Invoice>(&format!(
                    r#"
                    SELECT {INVOICE_COLUMNS}
                    FROM invoices
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(s)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Invoice>(&format!(
                    r#"
                    SELECT {INVOICE_COLUMNS}
                    FROM invoices
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(invoices)
    }

    pub async fn count(&self, status: Option<InvoiceStatus>) -> Result<i64> {
        let total: i64 = match status {
            Some(s) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE status = $1")
                    .bind(s)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(total)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = $1, updated_at = $2
            WHERE id = $3
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
