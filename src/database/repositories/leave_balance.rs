use anyhow::Result;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::LeaveBalance;

const BALANCE_COLUMNS: &str = r#"
    id,
    employee_id,
    year,
    casual_total,
    casual_used,
    sick_total,
    sick_used,
    earned_total,
    earned_used,
    unpaid_total,
    unpaid_used,
    maternity_total,
    maternity_used,
    paternity_total,
    paternity_used,
    updated_at
"#;

#[derive(Clone)]
pub struct LeaveBalanceRepository {
    pool: PgPool,
}

impl LeaveBalanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, employee_id: Uuid, year: i32) -> Result<Option<LeaveBalance>> {
        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            "SELECT {BALANCE_COLUMNS} FROM leave_balances WHERE employee_id = $1 AND year = $2"
        ))
        .bind(employee_id)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance)
    }

    /// Insert a fresh ledger row unless one already exists for the
    /// (employee, year) pair. Returns the row that ends up in place either way.
    pub async fn get_or_create(&self, balance: &LeaveBalance) -> Result<LeaveBalance> {
        sqlx::query(
            r#"
            INSERT INTO
                leave_balances (
                    id, employee_id, year,
                    casual_total, casual_used,
                    sick_total, sick_used,
                    earned_total, earned_used,
                    unpaid_total, unpaid_used,
                    maternity_total, maternity_used,
                    paternity_total, paternity_used,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (employee_id, year) DO NOTHING
            "#,
        )
        .bind(balance.id)
        .bind(balance.employee_id)
        .bind(balance.year)
        .bind(balance.casual_total)
        .bind(balance.casual_used)
        .bind(balance.sick_total)
        .bind(balance.sick_used)
        .bind(balance.earned_total)
        .bind(balance.earned_used)
        .bind(balance.unpaid_total)
        .bind(balance.unpaid_used)
        .bind(balance.maternity_total)
        .bind(balance.maternity_used)
        .bind(balance.paternity_total)
        .bind(balance.paternity_used)
        .bind(balance.updated_at)
        .execute(&self.pool)
        .await?;

        let stored = self
            .find(balance.employee_id, balance.year)
            .await?
            .ok_or_else(|| anyhow::anyhow!("leave balance vanished after upsert"))?;

        Ok(stored)
    }

    /// Transaction-scoped sibling of [`get_or_create`]: seeds the row inside
    /// the caller's transaction so a following `FOR UPDATE` read sees it.
    pub async fn create_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        balance: &LeaveBalance,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO
                leave_balances (
                    id, employee_id, year,
                    casual_total, casual_used,
                    sick_total, sick_used,
                    earned_total, earned_used,
                    unpaid_total, unpaid_used,
                    maternity_total, maternity_used,
                    paternity_total, paternity_used,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (employee_id, year) DO NOTHING
            "#,
        )
        .bind(balance.id)
        .bind(balance.employee_id)
        .bind(balance.year)
        .bind(balance.casual_total)
        .bind(balance.casual_used)
        .bind(balance.sick_total)
        .bind(balance.sick_used)
        .bind(balance.earned_total)
        .bind(balance.earned_used)
        .bind(balance.unpaid_total)
        .bind(balance.unpaid_used)
        .bind(balance.maternity_total)
        .bind(balance.maternity_used)
        .bind(balance.paternity_total)
        .bind(balance.paternity_used)
        .bind(balance.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Lock the ledger row so concurrent approvals serialize on it.
    pub async fn find_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        employee_id: Uuid,
        year: i32,
    ) -> Result<Option<LeaveBalance>> {
        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            SELECT {BALANCE_COLUMNS}
            FROM leave_balances
            WHERE employee_id = $1 AND year = $2
            FOR UPDATE
            "#
        ))
        .bind(employee_id)
        .bind(year)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(balance)
    }

    /// Persist the mutated `used` counters of an in-memory row.
    pub async fn save_usage_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        balance: &LeaveBalance,
    ) -> Result<LeaveBalance> {
        let updated = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            UPDATE leave_balances
            SET
                casual_used = $1,
                sick_used = $2,
                earned_used = $3,
                unpaid_used = $4,
                maternity_used = $5,
                paternity_used = $6,
                updated_at = $7
            WHERE
                id = $8
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(balance.casual_used)
        .bind(balance.sick_used)
        .bind(balance.earned_used)
        .bind(balance.unpaid_used)
        .bind(balance.maternity_used)
        .bind(balance.paternity_used)
        .bind(balance.updated_at)
        .bind(balance.id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(updated)
    }
}
