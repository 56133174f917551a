use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::AttendanceRecord;

const ATTENDANCE_COLUMNS: &str = r#"
    id,
    employee_id,
    work_date,
    clock_in,
    clock_out,
    total_hours,
    status,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_day(
        &self,
        employee_id: Uuid,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance_records
            WHERE employee_id = $1 AND work_date = $2
            "#
        ))
        .bind(employee_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord> {
        let created = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO
                attendance_records (
                    id, employee_id, work_date, clock_in, clock_out,
                    total_hours, status, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(record.employee_id)
        .bind(record.work_date)
        .bind(record.clock_in)
        .bind(record.clock_out)
        .bind(record.total_hours)
        .bind(record.status)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn set_clock_in(
        &self,
        id: Uuid,
        clock_in: DateTime<Utc>,
    ) -> Result<AttendanceRecord> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            UPDATE attendance_records
            SET clock_in = $1, updated_at = $2
            WHERE id = $3
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(clock_in)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn set_clock_out(
        &self,
        id: Uuid,
        clock_out: DateTime<Utc>,
        total_hours: f64,
    ) -> Result<AttendanceRecord> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            UPDATE attendance_records
            SET clock_out = $1, total_hours = $2, updated_at = $3
            WHERE id = $4
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(clock_out)
        .bind(total_hours)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Records for an employee, optionally narrowed to one calendar month.
    pub async fn list(
        &self,
        employee_id: Uuid,
        month: Option<(i32, u32)>,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = match month {
            Some((year, month)) => {
                let from = NaiveDate::from_ymd_opt(year, month, 1)
                    .ok_or_else(|| anyhow::anyhow!("invalid month: {}-{}", year, month))?;
                let to = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                }
                .ok_or_else(|| anyhow::anyhow!("invalid month: {}-{}", year, month))?;

                sqlx::query_as::<_, AttendanceRecord>(&format!(
                    r#"
                    SELECT {ATTENDANCE_COLUMNS}
                    FROM attendance_records
                    WHERE employee_id = $1 AND work_date >= $2 AND work_date < $3
                    ORDER BY work_date DESC
                    "#
                ))
                .bind(employee_id)
                .bind(from)
                .bind(to)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AttendanceRecord>(&format!(
                    r#"
                    SELECT {ATTENDANCE_COLUMNS}
                    FROM attendance_records
                    WHERE employee_id = $1
                    ORDER BY work_date DESC
                    "#
                ))
                .bind(employee_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }
}
