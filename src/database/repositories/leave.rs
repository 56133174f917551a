use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{
    LeaveRequest, LeaveRequestWithEmployee, LeaveStatus,
};

const REQUEST_COLUMNS: &str = r#"
    id,
    employee_id,
    leave_type,
    start_date,
    end_date,
    is_half_day,
    half_day_period,
    duration,
    reason,
    emergency_contact,
    status,
    approved_by,
    approved_at,
    rejection_reason,
    created_at,
    updated_at
"#;

const JOINED_COLUMNS: &str = r#"
    r.id,
    r.employee_id,
    e.name AS employee_name,
    e.department,
    e.designation,
    r.leave_type,
    r.start_date,
    r.end_date,
    r.is_half_day,
    r.duration,
    r.reason,
    r.status,
    r.created_at
"#;

#[derive(Clone)]
pub struct LeaveRequestRepository {
    pool: PgPool,
}

impl LeaveRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &LeaveRequest) -> Result<LeaveRequest> {
        let created = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            INSERT INTO
                leave_requests (
                    id, employee_id, leave_type, start_date, end_date,
                    is_half_day, half_day_period, duration, reason,
                    emergency_contact, status, approved_by, approved_at,
                    rejection_reason, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request.id)
        .bind(request.employee_id)
        .bind(request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.is_half_day)
        .bind(request.half_day_period)
        .bind(request.duration)
        .bind(&request.reason)
        .bind(&request.emergency_contact)
        .bind(request.status)
        .bind(request.approved_by)
        .bind(request.approved_at)
        .bind(&request.rejection_reason)
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Lock the request row for the rest of the surrounding transaction.
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<LeaveRequest>> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(request)
    }

    pub async fn list_for_employee(
        &self,
        employee_id: Uuid,
        status: Option<LeaveStatus>,
        year: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LeaveRequest>> {
        let mut query = format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE employee_id = $1"
        );
        let mut next_param = 2;

        if status.is_some() {
            query.push_str(&format!(" AND status = ${next_param}"));
            next_param += 1;
        }
        if year.is_some() {
            query.push_str(&format!(
                " AND start_date >= ${} AND start_date <= ${}",
                next_param,
                next_param + 1
            ));
            next_param += 2;
        }
        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            next_param,
            next_param + 1
        ));

        let mut prepared = sqlx::query_as::<_, LeaveRequest>(&query).bind(employee_id);
        if let Some(s) = status {
            prepared = prepared.bind(s);
        }
        if let Some(y) = year {
            let start_of_year = NaiveDate::from_ymd_opt(y, 1, 1).unwrap_or_default();
            let end_of_year = NaiveDate::from_ymd_opt(y, 12, 31).unwrap_or_default();
            prepared = prepared.bind(start_of_year).bind(end_of_year);
        }
        prepared = prepared.bind(limit).bind(offset);

        let requests = prepared.fetch_all(&self.pool).await?;

        Ok(requests)
    }

    pub async fn list_pending(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<LeaveRequestWithEmployee>> {
        let mut query = format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM leave_requests r
            JOIN employees e ON e.id = r.employee_id
            WHERE r.status = 'pending'
            "#
        );
        if department.is_some() {
            query.push_str(" AND e.department = $1");
        }
        query.push_str(" ORDER BY r.created_at DESC");

        let mut prepared = sqlx::query_as::<_, LeaveRequestWithEmployee>(&query);
        if let Some(dept) = department {
            prepared = prepared.bind(dept.to_string());
        }

        let requests = prepared.fetch_all(&self.pool).await?;

        Ok(requests)
    }

    /// Approved requests whose inclusive [start_date, end_date] span contains `date`.
    pub async fn on_leave(&self, date: NaiveDate) -> Result<Vec<LeaveRequestWithEmployee>> {
        let requests = sqlx::query_as::<_, LeaveRequestWithEmployee>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM leave_requests r
            JOIN employees e ON e.id = r.employee_id
            WHERE
                r.status = 'approved'
                AND r.start_date <= $1
                AND r.end_date >= $1
            ORDER BY r.start_date
            "#
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: LeaveStatus,
        approved_by: Option<Uuid>,
        rejection_reason: Option<String>,
    ) -> Result<LeaveRequest> {
        let request = sqlx::query_as::<_, LeaveRequest>(&status_update_query())
            .bind(status)
            .bind(approved_by)
            .bind(rejection_reason)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(request)
    }

    /// Transaction-scoped variant used when the status flip must commit
    /// together with a balance deduction.
    pub async fn update_status_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: LeaveStatus,
        approved_by: Option<Uuid>,
        rejection_reason: Option<String>,
    ) -> Result<LeaveRequest> {
        let request = sqlx::query_as::<_, LeaveRequest>(&status_update_query())
            .bind(status)
            .bind(approved_by)
            .bind(rejection_reason)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;

        Ok(request)
    }
}

fn status_update_query() -> String {
    format!(
        r#"
        UPDATE leave_requests
        SET
            status = $1,
            approved_by = $2,
            approved_at = CASE WHEN $1 IN ('approved', 'rejected') THEN $4 ELSE approved_at END,
            rejection_reason = $3,
            updated_at = $4
        WHERE
            id = $5
        RETURNING {REQUEST_COLUMNS}
        "#
    )
}
