use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{AttendanceRecord, AttendanceStatus};
use crate::database::repositories::AttendanceRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    pub employee_id: Option<Uuid>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Open today's attendance record
pub async fn clock_in(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
) -> Result<HttpResponse> {
    let now = Utc::now();
    let today = now.date_naive();

    let existing = repo
        .find_by_day(claims.sub, today)
        .await
        .map_err(AppError::from)?;

    let record = match existing {
        Some(record) if record.clock_in.is_some() => {
            return Err(AppError::BadRequest("Already clocked in today".into()).into());
        }
        Some(record) => repo
            .set_clock_in(record.id, now)
            .await
            .map_err(AppError::from)?,
        None => {
            let record = AttendanceRecord {
                id: Uuid::new_v4(),
                employee_id: claims.sub,
                work_date: today,
                clock_in: Some(now),
                clock_out: None,
                total_hours: None,
                status: AttendanceStatus::Present,
                created_at: now,
                updated_at: now,
            };
            repo.create(&record).await.map_err(AppError::from)?
        }
    };

    Ok(ApiResponse::success_with_message(
        record,
        "Clocked in successfully",
    ))
}

/// Close today's attendance record and compute hours worked
pub async fn clock_out(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
) -> Result<HttpResponse> {
    let now = Utc::now();
    let today = now.date_naive();

    let record = repo
        .find_by_day(claims.sub, today)
        .await
        .map_err(AppError::from)?;

    let record = match record {
        Some(record) => record,
        None => return Err(AppError::BadRequest("Please clock in first".into()).into()),
    };

    let clock_in = match record.clock_in {
        Some(clock_in) => clock_in,
        None => return Err(AppError::BadRequest("Please clock in first".into()).into()),
    };

    if record.clock_out.is_some() {
        return Err(AppError::BadRequest("Already clocked out today".into()).into());
    }

    let total_hours = AttendanceRecord::worked_hours(clock_in, now);
    let updated = repo
        .set_clock_out(record.id, now, total_hours)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success_with_message(
        updated,
        "Clocked out successfully",
    ))
}

/// Attendance history, filterable to a calendar month
pub async fn list_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse> {
    let employee_id = match query.employee_id {
        Some(id) if id != claims.sub => {
            if !claims.can_manage_leave() {
                return Err(AppError::Forbidden(
                    "Cannot view other employees' attendance".into(),
                )
                .into());
            }
            id
        }
        _ => claims.sub,
    };

    let month = match (query.year, query.month) {
        (Some(year), Some(month)) => {
            if !(1..=12).contains(&month) {
                return Err(AppError::BadRequest("Month must be between 1 and 12".into()).into());
            }
            Some((year, month))
        }
        (None, None) => None,
        _ => {
            return Err(
                AppError::BadRequest("Month and year must be provided together".into()).into(),
            )
        }
    };

    let records = repo
        .list(employee_id, month)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(records))
}
