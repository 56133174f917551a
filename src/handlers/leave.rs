use actix_web::{web, HttpResponse, Result};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    BalanceAdjustmentInput, LeaveRequestInput, LeaveStatus, LeaveStatusInput,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::LeaveService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveListQuery {
    pub employee_id: Option<Uuid>,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingQuery {
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OnLeaveQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub year: Option<i32>,
}

/// Submit a new leave request
pub async fn submit_request(
    claims: Claims,
    service: web::Data<LeaveService>,
    input: web::Json<LeaveRequestInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    // Employees file for themselves; managers may file on behalf of others
    let employee_id = match input.employee_id {
        Some(id) if id != claims.sub => {
            if !claims.can_manage_leave() {
                return Err(AppError::Forbidden(
                    "Can only submit leave requests for yourself".into(),
                )
                .into());
            }
            id
        }
        Some(id) => id,
        None => claims.sub,
    };

    let request = service.submit(employee_id, input).await?;

    Ok(ApiResponse::created(request))
}

/// List leave requests; employees see their own, managers can query anyone's
pub async fn list_requests(
    claims: Claims,
    service: web::Data<LeaveService>,
    query: web::Query<LeaveListQuery>,
) -> Result<HttpResponse> {
    let employee_id = if claims.can_manage_leave() {
        query.employee_id.unwrap_or(claims.sub)
    } else {
        claims.sub
    };

    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<LeaveStatus>()
                .map_err(|_| AppError::BadRequest("Invalid status".into()))?,
        ),
    };

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let requests = service
        .list_for_employee(employee_id, status, query.year, limit, offset)
        .await?;

    Ok(ApiResponse::success(requests))
}

pub async fn get_request(
    claims: Claims,
    service: web::Data<LeaveService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let request = service.find_request(path.into_inner()).await?;

    if !claims.can_manage_leave() && request.employee_id != claims.sub {
        return Err(AppError::Forbidden("Cannot view other employees' requests".into()).into());
    }

    Ok(ApiResponse::success(request))
}

/// Approve or reject a pending request (managers and up)
pub async fn set_request_status(
    claims: Claims,
    service: web::Data<LeaveService>,
    path: web::Path<Uuid>,
    input: web::Json<LeaveStatusInput>,
) -> Result<HttpResponse> {
    if !claims.can_manage_leave() {
        return Err(AppError::Forbidden(
            "Insufficient permissions to process leave requests".into(),
        )
        .into());
    }

    let request = service
        .set_status(path.into_inner(), input.into_inner(), claims.sub)
        .await?;

    Ok(ApiResponse::success(request))
}

/// Withdraw one's own pending request
pub async fn cancel_request(
    claims: Claims,
    service: web::Data<LeaveService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let request = service.cancel(path.into_inner(), claims.sub).await?;

    Ok(ApiResponse::success(request))
}

/// Pending queue for approvers, optionally narrowed by department
pub async fn pending_requests(
    claims: Claims,
    service: web::Data<LeaveService>,
    query: web::Query<PendingQuery>,
) -> Result<HttpResponse> {
    if !claims.can_manage_leave() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let department = query.department.as_deref().filter(|d| *d != "all");
    let requests = service.pending(department).await?;

    Ok(ApiResponse::success(requests))
}

/// Who is on approved leave on a date (today when unspecified)
pub async fn on_leave(
    claims: Claims,
    service: web::Data<LeaveService>,
    query: web::Query<OnLeaveQuery>,
) -> Result<HttpResponse> {
    if !claims.can_manage_leave() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let requests = service.on_leave(date).await?;

    Ok(ApiResponse::success(requests))
}

pub async fn get_balance(
    claims: Claims,
    service: web::Data<LeaveService>,
    path: web::Path<Uuid>,
    query: web::Query<BalanceQuery>,
) -> Result<HttpResponse> {
    let employee_id = path.into_inner();

    if !claims.can_manage_leave() && claims.sub != employee_id {
        return Err(AppError::Forbidden("Cannot view other employees' balance".into()).into());
    }

    let balance = service.balance(employee_id, query.year).await?;

    Ok(ApiResponse::success(balance))
}

/// Manual ledger correction (HR/admins only)
pub async fn adjust_balance(
    claims: Claims,
    service: web::Data<LeaveService>,
    path: web::Path<Uuid>,
    query: web::Query<BalanceQuery>,
    input: web::Json<BalanceAdjustmentInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let balance = service
        .adjust_balance(path.into_inner(), query.year, input.into_inner())
        .await?;

    Ok(ApiResponse::success(balance))
}
