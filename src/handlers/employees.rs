use actix_web::{web, HttpResponse, Result};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    AttendanceRecord, Employee, EmployeeInput, EmployeeStatus, EmployeeUpdateInput,
    LeaveBalanceView, LeaveStatus, ProfileUpdateInput,
};
use crate::database::repositories::{AttendanceRepository, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::LeaveService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListQuery {
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub employee: DashboardEmployee,
    pub attendance: DashboardAttendance,
    pub leave: DashboardLeave,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEmployee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAttendance {
    pub today: Option<AttendanceRecord>,
    pub is_checked_in: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLeave {
    pub balance: LeaveBalanceView,
    pub pending_requests: usize,
}

/// List employees with optional department/status filters (managers and up)
pub async fn list_employees(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    query: web::Query<EmployeeListQuery>,
) -> Result<HttpResponse> {
    if !claims.can_manage_leave() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let employees = repo
        .list(query.department.as_deref(), query.status)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(employees))
}

/// Create an employee record; the account stays unactivated until a password
/// is set through the auth flow (HR/admins only)
pub async fn create_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    input: web::Json<EmployeeInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let input = input.into_inner();
    if input.name.trim().is_empty() || input.email.trim().is_empty() {
        return Err(AppError::BadRequest("Name and email are required".into()).into());
    }

    if repo
        .email_exists(&input.email)
        .await
        .map_err(AppError::from)?
    {
        return Err(AppError::Conflict("Email already exists".into()).into());
    }

    let mut employee = Employee::new(input.name, input.email, None);
    employee.phone = input.phone;
    employee.department = input.department;
    employee.designation = input.designation;
    employee.joining_date = input.joining_date;
    if let Some(role) = input.role {
        employee.role = role;
    }
    if let Some(skills) = input.skills {
        employee.skills = skills;
    }

    let created = repo.create(&employee).await.map_err(AppError::from)?;

    Ok(ApiResponse::created(created))
}

pub async fn get_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let employee_id = path.into_inner();

    // Employees can only read their own record
    if !claims.can_manage_leave() && claims.sub != employee_id {
        return Err(AppError::Forbidden("Cannot view other employees".into()).into());
    }

    let employee = repo
        .find_by_id(employee_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

    Ok(ApiResponse::success(employee))
}

pub async fn update_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
    input: web::Json<EmployeeUpdateInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let employee_id = path.into_inner();
    repo.find_by_id(employee_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

    let updated = repo
        .update(employee_id, input.into_inner())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(updated))
}

pub async fn delete_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let deleted = repo
        .delete(path.into_inner())
        .await
        .map_err(AppError::from)?;
    if deleted == 0 {
        return Err(AppError::NotFound("Employee not found".into()).into());
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Self-service profile sections only; HR fields go through update_employee
pub async fn update_my_profile(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    input: web::Json<ProfileUpdateInput>,
) -> Result<HttpResponse> {
    repo.find_by_id(claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

    let updated = repo
        .update_profile(claims.sub, input.into_inner())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(updated))
}

/// Portal landing summary: who am I, today's attendance, leave standing
pub async fn my_dashboard(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    attendance: web::Data<AttendanceRepository>,
    leave: web::Data<LeaveService>,
) -> Result<HttpResponse> {
    let employee = employees
        .find_by_id(claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

    let today = Utc::now().date_naive();
    let today_record = attendance
        .find_by_day(employee.id, today)
        .await
        .map_err(AppError::from)?;
    let is_checked_in = today_record
        .as_ref()
        .is_some_and(|r| r.clock_in.is_some() && r.clock_out.is_none());

    let balance = leave.balance(employee.id, Some(today.year())).await?;
    let pending = leave
        .list_for_employee(employee.id, Some(LeaveStatus::Pending), None, 100, 0)
        .await?;

    let dashboard = DashboardResponse {
        employee: DashboardEmployee {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            department: employee.department,
            designation: employee.designation,
        },
        attendance: DashboardAttendance {
            today: today_record,
            is_checked_in,
        },
        leave: DashboardLeave {
            balance,
            pending_requests: pending.len(),
        },
    };

    Ok(ApiResponse::success(dashboard))
}
