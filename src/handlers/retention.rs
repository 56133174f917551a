use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::database::repositories::{DepartmentHeadcount, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::retention::{self, RetentionInput};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionAnalytics {
    pub total_employees: i64,
    pub department_breakdown: Vec<DepartmentHeadcount>,
}

/// Score one employee's attrition risk from survey factors
pub async fn predict(
    claims: Claims,
    input: web::Json<RetentionInput>,
) -> Result<HttpResponse> {
    if !claims.can_manage_leave() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let input = input.into_inner();
    let out_of_range = [
        input.job_satisfaction,
        input.engagement_level,
        input.work_life_balance,
        input.salary_satisfaction,
        input.career_growth,
        input.manager_relationship,
        input.performance_score,
    ]
    .iter()
    .any(|score| !(0.0..=10.0).contains(score));
    if out_of_range || input.tenure < 0.0 {
        return Err(AppError::BadRequest(
            "Factor scores must be between 0 and 10; tenure must be non-negative".into(),
        )
        .into());
    }

    let prediction = retention::predict(&input);

    Ok(ApiResponse::success(prediction))
}

/// Workforce composition figures backing the retention dashboard
pub async fn analytics(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
) -> Result<HttpResponse> {
    if !claims.can_manage_leave() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let total_employees = employees.count_active().await.map_err(AppError::from)?;
    let department_breakdown = employees
        .department_headcounts()
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(RetentionAnalytics {
        total_employees,
        department_breakdown,
    }))
}
