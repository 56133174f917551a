use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::LeaveAllotments;
use crate::database::models::{
    AdjustDirection, BalanceAdjustmentInput, LeaveBalance, LeaveBalanceView, LeaveRequest,
    LeaveRequestInput, LeaveRequestWithEmployee, LeaveStatus, LeaveStatusInput, LeaveType,
};
use crate::database::repositories::{
    EmployeeRepository, LeaveBalanceRepository, LeaveRequestRepository,
};
use crate::error::AppError;

const MIN_REASON_LEN: usize = 10;
const MAX_REASON_LEN: usize = 500;

/// The leave workflow: submission with balance checks, the
/// pending -> approved/rejected/cancelled state machine, and the per-year
/// ledger it deducts from. Approval mutates request and ledger in one
/// transaction with the ledger row locked, so two approvals against the same
/// bucket serialize instead of double-spending it.
#[derive(Clone)]
pub struct LeaveService {
    pool: PgPool,
    requests: LeaveRequestRepository,
    balances: LeaveBalanceRepository,
    employees: EmployeeRepository,
    allotments: LeaveAllotments,
}

impl LeaveService {
    pub fn new(
        pool: PgPool,
        requests: LeaveRequestRepository,
        balances: LeaveBalanceRepository,
        employees: EmployeeRepository,
        allotments: LeaveAllotments,
    ) -> Self {
        Self {
            pool,
            requests,
            balances,
            employees,
            allotments,
        }
    }

    pub async fn submit(
        &self,
        employee_id: Uuid,
        input: LeaveRequestInput,
    ) -> Result<LeaveRequest, AppError> {
        let reason = input.reason.trim();
        if reason.len() < MIN_REASON_LEN || reason.len() > MAX_REASON_LEN {
            return Err(AppError::BadRequest(format!(
                "Reason must be between {} and {} characters",
                MIN_REASON_LEN, MAX_REASON_LEN
            )));
        }

        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

        let duration = compute_duration(input.start_date, input.end_date, input.is_half_day)?;

        // The balance year follows the start of the absence.
        let year = input.start_date.year();
        let balance = self
            .balances
            .get_or_create(&LeaveBalance::new(employee.id, year, &self.allotments))
            .await?;

        if input.leave_type != LeaveType::Unpaid {
            let available = balance.bucket(input.leave_type).available;
            if available < duration {
                return Err(AppError::BadRequest(format!(
                    "Insufficient {} leave balance. Available: {} days, Requested: {} days",
                    input.leave_type, available, duration
                )));
            }
        }

        let now = Utc::now();
        let request = LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            leave_type: input.leave_type,
            start_date: input.start_date,
            end_date: input.end_date,
            is_half_day: input.is_half_day,
            half_day_period: input.half_day_period,
            duration,
            reason: reason.to_string(),
            emergency_contact: input.emergency_contact,
            status: LeaveStatus::Pending,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.requests.create(&request).await?;

        Ok(created)
    }

    /// Approve or reject a pending request. Approval deducts the request's
    /// duration from the matching bucket of the ledger for the request's
    /// start year; both writes commit atomically.
    pub async fn set_status(
        &self,
        request_id: Uuid,
        input: LeaveStatusInput,
        approver: Uuid,
    ) -> Result<LeaveRequest, AppError> {
        if !matches!(input.status, LeaveStatus::Approved | LeaveStatus::Rejected) {
            return Err(AppError::BadRequest(
                "Status must be \"approved\" or \"rejected\"".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let request = self
            .requests
            .find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave request not found".into()))?;

        if request.status != LeaveStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Leave request is already {}",
                request.status
            )));
        }

        let approver = if approver.is_nil() { None } else { Some(approver) };

        let updated = match input.status {
            LeaveStatus::Approved => {
                let year = request.start_date.year();

                let mut balance = match self
                    .balances
                    .find_for_update(&mut tx, request.employee_id, year)
                    .await?
                {
                    Some(balance) => balance,
                    None => {
                        let fresh =
                            LeaveBalance::new(request.employee_id, year, &self.allotments);
                        self.balances.create_tx(&mut tx, &fresh).await?;
                        self.balances
                            .find_for_update(&mut tx, request.employee_id, year)
                            .await?
                            .ok_or_else(|| {
                                AppError::internal_server_error_message(
                                    "leave balance vanished after upsert",
                                )
                            })?
                    }
                };

                // Re-check against the locked row; the submit-time check can
                // be stale by the time a manager approves.
                if request.leave_type != LeaveType::Unpaid {
                    let available = balance.bucket(request.leave_type).available;
                    if available < request.duration {
                        return Err(AppError::BadRequest(format!(
                            "Insufficient {} leave balance. Available: {} days, Requested: {} days",
                            request.leave_type, available, request.duration
                        )));
                    }
                }

                let updated = self
                    .requests
                    .update_status_tx(&mut tx, request_id, LeaveStatus::Approved, approver, None)
                    .await?;

                balance.apply(request.leave_type, request.duration, AdjustDirection::Deduct);
                self.balances.save_usage_tx(&mut tx, &balance).await?;

                updated
            }
            LeaveStatus::Rejected => {
                self.requests
                    .update_status_tx(
                        &mut tx,
                        request_id,
                        LeaveStatus::Rejected,
                        approver,
                        input.rejection_reason,
                    )
                    .await?
            }
            _ => unreachable!("guarded above"),
        };

        tx.commit().await?;

        Ok(updated)
    }

    /// Employee-initiated withdrawal; only the owner, only while pending.
    pub async fn cancel(
        &self,
        request_id: Uuid,
        requester: Uuid,
    ) -> Result<LeaveRequest, AppError> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave request not found".into()))?;

        if request.employee_id != requester {
            return Err(AppError::Forbidden(
                "You can only cancel your own leave requests".into(),
            ));
        }
        if request.status != LeaveStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Cannot cancel {} leave request",
                request.status
            )));
        }

        let cancelled = self
            .requests
            .update_status(request_id, LeaveStatus::Cancelled, None, None)
            .await?;

        Ok(cancelled)
    }

    pub async fn find_request(&self, request_id: Uuid) -> Result<LeaveRequest, AppError> {
        self.requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave request not found".into()))
    }

    pub async fn list_for_employee(
        &self,
        employee_id: Uuid,
        status: Option<LeaveStatus>,
        year: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let requests = self
            .requests
            .list_for_employee(employee_id, status, year, limit, offset)
            .await?;

        Ok(requests)
    }

    pub async fn pending(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<LeaveRequestWithEmployee>, AppError> {
        Ok(self.requests.list_pending(department).await?)
    }

    pub async fn on_leave(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<LeaveRequestWithEmployee>, AppError> {
        Ok(self.requests.on_leave(date).await?)
    }

    /// Lazily creates the year's ledger on first read.
    pub async fn balance(
        &self,
        employee_id: Uuid,
        year: Option<i32>,
    ) -> Result<LeaveBalanceView, AppError> {
        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

        let year = year.unwrap_or_else(|| Utc::now().year());
        let balance = self
            .balances
            .get_or_create(&LeaveBalance::new(employee.id, year, &self.allotments))
            .await?;

        Ok(balance.view())
    }

    /// Manual HR correction of a bucket, same clamping rules as approval.
    pub async fn adjust_balance(
        &self,
        employee_id: Uuid,
        year: Option<i32>,
        input: BalanceAdjustmentInput,
    ) -> Result<LeaveBalanceView, AppError> {
        if input.days <= 0.0 || input.days.fract() % 0.5 != 0.0 {
            return Err(AppError::BadRequest(
                "Adjustment must be a positive number of days in 0.5 steps".into(),
            ));
        }

        let year = year.unwrap_or_else(|| Utc::now().year());

        let mut tx = self.pool.begin().await?;

        let mut balance = match self
            .balances
            .find_for_update(&mut tx, employee_id, year)
            .await?
        {
            Some(balance) => balance,
            None => {
                let fresh = LeaveBalance::new(employee_id, year, &self.allotments);
                self.balances.create_tx(&mut tx, &fresh).await?;
                self.balances
                    .find_for_update(&mut tx, employee_id, year)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal_server_error_message(
                            "leave balance vanished after upsert",
                        )
                    })?
            }
        };

        balance.apply(input.leave_type, input.days, input.direction);
        let saved = self.balances.save_usage_tx(&mut tx, &balance).await?;

        tx.commit().await?;

        Ok(saved.view())
    }
}

/// Inclusive day span of the range, or 0.5 for a half-day request.
pub fn compute_duration(
    start_date: NaiveDate,
    end_date: NaiveDate,
    is_half_day: bool,
) -> Result<f64, AppError> {
    if start_date > end_date {
        return Err(AppError::BadRequest(
            "End date cannot be before start date".into(),
        ));
    }

    if is_half_day {
        if start_date != end_date {
            return Err(AppError::BadRequest(
                "Half-day leave must start and end on the same date".into(),
            ));
        }
        return Ok(0.5);
    }

    Ok(((end_date - start_date).num_days() + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_is_inclusive_of_both_endpoints() {
        let days = compute_duration(date(2025, 6, 12), date(2025, 6, 15), false).unwrap();
        assert_eq!(days, 4.0);
    }

    #[test]
    fn single_day_counts_as_one() {
        let days = compute_duration(date(2025, 6, 12), date(2025, 6, 12), false).unwrap();
        assert_eq!(days, 1.0);
    }

    #[test]
    fn half_day_is_half_regardless_of_flag_order() {
        let days = compute_duration(date(2025, 6, 12), date(2025, 6, 12), true).unwrap();
        assert_eq!(days, 0.5);
    }

    #[test]
    fn half_day_spanning_multiple_days_is_rejected() {
        let err = compute_duration(date(2025, 6, 12), date(2025, 6, 13), true).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = compute_duration(date(2025, 6, 15), date(2025, 6, 12), false).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn four_day_request_does_not_fit_one_remaining_day() {
        let mut balance = LeaveBalance::new(
            Uuid::new_v4(),
            2025,
            &crate::config::LeaveAllotments::default(),
        );
        balance.apply(LeaveType::Casual, 11.0, AdjustDirection::Deduct);
        assert_eq!(balance.bucket(LeaveType::Casual).available, 1.0);

        let duration = compute_duration(date(2025, 6, 12), date(2025, 6, 15), false).unwrap();
        assert!(balance.bucket(LeaveType::Casual).available < duration);
    }
}
