use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::leave::LeaveType;
use crate::config::LeaveAllotments;

/// Persisted per-employee, per-year ledger row. Only `total` and `used` are
/// stored; `available` is derived on the way out.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaveBalance {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub year: i32,
    pub casual_total: f64,
    pub casual_used: f64,
    pub sick_total: f64,
    pub sick_used: f64,
    pub earned_total: f64,
    pub earned_used: f64,
    pub unpaid_total: f64,
    pub unpaid_used: f64,
    pub maternity_total: f64,
    pub maternity_used: f64,
    pub paternity_total: f64,
    pub paternity_used: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBucket {
    pub total: f64,
    pub used: f64,
    pub available: f64,
}

impl LeaveBucket {
    fn new(total: f64, used: f64) -> Self {
        Self {
            total,
            used,
            available: (total - used).max(0.0),
        }
    }
}

/// API projection of a balance row, one bucket per leave type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalanceView {
    pub employee_id: Uuid,
    pub year: i32,
    pub casual: LeaveBucket,
    pub sick: LeaveBucket,
    pub earned: LeaveBucket,
    pub unpaid: LeaveBucket,
    pub maternity: LeaveBucket,
    pub paternity: LeaveBucket,
    pub updated_at: DateTime<Utc>,
}

impl LeaveBalance {
    pub fn new(employee_id: Uuid, year: i32, allotments: &LeaveAllotments) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            year,
            casual_total: allotments.casual,
            casual_used: 0.0,
            sick_total: allotments.sick,
            sick_used: 0.0,
            earned_total: allotments.earned,
            earned_used: 0.0,
            unpaid_total: allotments.unpaid,
            unpaid_used: 0.0,
            maternity_total: allotments.maternity,
            maternity_used: 0.0,
            paternity_total: allotments.paternity,
            paternity_used: 0.0,
            updated_at: Utc::now(),
        }
    }

    pub fn bucket(&self, leave_type: LeaveType) -> LeaveBucket {
        let (total, used) = match leave_type {
            LeaveType::Casual => (self.casual_total, self.casual_used),
            LeaveType::Sick => (self.sick_total, self.sick_used),
            LeaveType::Earned => (self.earned_total, self.earned_used),
            LeaveType::Unpaid => (self.unpaid_total, self.unpaid_used),
            LeaveType::Maternity => (self.maternity_total, self.maternity_used),
            LeaveType::Paternity => (self.paternity_total, self.paternity_used),
        };
        LeaveBucket::new(total, used)
    }

    /// Apply an adjustment to the in-memory row. `used` never drops below
    /// zero, which also keeps `available` within [0, total].
    pub fn apply(&mut self, leave_type: LeaveType, days: f64, direction: AdjustDirection) {
        let used = match leave_type {
            LeaveType::Casual => &mut self.casual_used,
            LeaveType::Sick => &mut self.sick_used,
            LeaveType::Earned => &mut self.earned_used,
            LeaveType::Unpaid => &mut self.unpaid_used,
            LeaveType::Maternity => &mut self.maternity_used,
            LeaveType::Paternity => &mut self.paternity_used,
        };
        match direction {
            AdjustDirection::Deduct => *used += days,
            AdjustDirection::Add => *used = (*used - days).max(0.0),
        }
        self.updated_at = Utc::now();
    }

    pub fn view(&self) -> LeaveBalanceView {
        LeaveBalanceView {
            employee_id: self.employee_id,
            year: self.year,
            casual: self.bucket(LeaveType::Casual),
            sick: self.bucket(LeaveType::Sick),
            earned: self.bucket(LeaveType::Earned),
            unpaid: self.bucket(LeaveType::Unpaid),
            maternity: self.bucket(LeaveType::Maternity),
            paternity: self.bucket(LeaveType::Paternity),
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Deduct,
    Add,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAdjustmentInput {
    pub leave_type: LeaveType,
    pub days: f64,
    pub direction: AdjustDirection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeaveAllotments;

    fn fresh() -> LeaveBalance {
        LeaveBalance::new(Uuid::new_v4(), 2025, &LeaveAllotments::default())
    }

    #[test]
    fn available_is_total_minus_used_floored_at_zero() {
        let mut b = fresh();
        b.apply(LeaveType::Casual, 5.0, AdjustDirection::Deduct);
        assert_eq!(b.bucket(LeaveType::Casual).available, 7.0);

        b.apply(LeaveType::Casual, 20.0, AdjustDirection::Deduct);
        let bucket = b.bucket(LeaveType::Casual);
        assert_eq!(bucket.used, 25.0);
        assert_eq!(bucket.available, 0.0);
    }

    #[test]
    fn add_direction_never_drives_used_negative() {
        let mut b = fresh();
        b.apply(LeaveType::Sick, 1.0, AdjustDirection::Deduct);
        b.apply(LeaveType::Sick, 3.0, AdjustDirection::Add);
        assert_eq!(b.bucket(LeaveType::Sick).used, 0.0);
        assert_eq!(b.bucket(LeaveType::Sick).available, 12.0);
    }

    #[test]
    fn approving_one_sick_day_moves_both_counters() {
        let mut b = fresh();
        b.apply(LeaveType::Sick, 1.0, AdjustDirection::Deduct);
        let bucket = b.bucket(LeaveType::Sick);
        assert_eq!(bucket.used, 1.0);
        assert_eq!(bucket.available, 11.0);
    }
}
