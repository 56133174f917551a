use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub work_date: NaiveDate,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub total_hours: Option<f64>,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        HalfDay => "half_day",
    }
}

impl AttendanceRecord {
    /// Elapsed hours between clock-in and clock-out, rounded to 2 decimals.
    pub fn worked_hours(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> f64 {
        let hours = (clock_out - clock_in).num_seconds() as f64 / 3600.0;
        (hours * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn worked_hours_rounds_to_two_decimals() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 17, 20, 0).unwrap();
        assert_eq!(AttendanceRecord::worked_hours(start, end), 8.33);
    }
}
