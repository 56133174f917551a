use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub role: EmployeeRole,
    pub status: EmployeeStatus,
    pub skills: Vec<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing)]
    pub otp_code: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub reset_otp_code: Option<String>,
    #[serde(skip_serializing)]
    pub reset_otp_expires_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    pub enum EmployeeRole {
        Admin => "admin",
        Hr => "hr",
        Manager => "manager",
        Employee => "employee",
    }
}

impl Default for EmployeeRole {
    fn default() -> Self {
        EmployeeRole::Employee
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    pub enum EmployeeStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub role: Option<EmployeeRole>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdateInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub skills: Option<Vec<String>>,
}

/// Self-service profile update, restricted to the sections an employee owns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateInput {
    pub phone: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Public projection without credential/OTP columns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub role: EmployeeRole,
    pub status: EmployeeStatus,
}

impl From<Employee> for EmployeeInfo {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            department: e.department,
            designation: e.designation,
            role: e.role,
            status: e.status,
        }
    }
}

impl Employee {
    pub fn new(name: String, email: String, password_hash: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            phone: None,
            department: None,
            designation: None,
            joining_date: None,
            role: EmployeeRole::Employee,
            status: EmployeeStatus::Active,
            skills: Vec::new(),
            emergency_contact_name: None,
            emergency_contact_phone: None,
            profile_picture_url: None,
            otp_code: None,
            otp_expires_at: None,
            is_verified: false,
            reset_otp_code: None,
            reset_otp_expires_at: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn years_of_service(&self, today: NaiveDate) -> i64 {
        match self.joining_date {
            Some(joined) => ((today - joined).num_days() / 365).max(0),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in ["admin", "hr", "manager", "employee"] {
            let parsed: EmployeeRole = role.parse().unwrap();
            assert_eq!(parsed.to_string(), role);
        }
        assert!("director".parse::<EmployeeRole>().is_err());
    }

    #[test]
    fn years_of_service_floors_partial_years() {
        let mut e = Employee::new("A".into(), "a@x.com".into(), None);
        e.joining_date = Some(NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        let today = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        assert_eq!(e.years_of_service(today), 2);
    }
}
