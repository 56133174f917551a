use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Employee, EmployeeStatus, EmployeeUpdateInput, ProfileUpdateInput,
};

const EMPLOYEE_COLUMNS: &str = r#"
    id,
    name,
    email,
    password_hash,
    phone,
    department,
    designation,
    joining_date,
    role,
    status,
    skills,
    emergency_contact_name,
    emergency_contact_phone,
    profile_picture_url,
    otp_code,
    otp_expires_at,
    is_verified,
    reset_otp_code,
    reset_otp_expires_at,
    last_login,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, employee: &Employee) -> Result<Employee> {
        let created = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO
                employees (
                    id, name, email, password_hash, phone, department,
                    designation, joining_date, role, status, skills,
                    emergency_contact_name, emergency_contact_phone,
                    profile_picture_url, otp_code, otp_expires_at, is_verified,
                    reset_otp_code, reset_otp_expires_at, last_login,
                    created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                 $15, $16, $17, $18, $19, $20, $21, $22)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.password_hash)
        .bind(&employee.phone)
        .bind(&employee.department)
        .bind(&employee.designation)
        .bind(employee.joining_date)
        .bind(employee.role)
        .bind(employee.status)
        .bind(&employee.skills)
        .bind(&employee.emergency_contact_name)
        .bind(&employee.emergency_contact_phone)
        .bind(&employee.profile_picture_url)
        .bind(&employee.otp_code)
        .bind(employee.otp_expires_at)
        .bind(employee.is_verified)
        .bind(&employee.reset_otp_code)
        .bind(employee.reset_otp_expires_at)
        .bind(employee.last_login)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn list(
        &self,
        department: Option<&str>,
        status: Option<EmployeeStatus>,
    ) -> Result<Vec<Employee>> {
        let mut query = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees");

        let mut conditions = vec![];
        if department.is_some() {
            conditions.push(format!("department = ${}", conditions.len() + 1));
        }
        if status.is_some() {
            conditions.push(format!("status = ${}", conditions.len() + 1));
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut prepared = sqlx::query_as::<_, Employee>(&query);
        if let Some(dept) = department {
            prepared = prepared.bind(dept.to_string());
        }
        if let Some(s) = status {
            prepared = prepared.bind(s);
        }

        let employees = prepared.fetch_all(&self.pool).await?;

        Ok(employees)
    }

    pub async fn update(&self, id: Uuid, input: EmployeeUpdateInput) -> Result<Employee> {
        let now = Utc::now();

        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                department = COALESCE($4, department),
                designation = COALESCE($5, designation),
                status = COALESCE($6, status),
                skills = COALESCE($7, skills),
                updated_at = $8
            WHERE
                id = $9
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(input.name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.department)
        .bind(input.designation)
        .bind(input.status)
        .bind(input.skills)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn update_profile(&self, id: Uuid, input: ProfileUpdateInput) -> Result<Employee> {
        let now = Utc::now();

        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET
                phone = COALESCE($1, phone),
                emergency_contact_name = COALESCE($2, emergency_contact_name),
                emergency_contact_phone = COALESCE($3, emergency_contact_phone),
                profile_picture_url = COALESCE($4, profile_picture_url),
                updated_at = $5
            WHERE
                id = $6
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(input.phone)
        .bind(input.emergency_contact_name)
        .bind(input.emergency_contact_phone)
        .bind(input.profile_picture_url)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn set_otp(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE employees SET otp_code = $1, otp_expires_at = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(code)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Clears the signup OTP and flags the account verified.
    pub async fn mark_verified(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE employees
            SET
                is_verified = TRUE,
                otp_code = NULL,
                otp_expires_at = NULL,
                updated_at = $1
            WHERE
                id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_reset_otp(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE employees
            SET
                reset_otp_code = $1,
                reset_otp_expires_at = $2,
                updated_at = $3
            WHERE
                id = $4
            "#,
        )
        .bind(code)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Swap in a new password hash and consume the reset OTP.
    pub async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE employees
            SET
                password_hash = $1,
                reset_otp_code = NULL,
                reset_otp_expires_at = NULL,
                updated_at = $2
            WHERE
                id = $3
            "#,
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE employees SET last_login = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn department_headcounts(&self) -> Result<Vec<DepartmentHeadcount>> {
        let rows = sqlx::query_as::<_, DepartmentHeadcount>(
            r#"
            SELECT
                COALESCE(department, 'Unassigned') AS department,
                COUNT(*) AS headcount
            FROM
                employees
            WHERE
                status = 'active'
            GROUP BY
                COALESCE(department, 'Unassigned')
            ORDER BY
                headcount DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_active(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentHeadcount {
    pub department: String,
    pub headcount: i64,
}
