use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web::Data, Error as ActixError, FromRequest,
    HttpRequest,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{
    AuthResponse, Employee, EmployeeRole, ForgotPasswordInput, LoginInput, RegisterInput,
    RegisterResponse, ResetPasswordInput, VerifyOtpInput,
};
use crate::database::repositories::EmployeeRepository;
use crate::error::AppError;

const OTP_VALIDITY_MINUTES: i64 = 10;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // employee id
    pub email: String,
    pub role: EmployeeRole,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn employee_id(&self) -> Uuid {
        self.sub
    }
    pub fn is_admin(&self) -> bool {
        self.role == EmployeeRole::Admin
    }
    pub fn is_hr(&self) -> bool {
        self.role == EmployeeRole::Hr
    }
    pub fn is_manager(&self) -> bool {
        self.role == EmployeeRole::Manager
    }
    pub fn can_manage_leave(&self) -> bool {
        self.is_admin() || self.is_hr() || self.is_manager()
    }
    pub fn is_hr_or_admin(&self) -> bool {
        self.is_admin() || self.is_hr()
    }

    /// Synthetic claims for the configured static admin token.
    fn static_admin() -> Self {
        Self {
            sub: Uuid::nil(),
            email: "admin@peopledesk.local".to_string(),
            role: EmployeeRole::Admin,
            exp: usize::MAX,
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    // Get the config from app data
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        if config
                            .admin_api_token
                            .as_deref()
                            .is_some_and(|admin_token| admin_token == token)
                        {
                            return ready(Ok(Claims::static_admin()));
                        }

                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Clone)]
pub struct AuthService {
    employee_repository: EmployeeRepository,
    config: Config,
}

impl AuthService {
    pub fn new(employee_repository: EmployeeRepository, config: Config) -> Self {
        Self {
            employee_repository,
            config,
        }
    }

    /// Register a new account in unverified state and issue a signup OTP.
    /// Mail delivery is an external concern; the OTP is logged instead.
    pub async fn register(&self, input: RegisterInput) -> Result<RegisterResponse, AppError> {
        if input.name.trim().is_empty() || input.email.trim().is_empty() {
            return Err(AppError::BadRequest("Name and email are required".into()));
        }
        if input.password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters".into(),
            ));
        }
        if self.employee_repository.email_exists(&input.email).await? {
            return Err(AppError::Conflict("Email already exists".into()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        let mut employee = Employee::new(input.name, input.email, Some(password_hash));
        if let Some(role) = input.role {
            employee.role = role;
        }

        let otp = generate_otp();
        employee.otp_code = Some(otp.clone());
        employee.otp_expires_at = Some(Utc::now() + Duration::minutes(OTP_VALIDITY_MINUTES));

        let employee = self.employee_repository.create(&employee).await?;

        log::info!("Signup OTP for {}: {}", employee.email, otp);

        Ok(RegisterResponse {
            message: format!("Registered with email {}", employee.email),
            email: employee.email,
        })
    }

    pub async fn verify_otp(&self, input: VerifyOtpInput) -> Result<AuthResponse, AppError> {
        let employee = self
            .employee_repository
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".into()))?;

        if employee.is_verified {
            return Err(AppError::BadRequest("Account already verified".into()));
        }

        let stored = employee
            .otp_code
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("No OTP issued for this account".into()))?;
        if stored != input.otp {
            return Err(AppError::BadRequest("Invalid OTP".into()));
        }

        let expired = employee
            .otp_expires_at
            .map_or(true, |expires_at| expires_at < Utc::now());
        if expired {
            return Err(AppError::BadRequest("Expired OTP".into()));
        }

        self.employee_repository.mark_verified(employee.id).await?;

        let token = self.generate_token(&employee)?;

        Ok(AuthResponse {
            token,
            employee: employee.into(),
        })
    }

    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AppError> {
        let employee = self
            .employee_repository
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = employee.password_hash.as_deref().ok_or_else(|| {
            AppError::BadRequest(
                "Account not activated. Please contact HR to set up your password.".into(),
            )
        })?;

        let valid = verify(&input.password, password_hash)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;
        if !valid {
            return Err(AppError::Unauthorized);
        }

        self.employee_repository
            .touch_last_login(employee.id)
            .await?;

        let token = self.generate_token(&employee)?;

        Ok(AuthResponse {
            token,
            employee: employee.into(),
        })
    }

    pub async fn current_employee(&self, claims: &Claims) -> Result<Employee, AppError> {
        self.employee_repository
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".into()))
    }

    /// Issue a password-reset OTP. Returned so development builds can surface
    /// it in the response body; callers must not leak it in production.
    pub async fn forgot_password(&self, input: ForgotPasswordInput) -> Result<String, AppError> {
        let employee = self
            .employee_repository
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::NotFound("No account for the given email".into()))?;

        let otp = generate_otp();
        let expires_at = Utc::now() + Duration::minutes(OTP_VALIDITY_MINUTES);
        self.employee_repository
            .set_reset_otp(employee.id, &otp, expires_at)
            .await?;

        log::info!("Password reset OTP for {}: {}", employee.email, otp);

        Ok(otp)
    }

    pub async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), AppError> {
        let employee = self
            .employee_repository
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired OTP".into()))?;

        let matches = employee
            .reset_otp_code
            .as_deref()
            .is_some_and(|stored| stored == input.otp);
        let live = employee
            .reset_otp_expires_at
            .is_some_and(|expires_at| expires_at > Utc::now());
        if !matches || !live {
            return Err(AppError::BadRequest("Invalid or expired OTP".into()));
        }

        if input.new_password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters".into(),
            ));
        }

        let password_hash = hash(&input.new_password, DEFAULT_COST)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        self.employee_repository
            .reset_password(employee.id, &password_hash)
            .await?;

        Ok(())
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(token_data.claims)
    }

    pub fn generate_token(&self, employee: &Employee) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(self.config.jwt_expiration_hours))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: employee.id,
            email: employee.email.clone(),
            role: employee.role,
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        Ok(token)
    }
}

/// Six-digit numeric OTP, zero-padded.
fn generate_otp() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{:06}", code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn static_admin_claims_have_admin_role() {
        let claims = Claims::static_admin();
        assert!(claims.is_admin());
        assert!(claims.can_manage_leave());
        assert_eq!(claims.sub, Uuid::nil());
    }
}
