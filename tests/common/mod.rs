use actix_web::web;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use peopledesk::config::LeaveAllotments;
use peopledesk::database::models::EmployeeRole;
use peopledesk::database::repositories::{
    AnnouncementRepository, AssetRepository, AttendanceRepository, EmployeeRepository,
    InvoiceRepository, LeaveBalanceRepository, LeaveRequestRepository,
};
use peopledesk::services::auth::Claims;
use peopledesk::services::{AiService, AuthService, HolidayService, LeaveService};
use peopledesk::{AppState, Config};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-that-is-long-enough";
pub const TEST_ADMIN_TOKEN: &str = "test-static-admin-token";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost:5432/peopledesk_test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiration_hours: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        client_base_url: "http://localhost:3000".to_string(),
        admin_api_token: Some(TEST_ADMIN_TOKEN.to_string()),
        openai_api_key: None,
        openai_base_url: "https://api.openai.com/v1".to_string(),
        openai_model: "gpt-3.5-turbo".to_string(),
        holidays_api_key: None,
        leave_allotments: LeaveAllotments::default(),
    }
}

/// The pool never connects until a query runs, so request paths that are
/// rejected before touching the database (missing token, role checks, input
/// validation) exercise the real stack without a live Postgres.
pub fn lazy_pool(config: &Config) -> PgPool {
    PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("valid database url")
}

/// Mint a JWT for an arbitrary employee id with the given role.
pub fn bearer_token(role: EmployeeRole, config: &Config) -> String {
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "tester@peopledesk.test".to_string(),
        role,
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .expect("token encodes");

    format!("Bearer {token}")
}

pub struct TestContext {
    pub config: Config,
    pub pool: PgPool,
    pub config_data: web::Data<Config>,
    pub app_state: web::Data<AppState>,
    pub employee_repo: web::Data<EmployeeRepository>,
    pub leave_request_repo: web::Data<LeaveRequestRepository>,
    pub leave_balance_repo: web::Data<LeaveBalanceRepository>,
    pub attendance_repo: web::Data<AttendanceRepository>,
    pub announcement_repo: web::Data<AnnouncementRepository>,
    pub invoice_repo: web::Data<InvoiceRepository>,
    pub asset_repo: web::Data<AssetRepository>,
    pub leave_service: web::Data<LeaveService>,
    pub ai_service: web::Data<AiService>,
    pub holiday_service: web::Data<HolidayService>,
}

impl TestContext {
    pub fn new() -> Self {
        let config = test_config();
        let pool = lazy_pool(&config);

        let employee_repository = EmployeeRepository::new(pool.clone());
        let leave_request_repository = LeaveRequestRepository::new(pool.clone());
        let leave_balance_repository = LeaveBalanceRepository::new(pool.clone());

        let auth_service = AuthService::new(employee_repository.clone(), config.clone());
        let leave_service = LeaveService::new(
            pool.clone(),
            leave_request_repository.clone(),
            leave_balance_repository.clone(),
            employee_repository.clone(),
            config.leave_allotments,
        );

        Self {
            config_data: web::Data::new(config.clone()),
            app_state: web::Data::new(AppState { auth_service }),
            employee_repo: web::Data::new(employee_repository),
            leave_request_repo: web::Data::new(leave_request_repository),
            leave_balance_repo: web::Data::new(leave_balance_repository),
            attendance_repo: web::Data::new(AttendanceRepository::new(pool.clone())),
            announcement_repo: web::Data::new(AnnouncementRepository::new(pool.clone())),
            invoice_repo: web::Data::new(InvoiceRepository::new(pool.clone())),
            asset_repo: web::Data::new(AssetRepository::new(pool.clone())),
            leave_service: web::Data::new(leave_service),
            ai_service: web::Data::new(AiService::new(config.clone())),
            holiday_service: web::Data::new(HolidayService::new(config.clone())),
            pool,
            config,
        }
    }
}
