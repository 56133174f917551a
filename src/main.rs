use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use peopledesk::database::{
    init_database,
    repositories::{
        AnnouncementRepository, AssetRepository, AttendanceRepository, EmployeeRepository,
        InvoiceRepository, LeaveBalanceRepository, LeaveRequestRepository,
    },
};
use peopledesk::middleware::RequestIdMiddleware;
use peopledesk::routes;
use peopledesk::services::{AiService, AuthService, HolidayService, LeaveService};
use peopledesk::{AppState, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("PeopleDesk API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting PeopleDesk API server...");

    // Load configuration
    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    // Initialize repositories and services
    let employee_repository = EmployeeRepository::new(pool.clone());
    let leave_request_repository = LeaveRequestRepository::new(pool.clone());
    let leave_balance_repository = LeaveBalanceRepository::new(pool.clone());
    let attendance_repository = AttendanceRepository::new(pool.clone());
    let announcement_repository = AnnouncementRepository::new(pool.clone());
    let invoice_repository = InvoiceRepository::new(pool.clone());
    let asset_repository = AssetRepository::new(pool.clone());

    let auth_service = AuthService::new(employee_repository.clone(), config.clone());
    let leave_service = LeaveService::new(
        pool.clone(),
        leave_request_repository.clone(),
        leave_balance_repository.clone(),
        employee_repository.clone(),
        config.leave_allotments,
    );
    let ai_service = AiService::new(config.clone());
    let holiday_service = HolidayService::new(config.clone());

    // Create app state and repository data
    let app_state = web::Data::new(AppState { auth_service });
    let employee_repo_data = web::Data::new(employee_repository);
    let leave_request_repo_data = web::Data::new(leave_request_repository);
    let leave_balance_repo_data = web::Data::new(leave_balance_repository);
    let attendance_repo_data = web::Data::new(attendance_repository);
    let announcement_repo_data = web::Data::new(announcement_repository);
    let invoice_repo_data = web::Data::new(invoice_repository);
    let asset_repo_data = web::Data::new(asset_repository);
    let leave_service_data = web::Data::new(leave_service);
    let ai_service_data = web::Data::new(ai_service);
    let holiday_service_data = web::Data::new(holiday_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(employee_repo_data.clone())
            .app_data(leave_request_repo_data.clone())
            .app_data(leave_balance_repo_data.clone())
            .app_data(attendance_repo_data.clone())
            .app_data(announcement_repo_data.clone())
            .app_data(invoice_repo_data.clone())
            .app_data(asset_repo_data.clone())
            .app_data(leave_service_data.clone())
            .app_data(ai_service_data.clone())
            .app_data(holiday_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
