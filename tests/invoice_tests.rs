use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

use peopledesk::database::models::EmployeeRole;
use peopledesk::routes;

mod common;

macro_rules! invoice_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.config_data.clone())
                .app_data($ctx.invoice_repo.clone())
                .service(web::scope("/api/v1").configure(routes::invoices::configure)),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
async fn create_requires_hr_role() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = invoice_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/invoices")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "invoiceNumber": "INV-001",
            "clientName": "Acme",
            "clientEmail": "billing@acme.test",
            "invoiceDate": "2025-01-10",
            "dueDate": "2025-02-10",
            "items": [{ "description": "Consulting", "quantity": 1, "amount": "100.00" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn create_rejects_empty_line_items() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = invoice_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Hr, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/invoices")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "invoiceNumber": "INV-002",
            "clientName": "Acme",
            "clientEmail": "billing@acme.test",
            "invoiceDate": "2025-01-10",
            "dueDate": "2025-02-10",
            "items": []
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn create_rejects_malformed_pdf_data() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = invoice_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Hr, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/invoices")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "invoiceNumber": "INV-003",
            "clientName": "Acme",
            "clientEmail": "billing@acme.test",
            "invoiceDate": "2025-01-10",
            "dueDate": "2025-02-10",
            "items": [{ "description": "Consulting", "quantity": 1, "amount": "100.00" }],
            "pdfData": "@@not-base64@@"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn list_without_token_is_unauthorized() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = invoice_app!(ctx);

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/invoices")
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
