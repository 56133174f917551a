use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

use peopledesk::database::models::EmployeeRole;
use peopledesk::routes;

mod common;

macro_rules! leave_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.app_state.clone())
                .app_data($ctx.config_data.clone())
                .app_data($ctx.leave_service.clone())
                .service(web::scope("/api/v1").configure(routes::leave::configure)),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
async fn submit_without_token_is_unauthorized() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/leave/requests")
        .set_json(json!({
            "leaveType": "casual",
            "startDate": "2025-06-12",
            "endDate": "2025-06-15",
            "reason": "Family function at home"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn submit_with_short_reason_is_rejected() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/leave/requests")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "leaveType": "casual",
            "startDate": "2025-06-12",
            "endDate": "2025-06-15",
            "reason": "short"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn submit_for_someone_else_requires_manager_role() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/leave/requests")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "employeeId": "5d2f3c77-47b5-4c52-9ad0-47b0c1d0f6fb",
            "leaveType": "sick",
            "startDate": "2025-06-12",
            "endDate": "2025-06-12",
            "reason": "Doctor appointment booked"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn employees_cannot_process_requests() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::put()
        .uri("/api/v1/leave/requests/4be4de0f-0188-4f0b-b663-62aefc1478bc/status")
        .insert_header(("Authorization", token))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn status_endpoint_only_accepts_approved_or_rejected() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Manager, &ctx.config);

    // Act: cancellation goes through the cancel endpoint, not status
    let req = test::TestRequest::put()
        .uri("/api/v1/leave/requests/4be4de0f-0188-4f0b-b663-62aefc1478bc/status")
        .insert_header(("Authorization", token))
        .set_json(json!({ "status": "cancelled" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn list_with_unknown_status_filter_is_rejected() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/leave/requests?status=denied")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn pending_queue_is_manager_only() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/leave/pending")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn balance_adjustment_requires_hr_role() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = leave_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Manager, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/leave/balance/4be4de0f-0188-4f0b-b663-62aefc1478bc/adjust")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "leaveType": "casual",
            "days": 2.0,
            "direction": "add"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
