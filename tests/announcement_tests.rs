use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

use peopledesk::database::models::EmployeeRole;
use peopledesk::routes;

mod common;

macro_rules! announcement_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.config_data.clone())
                .app_data($ctx.announcement_repo.clone())
                .app_data($ctx.employee_repo.clone())
                .service(web::scope("/api/v1").configure(routes::announcements::configure)),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
async fn create_is_denied_to_plain_employees() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = announcement_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/announcements")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "title": "Office closed",
            "content": "The office is closed on Friday."
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn create_requires_title_and_content() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = announcement_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Hr, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/announcements")
        .insert_header(("Authorization", token))
        .set_json(json!({ "title": "", "content": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn admin_listing_is_denied_to_plain_employees() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = announcement_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/announcements")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn listing_with_unknown_priority_is_rejected() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = announcement_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Hr, &ctx.config);

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/announcements?priority=urgent")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
