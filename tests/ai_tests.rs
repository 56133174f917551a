use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

use peopledesk::database::models::EmployeeRole;
use peopledesk::routes;

mod common;

macro_rules! ai_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.config_data.clone())
                .app_data($ctx.ai_service.clone())
                .app_data($ctx.employee_repo.clone())
                .service(web::scope("/api/v1").configure(routes::ai::configure)),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
async fn chat_requires_a_message() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/ai/chat")
        .insert_header(("Authorization", token))
        .set_json(json!({ "message": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn chat_without_configured_key_is_unavailable() {
    // Arrange: test config carries no OPENAI_API_KEY
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/ai/chat")
        .insert_header(("Authorization", token))
        .set_json(json!({ "message": "How do I apply for leave?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
#[serial]
async fn faq_lists_the_canned_questions() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/ai/faq")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["faqs"].as_array().map(|a| a.len()), Some(5));
}

#[actix_web::test]
#[serial]
async fn screening_questions_are_denied_to_plain_employees() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/ai/screening-questions")
        .insert_header(("Authorization", token))
        .set_json(json!({
            "jobTitle": "Backend Engineer",
            "jobDescription": "Rust services over Postgres"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
