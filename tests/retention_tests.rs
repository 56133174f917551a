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

fn survey_body() -> serde_json::Value {
    json!({
        "jobSatisfaction": 2.0,
        "engagementLevel": 2.0,
        "tenure": 0.5,
        "workLifeBalance": 2.0,
        "salarySatisfaction": 2.0,
        "careerGrowth": 2.0,
        "managerRelationship": 2.0,
        "performanceScore": 2.0
    })
}

#[actix_web::test]
#[serial]
async fn predict_without_token_is_unauthorized() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/retention/predict")
        .set_json(survey_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn predict_is_denied_to_plain_employees() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Employee, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/retention/predict")
        .insert_header(("Authorization", token))
        .set_json(survey_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn predict_scores_a_dissatisfied_newcomer_as_high_risk() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Hr, &ctx.config);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/retention/predict")
        .insert_header(("Authorization", token))
        .set_json(survey_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["riskLevel"], json!("High"));
    assert_eq!(body["data"]["riskScore"], json!(147));
    assert_eq!(body["data"]["retentionProbability"], json!(0));
}

#[actix_web::test]
#[serial]
async fn predict_accepts_the_static_admin_token() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/retention/predict")
        .insert_header((
            "Authorization",
            format!("Bearer {}", common::TEST_ADMIN_TOKEN),
        ))
        .set_json(survey_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
#[serial]
async fn predict_rejects_out_of_range_factors() {
    // Arrange
    let ctx = common::TestContext::new();
    let app = ai_app!(ctx);
    let token = common::bearer_token(EmployeeRole::Hr, &ctx.config);

    let mut body = survey_body();
    body["jobSatisfaction"] = json!(14.0);

    // Act
    let req = test::TestRequest::post()
        .uri("/api/v1/retention/predict")
        .insert_header(("Authorization", token))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
