use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serial_test::serial;

use peopledesk::routes;

mod common;

#[actix_web::test]
#[serial]
async fn me_without_token_is_unauthorized() {
    // Arrange
    let ctx = common::TestContext::new();

    let app = test::init_service(
        App::new()
            .app_data(ctx.app_state.clone())
            .app_data(ctx.config_data.clone())
            .service(web::scope("/api/v1").configure(routes::auth::configure)),
    )
    .await;

    // Act
    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn me_with_garbage_token_is_unauthorized() {
    // Arrange
    let ctx = common::TestContext::new();

    let app = test::init_service(
        App::new()
            .app_data(ctx.app_state.clone())
            .app_data(ctx.config_data.clone())
            .service(web::scope("/api/v1").configure(routes::auth::configure)),
    )
    .await;

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn token_without_bearer_prefix_is_rejected() {
    // Arrange
    let ctx = common::TestContext::new();
    let token = common::bearer_token(
        peopledesk::database::models::EmployeeRole::Admin,
        &ctx.config,
    );
    let bare = token.trim_start_matches("Bearer ").to_string();

    let app = test::init_service(
        App::new()
            .app_data(ctx.app_state.clone())
            .app_data(ctx.config_data.clone())
            .service(web::scope("/api/v1").configure(routes::auth::configure)),
    )
    .await;

    // Act
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", bare))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
