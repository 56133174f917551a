use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::config::Config;
use crate::database::models::{
    EmployeeInfo, ForgotPasswordInput, LoginInput, RegisterInput, ResetPasswordInput,
    VerifyOtpInput,
};
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::AppState;

pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.register(input.into_inner()).await?;

    Ok(ApiResponse::created(response))
}

pub async fn verify_otp(
    state: web::Data<AppState>,
    input: web::Json<VerifyOtpInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.verify_otp(input.into_inner()).await?;

    Ok(ApiResponse::success(response))
}

pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.login(input.into_inner()).await?;

    Ok(ApiResponse::success(response))
}

pub async fn me(claims: Claims, state: web::Data<AppState>) -> Result<HttpResponse> {
    let employee = state.auth_service.current_employee(&claims).await?;

    Ok(ApiResponse::success(EmployeeInfo::from(employee)))
}

pub async fn forgot_password(
    state: web::Data<AppState>,
    config: web::Data<Config>,
    input: web::Json<ForgotPasswordInput>,
) -> Result<HttpResponse> {
    let otp = state
        .auth_service
        .forgot_password(input.into_inner())
        .await?;

    // Surface the OTP outside production; mail delivery is an external concern
    if !config.is_production() {
        return Ok(ApiResponse::success(json!({ "otp": otp })));
    }

    Ok(ApiResponse::success_message("OTP sent to your email."))
}

pub async fn reset_password(
    state: web::Data<AppState>,
    input: web::Json<ResetPasswordInput>,
) -> Result<HttpResponse> {
    state
        .auth_service
        .reset_password(input.into_inner())
        .await?;

    Ok(ApiResponse::success_message("Password reset successfully"))
}
