use actix_web::{web, HttpResponse, Result};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::HolidayService;

#[derive(Debug, Deserialize)]
pub struct HolidaysQuery {
    pub country: Option<String>,
    pub year: Option<i32>,
}

pub async fn get_holidays(
    _claims: Claims,
    service: web::Data<HolidayService>,
    query: web::Query<HolidaysQuery>,
) -> Result<HttpResponse> {
    let country = query.country.as_deref().unwrap_or("IN");
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let response = service.holidays(country, year).await?;

    Ok(ApiResponse::success(response))
}
