use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{Asset, AssetInput};
use crate::database::repositories::AssetRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn create_asset(
    claims: Claims,
    repo: web::Data<AssetRepository>,
    input: web::Json<AssetInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let input = input.into_inner();
    if input.name.trim().is_empty() || input.asset_tag.trim().is_empty() {
        return Err(AppError::BadRequest("Name and asset tag are required".into()).into());
    }

    if repo
        .tag_exists(&input.asset_tag)
        .await
        .map_err(AppError::from)?
    {
        return Err(AppError::Conflict("Asset tag already exists".into()).into());
    }

    let now = Utc::now();
    let asset = Asset {
        id: Uuid::new_v4(),
        name: input.name,
        asset_tag: input.asset_tag,
        category: input.category,
        assigned_to: input.assigned_to,
        department: input.department,
        status: input.status.unwrap_or_else(|| "available".to_string()),
        image_url: input.image_url,
        created_at: now,
        updated_at: now,
    };

    let created = repo.create(&asset).await.map_err(AppError::from)?;

    Ok(ApiResponse::created(created))
}

pub async fn list_assets(
    _claims: Claims,
    repo: web::Data<AssetRepository>,
) -> Result<HttpResponse> {
    let assets = repo.list().await.map_err(AppError::from)?;

    Ok(ApiResponse::success(assets))
}
