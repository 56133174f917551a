use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    Announcement, AnnouncementAudience, AnnouncementInput, AnnouncementPriority,
    AnnouncementUpdateInput,
};
use crate::database::repositories::{AnnouncementRepository, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, Paginated};
use crate::services::auth::Claims;

const MAX_TITLE_LEN: usize = 200;
const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementListQuery {
    pub priority: Option<String>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

/// Publish an announcement (HR/admins only)
pub async fn create_announcement(
    claims: Claims,
    repo: web::Data<AnnouncementRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<AnnouncementInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let input = input.into_inner();
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::BadRequest("Title and content are required".into()).into());
    }
    if input.title.len() > MAX_TITLE_LEN || input.content.len() > MAX_CONTENT_LEN {
        return Err(AppError::BadRequest("Title or content too long".into()).into());
    }

    // The static admin token has no employee row behind it
    let author = employees
        .find_by_id(claims.sub)
        .await
        .map_err(AppError::from)?;
    let (author_id, author_name, author_designation) = match author {
        Some(author) => (
            Some(author.id),
            author.name,
            author.designation.unwrap_or_else(|| author.role.to_string()),
        ),
        None => (None, "Admin User".to_string(), "Admin".to_string()),
    };

    let now = Utc::now();
    let announcement = Announcement {
        id: Uuid::new_v4(),
        title: input.title,
        content: input.content,
        priority: input.priority.unwrap_or(AnnouncementPriority::Medium),
        author_id,
        author_name,
        author_designation,
        audience: input.audience.unwrap_or(AnnouncementAudience::All),
        departments: input.departments.unwrap_or_default(),
        image_url: input.image_url,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let created = repo.create(&announcement).await.map_err(AppError::from)?;

    Ok(ApiResponse::created(created))
}

/// Paginated admin listing with priority/active filters
pub async fn list_announcements(
    claims: Claims,
    repo: web::Data<AnnouncementRepository>,
    query: web::Query<AnnouncementListQuery>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let priority = match query.priority.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<AnnouncementPriority>()
                .map_err(|_| AppError::BadRequest("Invalid priority".into()))?,
        ),
    };

    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let announcements = repo
        .list(priority, query.is_active, limit, offset)
        .await
        .map_err(AppError::from)?;
    let total = repo
        .count(priority, query.is_active)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(Paginated::new(
        announcements,
        page,
        limit,
        total,
    )))
}

pub async fn update_announcement(
    claims: Claims,
    repo: web::Data<AnnouncementRepository>,
    path: web::Path<Uuid>,
    input: web::Json<AnnouncementUpdateInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let updated = repo
        .update(path.into_inner(), input.into_inner())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Announcement not found".into()))?;

    Ok(ApiResponse::success(updated))
}

pub async fn delete_announcement(
    claims: Claims,
    repo: web::Data<AnnouncementRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let deleted = repo
        .delete(path.into_inner())
        .await
        .map_err(AppError::from)?;
    if deleted == 0 {
        return Err(AppError::NotFound("Announcement not found".into()).into());
    }

    Ok(ApiResponse::success_message(
        "Announcement deleted successfully",
    ))
}

/// Employee-facing feed: active announcements targeted at everyone or at the
/// reader's department, newest first, flagged until read
pub async fn feed(
    claims: Claims,
    repo: web::Data<AnnouncementRepository>,
    employees: web::Data<EmployeeRepository>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let department = employees
        .find_by_id(claims.sub)
        .await
        .map_err(AppError::from)?
        .and_then(|e| e.department);

    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let items = repo
        .feed(claims.sub, department.as_deref(), limit)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(items))
}

pub async fn mark_read(
    claims: Claims,
    repo: web::Data<AnnouncementRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let announcement_id = path.into_inner();

    repo.find_by_id(announcement_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Announcement not found".into()))?;

    repo.mark_read(announcement_id, claims.sub)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success_message("Announcement marked as read"))
}
