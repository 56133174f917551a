use actix_web::{web, HttpResponse, Result};
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Invoice, InvoiceInput, InvoiceStatus, InvoiceStatusInput};
use crate::database::repositories::InvoiceRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, Paginated};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
pub struct InvoiceListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Create an invoice; totals are computed server-side from the line items
pub async fn create_invoice(
    claims: Claims,
    repo: web::Data<InvoiceRepository>,
    input: web::Json<InvoiceInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let input = input.into_inner();
    if input.invoice_number.trim().is_empty() {
        return Err(AppError::BadRequest("Invoice number is required".into()).into());
    }
    if input.items.is_empty() {
        return Err(AppError::BadRequest("At least one line item is required".into()).into());
    }

    // Stored opaque, but must at least be valid base64
    if let Some(pdf_data) = input.pdf_data.as_deref() {
        if base64::engine::general_purpose::STANDARD
            .decode(pdf_data)
            .is_err()
        {
            return Err(AppError::BadRequest("pdfData is not valid base64".into()).into());
        }
    }

    if repo
        .number_exists(&input.invoice_number)
        .await
        .map_err(AppError::from)?
    {
        return Err(AppError::Conflict("Invoice number already exists".into()).into());
    }

    let subtotal = input.subtotal();
    let created_by = if claims.sub.is_nil() { None } else { Some(claims.sub) };

    let now = Utc::now();
    let invoice = Invoice {
        id: Uuid::new_v4(),
        invoice_number: input.invoice_number,
        client_name: input.client_name,
        client_email: input.client_email,
        invoice_date: input.invoice_date,
        due_date: input.due_date,
        items: sqlx::types::Json(input.items),
        currency: input.currency.unwrap_or_else(|| "USD".to_string()),
        total: subtotal.clone(),
        subtotal,
        notes: input.notes,
        status: InvoiceStatus::Draft,
        created_by,
        pdf_data: input.pdf_data,
        created_at: now,
        updated_at: now,
    };

    let created = repo.create(&invoice).await.map_err(AppError::from)?;

    Ok(ApiResponse::created(created))
}

pub async fn list_invoices(
    claims: Claims,
    repo: web::Data<InvoiceRepository>,
    query: web::Query<InvoiceListQuery>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<InvoiceStatus>()
                .map_err(|_| AppError::BadRequest("Invalid status".into()))?,
        ),
    };

    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let invoices = repo
        .list(status, limit, offset)
        .await
        .map_err(AppError::from)?;
    let total = repo.count(status).await.map_err(AppError::from)?;

    Ok(ApiResponse::success(Paginated::new(
        invoices, page, limit, total,
    )))
}

pub async fn get_invoice(
    claims: Claims,
    repo: web::Data<InvoiceRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let invoice = repo
        .find_by_id(path.into_inner())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Invoice not found".into()))?;

    Ok(ApiResponse::success(invoice))
}

pub async fn update_invoice_status(
    claims: Claims,
    repo: web::Data<InvoiceRepository>,
    path: web::Path<Uuid>,
    input: web::Json<InvoiceStatusInput>,
) -> Result<HttpResponse> {
    if !claims.is_hr_or_admin() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let updated = repo
        .update_status(path.into_inner(), input.status)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Invoice not found".into()))?;

    Ok(ApiResponse::success(updated))
}

pub async fn delete_invoice(
    claims: Claims,
    repo: web::Data<InvoiceRepository>,
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
        return Err(AppError::NotFound("Invoice not found".into()).into());
    }

    Ok(HttpResponse::NoContent().finish())
}
