use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::database::repositories::EmployeeRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::ai::ChatTurn;
use crate::services::auth::Claims;
use crate::services::AiService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    pub message: String,
    pub context: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPathInput {
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapInput {
    pub employee_id: Option<Uuid>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningInput {
    pub job_title: String,
    pub job_description: String,
    pub question_count: Option<u8>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
struct FaqEntry {
    id: u32,
    question: &'static str,
    answer: &'static str,
}

/// HR assistant chat backed by the completions API
pub async fn chat(
    _claims: Claims,
    service: web::Data<AiService>,
    input: web::Json<ChatInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    if input.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message is required".into()).into());
    }

    let context = input.context.as_deref().unwrap_or("hr");
    let reply = service
        .chat(&input.message, context, &input.conversation_history)
        .await?;

    Ok(ApiResponse::success(reply))
}

/// Canned answers for the most common portal questions
pub async fn faq(_claims: Claims) -> Result<HttpResponse> {
    let faqs = [
        FaqEntry {
            id: 1,
            question: "How do I apply for leave?",
            answer: "You can apply for leave through the employee portal. Go to the 'Leaves' \
                     section, select your leave type, choose dates, and submit your request for \
                     manager approval.",
        },
        FaqEntry {
            id: 2,
            question: "What are the company holidays for this year?",
            answer: "You can view all company holidays in the 'Holidays' section of the \
                     dashboard. This includes national holidays and company-specific holidays.",
        },
        FaqEntry {
            id: 3,
            question: "How do I update my personal information?",
            answer: "Go to your employee profile section to update personal information such as \
                     contact details, address, and emergency contacts.",
        },
        FaqEntry {
            id: 4,
            question: "What benefits do I have access to?",
            answer: "Your benefits information can be found in the employee handbook and \
                     benefits section of the portal. This includes health insurance, retirement \
                     plans, and other company benefits.",
        },
        FaqEntry {
            id: 5,
            question: "How do I report time and attendance?",
            answer: "Use the clock-in/clock-out feature in the attendance section. Make sure to \
                     log your time accurately each day.",
        },
    ];

    Ok(ApiResponse::success(json!({ "faqs": faqs })))
}

/// Suggested next roles for an employee
pub async fn career_paths(
    claims: Claims,
    service: web::Data<AiService>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<CareerPathInput>,
) -> Result<HttpResponse> {
    let employee = resolve_employee(&claims, &employees, input.employee_id).await?;
    let response = service.career_paths(&employee).await?;

    Ok(ApiResponse::success(response))
}

/// Four-tier roadmap towards a target role
pub async fn roadmap(
    claims: Claims,
    service: web::Data<AiService>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<RoadmapInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    let employee = resolve_employee(&claims, &employees, input.employee_id).await?;
    let roadmap = service.roadmap(&employee, input.role).await?;

    Ok(ApiResponse::success(roadmap))
}

/// Screening questions for a job opening (HR/managers)
pub async fn screening_questions(
    claims: Claims,
    service: web::Data<AiService>,
    input: web::Json<ScreeningInput>,
) -> Result<HttpResponse> {
    if !claims.can_manage_leave() {
        return Err(AppError::Forbidden("Insufficient permissions".into()).into());
    }

    let input = input.into_inner();
    if input.job_title.trim().is_empty() || input.job_description.trim().is_empty() {
        return Err(
            AppError::BadRequest("Job title and description are required".into()).into(),
        );
    }

    let count = input.question_count.unwrap_or(5).clamp(1, 20);
    let difficulty = input.difficulty.as_deref().unwrap_or("medium");

    let questions = service
        .screening_questions(&input.job_title, &input.job_description, count, difficulty)
        .await?;

    Ok(ApiResponse::success(questions))
}

/// Career features default to the caller; querying someone else requires a
/// management role.
async fn resolve_employee(
    claims: &Claims,
    employees: &EmployeeRepository,
    employee_id: Option<Uuid>,
) -> Result<crate::database::models::Employee, AppError> {
    let target = employee_id.unwrap_or(claims.sub);
    if target != claims.sub && !claims.can_manage_leave() {
        return Err(AppError::Forbidden(
            "Cannot request career data for other employees".into(),
        ));
    }

    employees
        .find_by_id(target)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))
}
