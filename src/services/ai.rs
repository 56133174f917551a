use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::Config;
use crate::database::models::Employee;
use crate::error::AppError;

const CAREER_CACHE_CAPACITY: u64 = 1_000;
const CHAT_HISTORY_LIMIT: usize = 10;

/// Thin client over an OpenAI-compatible chat-completions API. Every feature
/// degrades gracefully when no API key is configured: career paths fall back
/// to a deterministic stub, the rest answer 503.
#[derive(Clone)]
pub struct AiService {
    client: reqwest::Client,
    config: Config,
    career_cache: Cache<String, Vec<String>>,
    roadmap_cache: Cache<String, Roadmap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub role: String,
    pub tiers: Vec<RoadmapTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapTier {
    pub title: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPathResponse {
    pub options: Vec<String>,
    pub source: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub context: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub expected_answer: String,
    pub difficulty: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AiService {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            career_cache: Cache::new(CAREER_CACHE_CAPACITY),
            roadmap_cache: Cache::new(CAREER_CACHE_CAPACITY),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.config.openai_api_key.as_deref()
    }

    /// Send a chat completion and return the first choice's text.
    async fn complete(
        &self,
        messages: Vec<Value>,
        temperature: f64,
        max_tokens: Option<u32>,
    ) -> Result<String, AppError> {
        let api_key = self
            .api_key()
            .ok_or_else(|| AppError::ServiceUnavailable("AI service not configured".into()))?;

        let mut body = json!({
            "model": self.config.openai_model,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(max_tokens) = max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let url = format!("{}/chat/completions", self.config.openai_base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Chat completion request failed: {}", e);
                AppError::ServiceUnavailable("AI service temporarily unavailable".into())
            })?;

        if !response.status().is_success() {
            log::error!("Chat completion returned status {}", response.status());
            return Err(AppError::ServiceUnavailable(
                "AI service temporarily unavailable".into(),
            ));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            log::error!("Chat completion body unreadable: {}", e);
            AppError::ServiceUnavailable("AI service temporarily unavailable".into())
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::internal_server_error_message("model returned an empty completion")
            })
    }

    /// Three suggested next roles, closest first. Cached per employee by a
    /// signature of their skill set so re-asking with unchanged skills never
    /// re-queries the model.
    pub async fn career_paths(
        &self,
        employee: &Employee,
    ) -> Result<CareerPathResponse, AppError> {
        let signature = skills_signature(employee);

        if let Some(options) = self.career_cache.get(&signature).await {
            return Ok(CareerPathResponse {
                options,
                source: "cache",
            });
        }

        let designation = employee
            .designation
            .clone()
            .unwrap_or_else(|| "Engineer".to_string());

        if self.api_key().is_none() {
            let stub = vec![
                format!("Senior {}", designation),
                format!("Lead {}", designation),
                format!("Principal {}", designation),
            ];
            self.career_cache.insert(signature, stub.clone()).await;
            return Ok(CareerPathResponse {
                options: stub,
                source: "stub",
            });
        }

        let years = employee.years_of_service(chrono::Utc::now().date_naive());
        let prompt = format!(
            "You are a career coach AI.\n\
             Employee role: {}.\n\
             Years of experience: {}.\n\
             Current skills: {}.\n\
             Suggest three logical next career roles, from closest to most ambitious.\n\
             Return ONLY a JSON array of strings.",
            designation,
            years,
            employee.skills.join(", ")
        );

        let raw = self
            .complete(vec![json!({"role": "user", "content": prompt})], 0.7, None)
            .await?;
        let options: Vec<String> = parse_model_json(&raw)?;

        self.career_cache.insert(signature, options.clone()).await;

        Ok(CareerPathResponse {
            options,
            source: "openai",
        })
    }

    /// Four-tier roadmap towards `role` (or the employee's closest suggested
    /// role when not given). Requires a configured API key.
    pub async fn roadmap(
        &self,
        employee: &Employee,
        explicit_role: Option<String>,
    ) -> Result<Roadmap, AppError> {
        let role = match explicit_role.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
            Some(role) => role,
            None => self
                .career_paths(employee)
                .await?
                .options
                .into_iter()
                .next()
                .ok_or_else(|| {
                    AppError::internal_server_error_message("no career path available")
                })?,
        };

        let cache_key = format!("{}:{}", employee.id, role.to_lowercase());
        if let Some(roadmap) = self.roadmap_cache.get(&cache_key).await {
            return Ok(roadmap);
        }

        if self.api_key().is_none() {
            return Err(AppError::ServiceUnavailable(
                "AI key missing - cannot generate roadmap".into(),
            ));
        }

        let years = employee.years_of_service(chrono::Utc::now().date_naive());
        let prompt = format!(
            "You are an AI career-coach writing content for a web card.\n\n\
             Context\n\
             - Target next role: \"{role}\"\n\
             - Employee experience: {years} years\n\
             - Current skills: {skills}\n\n\
             Task\n\
             Create a concise 4-tier technical roadmap to reach \"{role}\".\n\
             Tiers (in order): Foundation, Growth, Specialisation, Leadership.\n\n\
             Output (JSON only):\n\
             {{\"role\":\"{role}\",\"tiers\":[{{\"title\":\"Foundation\",\"bullets\":[\"<one actionable technical step>\"]}},\
             {{\"title\":\"Growth\",\"bullets\":[\"<one actionable technical step>\"]}},\
             {{\"title\":\"Specialisation\",\"bullets\":[\"<one actionable technical step>\"]}},\
             {{\"title\":\"Leadership\",\"bullets\":[\"<one actionable technical step>\"]}}]}}\n\n\
             Rules\n\
             - Exactly one bullet per tier (<= 12 words).\n\
             - No markdown fences, no extra keys.",
            role = role,
            years = years,
            skills = employee.skills.join(", ")
        );

        let raw = self
            .complete(vec![json!({"role": "user", "content": prompt})], 0.7, None)
            .await?;
        let roadmap: Roadmap = parse_model_json(&raw)?;

        if roadmap.tiers.len() != 4 {
            return Err(AppError::internal_server_error_message(
                "model returned an invalid roadmap",
            ));
        }

        self.roadmap_cache.insert(cache_key, roadmap.clone()).await;

        Ok(roadmap)
    }

    /// HR assistant chat. History beyond the last 10 turns is dropped to
    /// bound token usage.
    pub async fn chat(
        &self,
        message: &str,
        context: &str,
        history: &[ChatTurn],
    ) -> Result<ChatReply, AppError> {
        let system_prompt = match context {
            "hr" => {
                "You are a helpful HR assistant. Provide professional, accurate, and helpful \
                 responses about HR-related topics including employee policies, benefits, leave \
                 management, performance reviews, and general workplace questions. Keep responses \
                 concise and actionable."
            }
            "technical" => {
                "You are a technical assistant specializing in HR technology, systems, and \
                 processes."
            }
            _ => {
                "You are a helpful AI assistant. Provide accurate, helpful, and professional \
                 responses to user queries."
            }
        };

        let mut messages = vec![json!({"role": "system", "content": system_prompt})];
        let recent = history.len().saturating_sub(CHAT_HISTORY_LIMIT);
        for turn in &history[recent..] {
            messages.push(json!({"role": turn.role, "content": turn.content}));
        }
        messages.push(json!({"role": "user", "content": message}));

        let response = self.complete(messages, 0.7, Some(500)).await?;

        Ok(ChatReply {
            response,
            context: context.to_string(),
        })
    }

    pub async fn screening_questions(
        &self,
        job_title: &str,
        job_description: &str,
        count: u8,
        difficulty: &str,
    ) -> Result<Vec<ScreeningQuestion>, AppError> {
        let prompt = format!(
            "Generate {count} {difficulty} level screening questions for a {job_title} position.\n\n\
             Job Description: {job_description}\n\n\
             Please provide questions that assess:\n\
             1. Technical skills relevant to the role\n\
             2. Problem-solving abilities\n\
             3. Experience with relevant technologies/methodologies\n\
             4. Soft skills and cultural fit\n\n\
             Format the response as a JSON array of objects with the following structure:\n\
             {{\"question\": \"The actual question\", \"type\": \"technical|behavioral|situational\", \
             \"expectedAnswer\": \"Brief description of what constitutes a good answer\", \
             \"difficulty\": \"easy|medium|hard\"}}"
        );

        let messages = vec![
            json!({
                "role": "system",
                "content": "You are an expert HR recruiter and interviewer. Generate relevant, unbiased screening questions."
            }),
            json!({"role": "user", "content": prompt}),
        ];

        let raw = self.complete(messages, 0.7, None).await?;
        parse_model_json(&raw)
    }
}

/// Cache key covering everything the career prompt depends on.
fn skills_signature(employee: &Employee) -> String {
    let mut skills = employee.skills.clone();
    skills.sort();
    format!("{}:{}", employee.id, skills.join("|"))
}

/// Models wrap JSON in markdown fences often enough that stripping them
/// before parsing is mandatory.
fn parse_model_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(cleaned).map_err(|e| {
        log::error!("Model returned unparseable JSON: {} ({})", e, raw);
        AppError::internal_server_error_message("model returned invalid JSON")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_model_json_strips_fences() {
        let raw = "```json\n[\"Senior Engineer\", \"Staff Engineer\"]\n```";
        let options: Vec<String> = parse_model_json(raw).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0], "Senior Engineer");
    }

    #[test]
    fn parse_model_json_accepts_bare_json() {
        let roadmap: Roadmap = parse_model_json(
            r#"{"role":"Lead","tiers":[{"title":"Foundation","bullets":["x"]}]}"#,
        )
        .unwrap();
        assert_eq!(roadmap.role, "Lead");
        assert_eq!(roadmap.tiers.len(), 1);
    }

    #[test]
    fn skills_signature_is_order_insensitive() {
        let mut a = Employee::new("A".into(), "a@x.com".into(), None);
        a.skills = vec!["rust".into(), "sql".into()];
        let sig_one = skills_signature(&a);
        a.skills = vec!["sql".into(), "rust".into()];
        assert_eq!(sig_one, skills_signature(&a));
    }
}
