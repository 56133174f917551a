use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub asset_tag: String,
    pub category: String,
    pub assigned_to: Option<String>,
    pub department: Option<String>,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    pub name: String,
    pub asset_tag: String,
    pub category: String,
    pub assigned_to: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
}
