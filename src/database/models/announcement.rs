use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub priority: AnnouncementPriority,
    pub author_id: Option<Uuid>,
    pub author_name: String,
    pub author_designation: String,
    pub audience: AnnouncementAudience,
    pub departments: Vec<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    pub enum AnnouncementPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    pub enum AnnouncementAudience {
        All => "all",
        Departments => "departments",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
    pub priority: Option<AnnouncementPriority>,
    pub audience: Option<AnnouncementAudience>,
    pub departments: Option<Vec<String>>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementUpdateInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<AnnouncementPriority>,
    pub is_active: Option<bool>,
    pub audience: Option<AnnouncementAudience>,
    pub departments: Option<Vec<String>>,
    pub image_url: Option<String>,
}

/// Feed row for the employee portal: announcement plus the reader's state.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementFeedItem {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub priority: AnnouncementPriority,
    pub author_name: String,
    pub author_designation: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_new: bool,
}
