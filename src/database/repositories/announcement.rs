use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Announcement, AnnouncementFeedItem, AnnouncementPriority, AnnouncementUpdateInput,
};

const ANNOUNCEMENT_COLUMNS: &str = r#"
    id,
    title,
    content,
    priority,
    author_id,
    author_name,
    author_designation,
    audience,
    departments,
    image_url,
    is_active,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, announcement: &Announcement) -> Result<Announcement> {
        let created = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            INSERT INTO
                announcements (
                    id, title, content, priority, author_id, author_name,
                    author_designation, audience, departments, image_url,
                    is_active, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ANNOUNCEMENT_COLUMNS}
            "#
        ))
        .bind(announcement.id)
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.priority)
        .bind(announcement.author_id)
        .bind(&announcement.author_name)
        .bind(&announcement.author_designation)
        .bind(announcement.audience)
        .bind(&announcement.departments)
        .bind(&announcement.image_url)
        .bind(announcement.is_active)
        .bind(announcement.created_at)
        .bind(announcement.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(announcement)
    }

    pub async fn list(
        &self,
        priority: Option<AnnouncementPriority>,
        is_active: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Announcement>> {
        let mut query = format!("SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements");

        let mut conditions = vec![];
        if priority.is_some() {
            conditions.push(format!("priority = ${}", conditions.len() + 1));
        }
        if is_active.is_some() {
            conditions.push(format!("is_active = ${}", conditions.len() + 1));
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            conditions.len() + 1,
            conditions.len() + 2
        ));

        let mut prepared = sqlx::query_as::<_, Announcement>(&query);
        if let Some(p) = priority {
            prepared = prepared.bind(p);
        }
        if let Some(active) = is_active {
            prepared = prepared.bind(active);
        }
        prepared = prepared.bind(limit).bind(offset);

        let announcements = prepared.fetch_all(&self.pool).await?;

        Ok(announcements)
    }

    pub async fn count(
        &self,
        priority: Option<AnnouncementPriority>,
        is_active: Option<bool>,
    ) -> Result<i64> {
        let mut query = "SELECT COUNT(*) FROM announcements".to_string();

        let mut conditions = vec![];
        if priority.is_some() {
            conditions.push(format!("priority = ${}", conditions.len() + 1));
        }
        if is_active.is_some() {
            conditions.push(format!("is_active = ${}", conditions.len() + 1));
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        let mut prepared = sqlx::query_scalar::<_, i64>(&query);
        if let Some(p) = priority {
            prepared = prepared.bind(p);
        }
        if let Some(active) = is_active {
            prepared = prepared.bind(active);
        }

        let total = prepared.fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: AnnouncementUpdateInput,
    ) -> Result<Option<Announcement>> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            UPDATE announcements
            SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                priority = COALESCE($3, priority),
                is_active = COALESCE($4, is_active),
                audience = COALESCE($5, audience),
                departments = COALESCE($6, departments),
                image_url = COALESCE($7, image_url),
                updated_at = $8
            WHERE
                id = $9
            RETURNING {ANNOUNCEMENT_COLUMNS}
            "#
        ))
        .bind(input.title)
        .bind(input.content)
        .bind(input.priority)
        .bind(input.is_active)
        .bind(input.audience)
        .bind(input.departments)
        .bind(input.image_url)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(announcement)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Active announcements visible to one employee, flagged `is_new` until
    /// that employee has marked them read.
    pub async fn feed(
        &self,
        employee_id: Uuid,
        department: Option<&str>,
        limit: i64,
    ) -> Result<Vec<AnnouncementFeedItem>> {
        let items = sqlx::query_as::<_, AnnouncementFeedItem>(
            r#"
            SELECT
                a.id,
                a.title,
                a.content,
                a.priority,
                a.author_name,
                a.author_designation,
                a.image_url,
                a.created_at,
                (ar.id IS NULL) AS is_new
            FROM
                announcements a
                LEFT JOIN announcement_reads ar
                    ON ar.announcement_id = a.id AND ar.employee_id = $1
            WHERE
                a.is_active = TRUE
                AND (a.audience = 'all' OR $2 = ANY (a.departments))
            ORDER BY
                a.created_at DESC
            LIMIT $3
            "#,
        )
        .bind(employee_id)
        .bind(department)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Idempotent: re-reading an announcement is a no-op.
    pub async fn mark_read(&self, announcement_id: Uuid, employee_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO
                announcement_reads (id, announcement_id, employee_id, read_at)
            VALUES
                ($1, $2, $3, $4)
            ON CONFLICT (announcement_id, employee_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(announcement_id)
        .bind(employee_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
