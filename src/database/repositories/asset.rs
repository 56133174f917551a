use anyhow::Result;
use sqlx::PgPool;

use crate::database::models::Asset;

const ASSET_COLUMNS: &str = r#"
    id,
    name,
    asset_tag,
    category,
    assigned_to,
    department,
    status,
    image_url,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn tag_exists(&self, asset_tag: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE asset_tag = $1")
            .bind(asset_tag)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn create(&self, asset: &Asset) -> Result<Asset> {
        let created = sqlx::query_as::<_, Asset>(&format!(
            r#"
            INSERT INTO
                assets (
                    id, name, asset_tag, category, assigned_to, department,
                    status, image_url, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(asset.id)
        .bind(&asset.name)
        .bind(&asset.asset_tag)
        .bind(&asset.category)
        .bind(&asset.assigned_to)
        .bind(&asset.department)
        .bind(&asset.status)
        .bind(&asset.image_url)
        .bind(asset.created_at)
        .bind(asset.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Asset>> {
        let assets = sqlx::query_as::<_, Asset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }
}
