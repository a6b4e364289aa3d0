//! Tags repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::tag::{Tag, TagWithCount},
};

#[derive(Clone)]
pub struct TagsRepository {
    pool: Pool<Postgres>,
}

impl TagsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all tags by name
    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Tags with equipment counts, most used first
    pub async fn list_with_counts(&self) -> AppResult<Vec<TagWithCount>> {
        let rows = sqlx::query_as::<_, TagWithCount>(
            r#"
            SELECT t.id, t.name, COUNT(et.equipment_id) AS equipment_count
            FROM tags t
            LEFT JOIN equipment_tags et ON et.tag_id = t.id
            GROUP BY t.id, t.name
            ORDER BY equipment_count DESC, t.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    /// The subset of `ids` that exist
    pub async fn existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows: Vec<i32> = sqlx::query_scalar("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create a tag. Returns `None` when the name is already taken.
    pub async fn create(&self, name: &str) -> AppResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO NOTHING RETURNING id, name",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tag)
    }

    /// Delete a tag; equipment only loses the link
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tag {} not found", id)));
        }
        Ok(())
    }
}
