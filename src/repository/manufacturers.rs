//! Manufacturers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::manufacturer::{CreateManufacturer, Manufacturer},
};

#[derive(Clone)]
pub struct ManufacturersRepository {
    pool: Pool<Postgres>,
}

impl ManufacturersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all manufacturers
    pub async fn list(&self) -> AppResult<Vec<Manufacturer>> {
        let rows = sqlx::query_as::<_, Manufacturer>(
            "SELECT id, name, country FROM manufacturers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Manufacturer>> {
        let row = sqlx::query_as::<_, Manufacturer>("SELECT id, name, country FROM manufacturers WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM manufacturers WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a manufacturer. Returns `None` when the name is already taken.
    pub async fn create(&self, data: &CreateManufacturer) -> AppResult<Option<Manufacturer>> {
        let row = sqlx::query_as::<_, Manufacturer>(
            r#"
            INSERT INTO manufacturers (name, country)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, country
            "#,
        )
        .bind(data.name.trim())
        .bind(data.country.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a manufacturer, detaching (not deleting) its equipment.
    /// Returns the number of equipment records detached.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let detached = sqlx::query(
            "UPDATE equipment SET manufacturer_id = NULL, updated_at = NOW() WHERE manufacturer_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let result = sqlx::query("DELETE FROM manufacturers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Manufacturer {} not found", id)));
        }

        tx.commit().await?;
        Ok(detached)
    }
}
