//! Repository layer for database operations

pub mod equipment;
pub mod manufacturers;
pub mod tags;
pub mod users;

use sqlx::{Pool, Postgres};

/// Row counts of the catalog tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub equipment: i64,
    pub details: i64,
    pub tags: i64,
    pub manufacturers: i64,
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub equipment: equipment::EquipmentRepository,
    pub manufacturers: manufacturers::ManufacturersRepository,
    pub tags: tags::TagsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            manufacturers: manufacturers::ManufacturersRepository::new(pool.clone()),
            tags: tags::TagsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Delete every equipment record, tag and manufacturer. Users are kept.
    pub async fn clear_catalog(&self) -> crate::error::AppResult<CatalogCounts> {
        let mut tx = self.pool.begin().await?;

        let (equipment, details, tags, manufacturers): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM equipment),
                   (SELECT COUNT(*) FROM equipment_details),
                   (SELECT COUNT(*) FROM tags),
                   (SELECT COUNT(*) FROM manufacturers)
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // Details and tag links cascade
        sqlx::query("DELETE FROM equipment").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM tags").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM manufacturers").execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(CatalogCounts {
            equipment,
            details,
            tags,
            manufacturers,
        })
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
