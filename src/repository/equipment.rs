//! Equipment repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres, QueryBuilder, Transaction};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::{
        enums::{EquipmentStatus, SortKey},
        equipment::{CreateEquipment, Equipment, EquipmentDetail, EquipmentRow, UpdateEquipment, UpsertDetail},
        filter::EquipmentFilter,
        pagination::PageInfo,
        tag::Tag,
    },
};

/// Name of the unique constraint on `equipment.slug`
pub const SLUG_CONSTRAINT: &str = "equipment_slug_key";

const EQUIPMENT_SELECT: &str = r#"
    SELECT e.id, e.title, e.slug, e.description, e.price_per_hour, e.status, e.image,
           e.manufacturer_id, m.name AS manufacturer_name, m.country AS manufacturer_country,
           e.created_at, e.updated_at
    FROM equipment e
    LEFT JOIN manufacturers m ON m.id = e.manufacturer_id
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Count records matching a filter
    pub async fn count(&self, filter: &EquipmentFilter) -> AppResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM equipment e WHERE ");
        filter.push_sql(&mut qb);
        let total: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    /// List records matching a filter, with manufacturer and tags resolved.
    /// Without a page every matching record is returned.
    pub async fn list(
        &self,
        filter: &EquipmentFilter,
        sort: SortKey,
        page: Option<&PageInfo>,
    ) -> AppResult<Vec<Equipment>> {
        let mut qb = QueryBuilder::<Postgres>::new(EQUIPMENT_SELECT);
        qb.push(" WHERE ");
        filter.push_sql(&mut qb);
        qb.push(" ORDER BY ").push(sort.order_by_sql());
        if let Some(page) = page {
            qb.push(" LIMIT ")
                .push_bind(page.limit())
                .push(" OFFSET ")
                .push_bind(page.offset());
        }

        let rows: Vec<EquipmentRow> = qb.build_query_as::<EquipmentRow>().fetch_all(&self.pool).await?;
        self.attach_tags(rows).await
    }

    /// Get equipment by slug with tags and detail
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Option<Equipment>> {
        let mut qb = QueryBuilder::<Postgres>::new(EQUIPMENT_SELECT);
        qb.push(" WHERE e.slug = ").push_bind(slug.to_string());
        let row: Option<EquipmentRow> = qb.build_query_as::<EquipmentRow>().fetch_optional(&self.pool).await?;
        self.complete(row).await
    }

    /// Get equipment by ID with tags and detail
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        let mut qb = QueryBuilder::<Postgres>::new(EQUIPMENT_SELECT);
        qb.push(" WHERE e.id = ").push_bind(id);
        let row: Option<EquipmentRow> = qb.build_query_as::<EquipmentRow>().fetch_optional(&self.pool).await?;
        self.complete(row)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    pub async fn get_detail(&self, equipment_id: i32) -> AppResult<Option<EquipmentDetail>> {
        let detail = sqlx::query_as::<_, EquipmentDetail>(
            "SELECT equipment_id, engine, transmission, mileage FROM equipment_details WHERE equipment_id = $1",
        )
        .bind(equipment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(detail)
    }

    async fn complete(&self, row: Option<EquipmentRow>) -> AppResult<Option<Equipment>> {
        let Some(row) = row else {
            return Ok(None);
        };
        let id = row.id;
        let mut equipment = self
            .attach_tags(vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Equipment row vanished while loading tags".to_string()))?;
        equipment.detail = self.get_detail(id).await?;
        Ok(Some(equipment))
    }

    /// Resolve tags for a batch of rows with a single query
    async fn attach_tags(&self, rows: Vec<EquipmentRow>) -> AppResult<Vec<Equipment>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, (i32, i32, String)>(
            r#"
            SELECT et.equipment_id, t.id, t.name
            FROM equipment_tags et
            JOIN tags t ON t.id = et.tag_id
            WHERE et.equipment_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_equipment: HashMap<i32, Vec<Tag>> = HashMap::new();
        for (equipment_id, id, name) in links {
            by_equipment.entry(equipment_id).or_default().push(Tag { id, name });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = by_equipment.remove(&row.id).unwrap_or_default();
                row.into_equipment(tags)
            })
            .collect())
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a record under `slug`. Returns `None` when the slug is already taken.
    pub async fn insert(&self, data: &CreateEquipment, slug: &str) -> AppResult<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO equipment (title, slug, description, price_per_hour, status, manufacturer_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(slug)
        .bind(&data.description)
        .bind(data.price_per_hour)
        .bind(data.status)
        .bind(data.manufacturer_id)
        .fetch_one(&mut *tx)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Self::replace_tags(&mut tx, id, &data.tag_ids).await?;
        tx.commit().await?;
        Ok(Some(id))
    }

    /// Apply changes to a record. With `slug` set, the slug is replaced too;
    /// returns `false` when that slug is already taken.
    pub async fn update(&self, id: i32, data: &UpdateEquipment, slug: Option<&str>) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let (set_manufacturer, manufacturer_id) = match data.manufacturer_id {
            Some(value) => (true, value),
            None => (false, None),
        };

        let updated = sqlx::query(
            r#"
            UPDATE equipment SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                price_per_hour = COALESCE($5, price_per_hour),
                status = COALESCE($6, status),
                manufacturer_id = CASE WHEN $7 THEN $8 ELSE manufacturer_id END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(slug)
        .bind(&data.description)
        .bind(data.price_per_hour)
        .bind(data.status)
        .bind(set_manufacturer)
        .bind(manufacturer_id)
        .execute(&mut *tx)
        .await;

        let result = match updated {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }

        if let Some(ref tag_ids) = data.tag_ids {
            Self::replace_tags(&mut tx, id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn replace_tags(tx: &mut Transaction<'_, Postgres>, equipment_id: i32, tag_ids: &[i32]) -> AppResult<()> {
        sqlx::query("DELETE FROM equipment_tags WHERE equipment_id = $1")
            .bind(equipment_id)
            .execute(&mut **tx)
            .await?;

        if !tag_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO equipment_tags (equipment_id, tag_id)
                SELECT $1, UNNEST($2::int[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(equipment_id)
            .bind(tag_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn set_status(&self, id: i32, status: EquipmentStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE equipment SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    pub async fn set_image(&self, id: i32, image: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE equipment SET image = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(image)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Delete equipment; its detail and tag links go with it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Create or replace the detail record of an equipment
    pub async fn upsert_detail(&self, equipment_id: i32, data: &UpsertDetail) -> AppResult<EquipmentDetail> {
        let detail = sqlx::query_as::<_, EquipmentDetail>(
            r#"
            INSERT INTO equipment_details (equipment_id, engine, transmission, mileage)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (equipment_id) DO UPDATE
                SET engine = EXCLUDED.engine,
                    transmission = EXCLUDED.transmission,
                    mileage = EXCLUDED.mileage
            RETURNING equipment_id, engine, transmission, mileage
            "#,
        )
        .bind(equipment_id)
        .bind(&data.engine)
        .bind(&data.transmission)
        .bind(data.mileage)
        .fetch_one(&self.pool)
        .await?;
        Ok(detail)
    }

    pub async fn delete_detail(&self, equipment_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment_details WHERE equipment_id = $1")
            .bind(equipment_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Equipment {} has no details",
                equipment_id
            )));
        }
        Ok(())
    }
}
