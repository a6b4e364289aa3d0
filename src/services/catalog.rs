//! Catalog management service

use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, SortKey},
        equipment::{CreateEquipment, Equipment, EquipmentDetail, ListingQuery, UpdateEquipment, UpsertDetail},
        filter::EquipmentFilter,
        pagination::{parse_page, PageInfo},
        user::UserClaims,
    },
    repository::Repository,
    slug,
};

/// One page of a listing
#[derive(Debug)]
pub struct ListingPage {
    pub items: Vec<Equipment>,
    pub page: PageInfo,
    /// Order actually applied
    pub sort: SortKey,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// Database round-trip for readiness probes
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    /// Published equipment, optionally searched, sorted and paginated
    pub async fn list_published(&self, query: &ListingQuery) -> AppResult<ListingPage> {
        let filter = EquipmentFilter::published_matching(query.q.as_deref());
        self.list_page(filter, query).await
    }

    /// Drafts only, for staff review
    pub async fn list_drafts(&self, query: &ListingQuery) -> AppResult<ListingPage> {
        let mut filter = EquipmentFilter::Status(EquipmentStatus::Draft);
        if let Some(term) = query.q.as_deref().filter(|t| !t.trim().is_empty()) {
            filter = filter.and(EquipmentFilter::TitleContains(term.to_string()));
        }
        self.list_page(filter, query).await
    }

    /// Published equipment carrying the named tag
    pub async fn list_by_tag(&self, tag_name: &str, query: &ListingQuery) -> AppResult<ListingPage> {
        let tag = self
            .repository
            .tags
            .get_by_name(tag_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag '{}' not found", tag_name)))?;

        let filter = EquipmentFilter::published_matching(query.q.as_deref())
            .and(EquipmentFilter::HasTag(tag.name));
        self.list_page(filter, query).await
    }

    async fn list_page(&self, filter: EquipmentFilter, query: &ListingQuery) -> AppResult<ListingPage> {
        let sort = SortKey::parse(query.sort.as_deref());
        let total = self.repository.equipment.count(&filter).await?;
        let page = PageInfo::new(parse_page(query.page.as_deref()), self.config.page_size, total);
        let items = self.repository.equipment.list(&filter, sort, Some(&page)).await?;
        Ok(ListingPage { items, page, sort })
    }

    /// Detail view. Drafts are only visible to staff.
    pub async fn get(&self, slug: &str, viewer: Option<&UserClaims>) -> AppResult<Equipment> {
        let equipment = self.get_any(slug).await?;
        let is_staff = viewer.map(|c| c.is_staff).unwrap_or(false);
        if equipment.status != EquipmentStatus::Published && !is_staff {
            return Err(not_found(slug));
        }
        Ok(equipment)
    }

    /// Any record by slug, drafts included
    pub async fn get_any(&self, slug: &str) -> AppResult<Equipment> {
        self.repository
            .equipment
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| not_found(slug))
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Create equipment. Without an explicit slug one is derived from the
    /// title and suffixed until the store accepts it.
    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.check_references(data.manufacturer_id, Some(&data.tag_ids)).await?;

        let equipment = &self.repository.equipment;
        let id = match explicit_slug(data.slug.as_deref()) {
            Some(slug) => equipment
                .insert(&data, &slug)
                .await?
                .ok_or_else(|| slug_taken(&slug))?,
            None => {
                let base = slug::slugify(&data.title);
                let data = &data;
                slug::resolve_unique(&base, self.config.max_slug_attempts, |candidate| async move {
                    equipment.insert(data, &candidate).await
                })
                .await?
            }
        };

        let created = equipment.get_by_id(id).await?;
        tracing::info!(id = created.id, slug = %created.slug, status = %created.status, "equipment created");
        Ok(created)
    }

    /// Partial update; a slug is only replaced when given explicitly
    pub async fn update(&self, slug: &str, data: UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let current = self.get_any(slug).await?;
        self.check_references(data.manufacturer_id.flatten(), data.tag_ids.as_deref())
            .await?;

        let new_slug = explicit_slug(data.slug.as_deref());
        if !self
            .repository
            .equipment
            .update(current.id, &data, new_slug.as_deref())
            .await?
        {
            return Err(slug_taken(new_slug.as_deref().unwrap_or(slug)));
        }

        let updated = self.repository.equipment.get_by_id(current.id).await?;
        tracing::info!(id = updated.id, slug = %updated.slug, "equipment updated");
        Ok(updated)
    }

    pub async fn delete(&self, slug: &str) -> AppResult<()> {
        let current = self.get_any(slug).await?;
        self.repository.equipment.delete(current.id).await?;
        tracing::info!(id = current.id, slug = %slug, "equipment deleted");
        Ok(())
    }

    pub async fn set_status(&self, slug: &str, status: EquipmentStatus) -> AppResult<Equipment> {
        let current = self.get_any(slug).await?;
        self.repository.equipment.set_status(current.id, status).await?;
        tracing::info!(id = current.id, slug = %slug, status = %status, "equipment status changed");
        self.repository.equipment.get_by_id(current.id).await
    }

    pub async fn upsert_detail(&self, slug: &str, data: UpsertDetail) -> AppResult<EquipmentDetail> {
        data.validate()?;
        let current = self.get_any(slug).await?;
        self.repository.equipment.upsert_detail(current.id, &data).await
    }

    pub async fn delete_detail(&self, slug: &str) -> AppResult<()> {
        let current = self.get_any(slug).await?;
        self.repository.equipment.delete_detail(current.id).await
    }

    /// Point the equipment image at an already stored media file
    pub async fn attach_image(&self, slug: &str, media_name: &str) -> AppResult<Equipment> {
        let current = self.get_any(slug).await?;
        self.repository.equipment.set_image(current.id, media_name).await?;
        tracing::info!(id = current.id, image = %media_name, "equipment image attached");
        self.repository.equipment.get_by_id(current.id).await
    }

    /// Unknown manufacturer or tag ids are reported per field
    async fn check_references(&self, manufacturer_id: Option<i32>, tag_ids: Option<&[i32]>) -> AppResult<()> {
        let mut errors = ValidationErrors::new();

        if let Some(id) = manufacturer_id {
            if !self.repository.manufacturers.exists(id).await? {
                errors.add(
                    "manufacturer_id",
                    ValidationError::new("unknown_manufacturer")
                        .with_message(format!("Manufacturer {} does not exist", id).into()),
                );
            }
        }

        if let Some(ids) = tag_ids.filter(|ids| !ids.is_empty()) {
            let existing = self.repository.tags.existing_ids(ids).await?;
            let missing: Vec<String> = ids
                .iter()
                .filter(|id| !existing.contains(id))
                .map(|id| id.to_string())
                .collect();
            if !missing.is_empty() {
                errors.add(
                    "tag_ids",
                    ValidationError::new("unknown_tag")
                        .with_message(format!("Unknown tags: {}", missing.join(", ")).into()),
                );
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

fn not_found(slug: &str) -> AppError {
    AppError::NotFound(format!("Equipment '{}' not found", slug))
}

fn slug_taken(slug: &str) -> AppError {
    AppError::field("slug", "slug_taken", format!("Slug '{}' is already in use", slug))
}

/// Normalized client-supplied slug; blank counts as absent
fn explicit_slug(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| slug::truncate(&slug::slugify(s), slug::MAX_SLUG_LEN).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_slug_is_normalized() {
        assert_eq!(explicit_slug(Some(" Кран 25т ")), Some("kran-25t".to_string()));
        assert_eq!(explicit_slug(Some("already-clean")), Some("already-clean".to_string()));
    }

    #[test]
    fn test_explicit_slug_fits_column() {
        let raw = "щ".repeat(200);
        let slug = explicit_slug(Some(&raw)).unwrap();
        assert!(slug.len() <= slug::MAX_SLUG_LEN);
        assert!(slug.starts_with("shch"));
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_blank_slug_counts_as_absent() {
        assert_eq!(explicit_slug(None), None);
        assert_eq!(explicit_slug(Some("   ")), None);
    }

    #[test]
    fn test_slug_taken_is_a_field_error() {
        match slug_taken("kran") {
            AppError::InvalidFields(errors) => {
                assert!(errors.field_errors().contains_key("slug"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
