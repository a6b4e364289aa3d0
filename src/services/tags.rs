//! Tag management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::tag::{CreateTag, Tag, TagWithCount},
    repository::Repository,
};

#[derive(Clone)]
pub struct TagsService {
    repository: Repository,
}

impl TagsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All tags with their usage, most used first
    pub async fn list(&self) -> AppResult<Vec<TagWithCount>> {
        self.repository.tags.list_with_counts().await
    }

    pub async fn create(&self, data: CreateTag) -> AppResult<Tag> {
        data.validate()?;
        let name = data.name.trim();
        if name.is_empty() {
            return Err(AppError::field("name", "blank", "Tag name cannot be blank"));
        }

        let tag = self
            .repository
            .tags
            .create(name)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("Tag '{}' already exists", name)))?;
        tracing::info!(id = tag.id, name = %tag.name, "tag created");
        Ok(tag)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.tags.delete(id).await?;
        tracing::info!(id, "tag deleted");
        Ok(())
    }
}
