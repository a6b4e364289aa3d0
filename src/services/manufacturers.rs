//! Manufacturer management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::manufacturer::{CreateManufacturer, Manufacturer},
    repository::Repository,
};

#[derive(Clone)]
pub struct ManufacturersService {
    repository: Repository,
}

impl ManufacturersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Manufacturer>> {
        self.repository.manufacturers.list().await
    }

    pub async fn create(&self, data: CreateManufacturer) -> AppResult<Manufacturer> {
        data.validate()?;
        if data.name.trim().is_empty() {
            return Err(AppError::field("name", "blank", "Name cannot be blank"));
        }

        let manufacturer = self
            .repository
            .manufacturers
            .create(&data)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!("Manufacturer '{}' already exists", data.name.trim()))
            })?;
        tracing::info!(id = manufacturer.id, name = %manufacturer.name, "manufacturer created");
        Ok(manufacturer)
    }

    /// Delete a manufacturer; its equipment stays, without a manufacturer
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let detached = self.repository.manufacturers.delete(id).await?;
        tracing::info!(id, detached, "manufacturer deleted");
        Ok(())
    }
}
