//! Business logic services

pub mod analytics;
pub mod catalog;
pub mod manufacturers;
pub mod media;
pub mod tags;
pub mod users;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub analytics: analytics::AnalyticsService,
    pub tags: tags::TagsService,
    pub manufacturers: manufacturers::ManufacturersService,
    pub users: users::UsersService,
    pub media: media::MediaService,
}

impl Services {
    /// Create all services with the given repository and media backend
    pub fn new(repository: Repository, config: &AppConfig, storage: Arc<dyn media::MediaStorage>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), config.catalog.clone()),
            analytics: analytics::AnalyticsService::new(repository.clone(), config.analytics.clone()),
            tags: tags::TagsService::new(repository.clone()),
            manufacturers: manufacturers::ManufacturersService::new(repository.clone()),
            users: users::UsersService::new(repository, config.auth.clone()),
            media: media::MediaService::new(storage, &config.media),
        }
    }
}
