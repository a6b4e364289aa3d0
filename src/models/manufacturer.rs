//! Manufacturer model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Equipment manufacturer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Manufacturer {
    pub id: i32,
    pub name: String,
    pub country: String,
}

/// Create manufacturer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateManufacturer {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    #[serde(default)]
    pub country: String,
}
