//! Tag model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Free-form equipment tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Tag with the number of equipment records carrying it
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TagWithCount {
    pub id: i32,
    pub name: String,
    pub equipment_count: i64,
}

/// Create tag request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTag {
    #[validate(length(min = 1, max = 100, message = "Tag name must be 1-100 characters"))]
    pub name: String,
}
