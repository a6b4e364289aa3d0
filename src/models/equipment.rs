//! Equipment model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{enums::EquipmentStatus, manufacturer::Manufacturer, tag::Tag};

/// Lowest hourly price accepted from forms
pub const MIN_PRICE_PER_HOUR: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
/// Highest hourly price accepted from forms
pub const MAX_PRICE_PER_HOUR: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);

/// Equipment row joined with its manufacturer
#[derive(Debug, Clone, FromRow)]
pub struct EquipmentRow {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price_per_hour: Decimal,
    pub status: EquipmentStatus,
    pub image: Option<String>,
    pub manufacturer_id: Option<i32>,
    pub manufacturer_name: Option<String>,
    pub manufacturer_country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EquipmentRow {
    pub fn into_equipment(self, tags: Vec<Tag>) -> Equipment {
        let manufacturer = match (self.manufacturer_id, self.manufacturer_name) {
            (Some(id), Some(name)) => Some(Manufacturer {
                id,
                name,
                country: self.manufacturer_country.unwrap_or_default(),
            }),
            _ => None,
        };

        Equipment {
            id: self.id,
            title: self.title,
            slug: self.slug,
            description: self.description,
            price_per_hour: self.price_per_hour,
            status: self.status,
            image: self.image,
            manufacturer,
            tags,
            detail: None,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Equipment record with its relations resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub title: String,
    /// URL identifier, unique across drafts and published records
    pub slug: String,
    pub description: String,
    /// Hourly rental price, two fractional digits
    pub price_per_hour: Decimal,
    pub status: EquipmentStatus,
    /// Attached image, relative to the media root (served under `/media`)
    pub image: Option<String>,
    pub manufacturer: Option<Manufacturer>,
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<EquipmentDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Technical characteristics, at most one per equipment
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EquipmentDetail {
    pub equipment_id: i32,
    /// Engine type (diesel, gas, electric...)
    pub engine: String,
    /// Transmission type (automatic, manual...)
    pub transmission: String,
    /// Operating hours / mileage
    pub mileage: Option<i32>,
}

/// Create or replace equipment details
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertDetail {
    #[validate(length(min = 1, max = 100, message = "Engine type must be 1-100 characters"))]
    pub engine: String,
    #[validate(length(min = 1, max = 100, message = "Transmission type must be 1-100 characters"))]
    pub transmission: String,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage: Option<i32>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "validate_title_capitalized")
    )]
    pub title: String,
    /// Generated from the title when omitted
    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_reasonable_price"))]
    pub price_per_hour: Decimal,
    #[serde(default)]
    pub status: EquipmentStatus,
    pub manufacturer_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

/// Update equipment request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "validate_title_capitalized")
    )]
    pub title: Option<String>,
    /// Only changed when given explicitly
    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_reasonable_price"))]
    pub price_per_hour: Option<Decimal>,
    pub status: Option<EquipmentStatus>,
    /// `null` detaches the manufacturer, absent leaves it unchanged
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>, nullable)]
    pub manufacturer_id: Option<Option<i32>>,
    /// Replaces the whole tag set when present
    pub tag_ids: Option<Vec<i32>>,
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListingQuery {
    /// Case-insensitive search in titles
    pub q: Option<String>,
    /// price | -price | new | old (default new)
    pub sort: Option<String>,
    /// 1-based page, clamped to the available range
    pub page: Option<String>,
}

/// Title must start with an upper-case letter
pub fn validate_title_capitalized(value: &str) -> Result<(), ValidationError> {
    match value.chars().next() {
        Some(first) if !first.is_uppercase() => Err(ValidationError::new("not_capitalized")
            .with_message("Title must start with a capital letter".into())),
        _ => Ok(()),
    }
}

/// Hourly price within the accepted range, at most two fractional digits
pub fn validate_reasonable_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > 2 {
        return Err(ValidationError::new("too_precise")
            .with_message("Price must have at most two decimal places".into()));
    }
    if *value < MIN_PRICE_PER_HOUR {
        return Err(ValidationError::new("too_cheap")
            .with_message("Hourly price cannot be lower than 100".into()));
    }
    if *value > MAX_PRICE_PER_HOUR {
        return Err(ValidationError::new("too_expensive")
            .with_message("Hourly price cannot be higher than 50 000".into()));
    }
    Ok(())
}
