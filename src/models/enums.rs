//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Publication state of an equipment listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum EquipmentStatus {
    Draft = 0,
    Published = 1,
}

impl Default for EquipmentStatus {
    fn default() -> Self {
        EquipmentStatus::Draft
    }
}

impl From<i16> for EquipmentStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => EquipmentStatus::Published,
            _ => EquipmentStatus::Draft,
        }
    }
}

impl From<EquipmentStatus> for i16 {
    fn from(s: EquipmentStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EquipmentStatus::Draft => "draft",
            EquipmentStatus::Published => "published",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// Listing order selected by the `sort` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortKey {
    #[serde(rename = "price")]
    PriceAsc,
    #[serde(rename = "-price")]
    PriceDesc,
    #[serde(rename = "new")]
    Newest,
    #[serde(rename = "old")]
    Oldest,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Newest
    }
}

impl SortKey {
    /// Parse the raw query value; anything unrecognized means the default order.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price") => SortKey::PriceAsc,
            Some("-price") => SortKey::PriceDesc,
            Some("old") => SortKey::Oldest,
            _ => SortKey::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price",
            SortKey::PriceDesc => "-price",
            SortKey::Newest => "new",
            SortKey::Oldest => "old",
        }
    }

    /// ORDER BY clause over the `e` (equipment) alias, with `id` as tie breaker
    pub fn order_by_sql(&self) -> &'static str {
        match self {
            SortKey::PriceAsc => "e.price_per_hour ASC, e.id ASC",
            SortKey::PriceDesc => "e.price_per_hour DESC, e.id DESC",
            SortKey::Newest => "e.created_at DESC, e.id DESC",
            SortKey::Oldest => "e.created_at ASC, e.id ASC",
        }
    }
}
