//! Analytics summary payload

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Equipment with its derived price including the service fee
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PricedEquipment {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub price_per_hour: Decimal,
    /// `price_per_hour * markup`, two fractional digits
    pub price_with_fee: Decimal,
}

/// Global aggregates over every stored record
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PriceTotals {
    pub count: i64,
    /// Two fractional digits, absent when there is no equipment
    pub avg_price: Option<Decimal>,
    pub sum_price: Decimal,
}

/// Number of equipment records attached to a manufacturer or tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GroupCount {
    pub id: i32,
    pub name: String,
    pub count: i64,
}

/// Parameters the summary was computed with
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsCriteria {
    pub price_threshold: Decimal,
    pub title_keyword: String,
    pub markup: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsSummary {
    pub criteria: AnalyticsCriteria,
    /// Priced above the threshold or titled with the keyword
    pub highlighted: Vec<PricedEquipment>,
    pub priced: Vec<PricedEquipment>,
    pub totals: PriceTotals,
    /// Sorted by count descending, then name
    pub by_manufacturer: Vec<GroupCount>,
    /// Sorted by count descending, then name
    pub by_tag: Vec<GroupCount>,
}
