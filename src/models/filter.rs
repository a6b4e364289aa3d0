//! Typed equipment filters.
//!
//! A filter is a tree of named predicates. The same tree renders to a SQL
//! condition over the `e` (equipment) alias and evaluates against loaded
//! records, so listing queries and in-memory aggregation agree.

use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

use super::{enums::EquipmentStatus, equipment::Equipment};

#[derive(Debug, Clone, PartialEq)]
pub enum EquipmentFilter {
    /// Matches every record
    All,
    Status(EquipmentStatus),
    /// Case-insensitive substring of the title
    TitleContains(String),
    /// Strictly greater hourly price
    PriceAbove(Decimal),
    /// Carries a tag with exactly this name
    HasTag(String),
    ManufacturedBy(i32),
    And(Vec<EquipmentFilter>),
    Or(Vec<EquipmentFilter>),
}

impl EquipmentFilter {
    /// Conjunction, flattening nested `And`s and dropping `All`
    pub fn and(self, other: EquipmentFilter) -> EquipmentFilter {
        match (self, other) {
            (EquipmentFilter::All, f) | (f, EquipmentFilter::All) => f,
            (EquipmentFilter::And(mut a), EquipmentFilter::And(b)) => {
                a.extend(b);
                EquipmentFilter::And(a)
            }
            (EquipmentFilter::And(mut a), f) => {
                a.push(f);
                EquipmentFilter::And(a)
            }
            (f, EquipmentFilter::And(mut b)) => {
                b.insert(0, f);
                EquipmentFilter::And(b)
            }
            (a, b) => EquipmentFilter::And(vec![a, b]),
        }
    }

    /// Disjunction, flattening nested `Or`s
    pub fn or(self, other: EquipmentFilter) -> EquipmentFilter {
        match (self, other) {
            (EquipmentFilter::Or(mut a), EquipmentFilter::Or(b)) => {
                a.extend(b);
                EquipmentFilter::Or(a)
            }
            (EquipmentFilter::Or(mut a), f) => {
                a.push(f);
                EquipmentFilter::Or(a)
            }
            (f, EquipmentFilter::Or(mut b)) => {
                b.insert(0, f);
                EquipmentFilter::Or(b)
            }
            (a, b) => EquipmentFilter::Or(vec![a, b]),
        }
    }

    /// Public listing filter: published, optionally narrowed by a title search.
    /// The term is matched as given; a blank one means no search.
    pub fn published_matching(search: Option<&str>) -> EquipmentFilter {
        let filter = EquipmentFilter::Status(EquipmentStatus::Published);
        match search.filter(|s| !s.trim().is_empty()) {
            Some(term) => filter.and(EquipmentFilter::TitleContains(term.to_string())),
            None => filter,
        }
    }

    pub fn matches(&self, equipment: &Equipment) -> bool {
        match self {
            EquipmentFilter::All => true,
            EquipmentFilter::Status(status) => equipment.status == *status,
            EquipmentFilter::TitleContains(term) => equipment
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            EquipmentFilter::PriceAbove(threshold) => equipment.price_per_hour > *threshold,
            EquipmentFilter::HasTag(name) => equipment.tags.iter().any(|t| &t.name == name),
            EquipmentFilter::ManufacturedBy(id) => {
                equipment.manufacturer.as_ref().map(|m| m.id) == Some(*id)
            }
            EquipmentFilter::And(filters) => filters.iter().all(|f| f.matches(equipment)),
            EquipmentFilter::Or(filters) => filters.iter().any(|f| f.matches(equipment)),
        }
    }

    /// Append this filter as a parenthesized SQL condition with bound parameters
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            EquipmentFilter::All => {
                qb.push("TRUE");
            }
            EquipmentFilter::Status(status) => {
                qb.push("e.status = ").push_bind(*status);
            }
            EquipmentFilter::TitleContains(term) => {
                qb.push("e.title ILIKE ")
                    .push_bind(format!("%{}%", escape_like(term)));
            }
            EquipmentFilter::PriceAbove(threshold) => {
                qb.push("e.price_per_hour > ").push_bind(*threshold);
            }
            EquipmentFilter::HasTag(name) => {
                qb.push(
                    "EXISTS (SELECT 1 FROM equipment_tags et JOIN tags t ON t.id = et.tag_id \
                     WHERE et.equipment_id = e.id AND t.name = ",
                )
                .push_bind(name.clone())
                .push(")");
            }
            EquipmentFilter::ManufacturedBy(id) => {
                qb.push("e.manufacturer_id = ").push_bind(*id);
            }
            EquipmentFilter::And(filters) => Self::push_joined(qb, filters, " AND ", "TRUE"),
            EquipmentFilter::Or(filters) => Self::push_joined(qb, filters, " OR ", "FALSE"),
        }
    }

    fn push_joined(
        qb: &mut QueryBuilder<'_, Postgres>,
        filters: &[EquipmentFilter],
        separator: &str,
        empty: &str,
    ) {
        if filters.is_empty() {
            qb.push(empty);
            return;
        }
        qb.push("(");
        for (i, filter) in filters.iter().enumerate() {
            if i > 0 {
                qb.push(separator);
            }
            filter.push_sql(qb);
        }
        qb.push(")");
    }
}

/// Escape LIKE wildcards so user input only ever matches literally
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
