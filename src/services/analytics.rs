//! Price analytics over the whole catalog

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    config::AnalyticsConfig,
    error::AppResult,
    models::{
        analytics::{AnalyticsCriteria, AnalyticsSummary, GroupCount, PriceTotals, PricedEquipment},
        enums::SortKey,
        equipment::Equipment,
        filter::EquipmentFilter,
        manufacturer::Manufacturer,
        tag::Tag,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Repository,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(repository: Repository, config: AnalyticsConfig) -> Self {
        Self { repository, config }
    }

    /// Summary over every stored record, drafts included
    pub async fn summary(&self) -> AppResult<AnalyticsSummary> {
        let equipment = self
            .repository
            .equipment
            .list(&EquipmentFilter::All, SortKey::Newest, None)
            .await?;
        let manufacturers = self.repository.manufacturers.list().await?;
        let tags = self.repository.tags.list().await?;

        tracing::debug!(records = equipment.len(), "computing analytics summary");
        Ok(summarize(&equipment, &manufacturers, &tags, &self.config))
    }
}

/// Priced strictly above the threshold, or titled with the keyword
pub fn highlight_filter(config: &AnalyticsConfig) -> EquipmentFilter {
    EquipmentFilter::PriceAbove(config.price_threshold)
        .or(EquipmentFilter::TitleContains(config.title_keyword.clone()))
}

/// Hourly price times the markup, rounded half away from zero to cents
pub fn price_with_fee(price: Decimal, markup: Decimal) -> Decimal {
    (price * markup).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn totals(equipment: &[Equipment]) -> PriceTotals {
    let count = equipment.len() as i64;
    let sum_price: Decimal = equipment.iter().map(|e| e.price_per_hour).sum();
    let avg_price = (count > 0).then(|| {
        (sum_price / Decimal::from(count))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    });
    PriceTotals {
        count,
        avg_price,
        sum_price,
    }
}

pub fn summarize(
    equipment: &[Equipment],
    manufacturers: &[Manufacturer],
    tags: &[Tag],
    config: &AnalyticsConfig,
) -> AnalyticsSummary {
    let priced: Vec<PricedEquipment> = equipment
        .iter()
        .map(|e| PricedEquipment {
            id: e.id,
            title: e.title.clone(),
            slug: e.slug.clone(),
            price_per_hour: e.price_per_hour,
            price_with_fee: price_with_fee(e.price_per_hour, config.markup),
        })
        .collect();

    let highlight = highlight_filter(config);
    let highlighted = equipment
        .iter()
        .zip(&priced)
        .filter(|(e, _)| highlight.matches(e))
        .map(|(_, p)| p.clone())
        .collect();

    let mut per_manufacturer: HashMap<i32, i64> = HashMap::new();
    let mut per_tag: HashMap<i32, i64> = HashMap::new();
    for e in equipment {
        if let Some(m) = &e.manufacturer {
            *per_manufacturer.entry(m.id).or_default() += 1;
        }
        for t in &e.tags {
            *per_tag.entry(t.id).or_default() += 1;
        }
    }

    AnalyticsSummary {
        criteria: AnalyticsCriteria {
            price_threshold: config.price_threshold,
            title_keyword: config.title_keyword.clone(),
            markup: config.markup,
        },
        highlighted,
        totals: totals(equipment),
        priced,
        by_manufacturer: group_counts(manufacturers.iter().map(|m| (m.id, m.name.as_str())), &per_manufacturer),
        by_tag: group_counts(tags.iter().map(|t| (t.id, t.name.as_str())), &per_tag),
    }
}

/// Every group appears, zero counts included; most used first, then by name
fn group_counts<'a>(groups: impl Iterator<Item = (i32, &'a str)>, counts: &HashMap<i32, i64>) -> Vec<GroupCount> {
    let mut result: Vec<GroupCount> = groups
        .map(|(id, name)| GroupCount {
            id,
            name: name.to_string(),
            count: counts.get(&id).copied().unwrap_or(0),
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::EquipmentStatus;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn manufacturer(id: i32, name: &str) -> Manufacturer {
        Manufacturer {
            id,
            name: name.to_string(),
            country: String::new(),
        }
    }

    fn tag(id: i32, name: &str) -> Tag {
        Tag { id, name: name.to_string() }
    }

    fn equipment(id: i32, title: &str, price: &str, manufacturer: Option<Manufacturer>, tags: Vec<Tag>) -> Equipment {
        Equipment {
            id,
            title: title.to_string(),
            slug: format!("item-{}", id),
            description: String::new(),
            price_per_hour: dec(price),
            status: if id % 2 == 0 { EquipmentStatus::Draft } else { EquipmentStatus::Published },
            image: None,
            manufacturer,
            tags,
            detail: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture() -> (Vec<Equipment>, Vec<Manufacturer>, Vec<Tag>) {
        let komatsu = manufacturer(1, "Komatsu");
        let liebherr = manufacturer(2, "Liebherr");
        let volvo = manufacturer(3, "Volvo");
        let crane = tag(1, "Кран");
        let earth = tag(2, "Земляные работы");
        let road = tag(3, "Дорожная техника");

        let equipment = vec![
            equipment(1, "Экскаватор Komatsu PC200", "1000.00", Some(komatsu.clone()), vec![earth.clone()]),
            equipment(2, "Кран Liebherr LTM", "7000.00", Some(liebherr.clone()), vec![crane.clone()]),
            equipment(3, "Мини-экскаватор", "1500.00", Some(komatsu.clone()), vec![earth.clone()]),
            equipment(4, "Каток", "1200.00", None, vec![]),
            equipment(5, "Кран башенный", "5000.00", Some(liebherr.clone()), vec![crane.clone()]),
        ];
        (equipment, vec![volvo, liebherr, komatsu], vec![road, crane, earth])
    }

    #[test]
    fn test_price_with_fee() {
        assert_eq!(price_with_fee(dec("1000.00"), dec("1.20")), dec("1200.00"));
        assert_eq!(price_with_fee(dec("100.04"), dec("1.20")), dec("120.05"));
        assert_eq!(price_with_fee(dec("333.33"), dec("1.15")), dec("383.33"));
    }

    #[test]
    fn test_highlighted_by_price_or_keyword() {
        let (equipment, manufacturers, tags) = fixture();
        let summary = summarize(&equipment, &manufacturers, &tags, &AnalyticsConfig::default());
        let ids: Vec<i32> = summary.highlighted.iter().map(|p| p.id).collect();
        // 5000.00 is not strictly above the threshold; "Мини-экскаватор" matches case-insensitively
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_every_record_is_priced() {
        let (equipment, manufacturers, tags) = fixture();
        let summary = summarize(&equipment, &manufacturers, &tags, &AnalyticsConfig::default());
        assert_eq!(summary.priced.len(), equipment.len());
        assert_eq!(summary.priced[0].price_with_fee, dec("1200.00"));
        assert_eq!(summary.priced[1].price_with_fee, dec("8400.00"));
    }

    #[test]
    fn test_totals() {
        let (equipment, _, _) = fixture();
        let totals = totals(&equipment);
        assert_eq!(totals.count, 5);
        assert_eq!(totals.sum_price, dec("15700.00"));
        assert_eq!(totals.avg_price, Some(dec("3140.00")));
    }

    #[test]
    fn test_average_is_rounded_and_consistent_with_sum() {
        let equipment = vec![
            equipment(1, "Кран", "100.00", None, vec![]),
            equipment(2, "Кран", "100.00", None, vec![]),
            equipment(3, "Кран", "100.01", None, vec![]),
        ];
        let totals = totals(&equipment);
        let avg = totals.avg_price.unwrap();
        assert_eq!(avg, dec("100.00"));
        let drift = (totals.sum_price - avg * Decimal::from(totals.count)).abs();
        assert!(drift <= dec("0.005") * Decimal::from(totals.count));
    }

    #[test]
    fn test_empty_catalog() {
        let summary = summarize(&[], &[manufacturer(1, "Komatsu")], &[], &AnalyticsConfig::default());
        assert_eq!(summary.totals.count, 0);
        assert_eq!(summary.totals.avg_price, None);
        assert_eq!(summary.totals.sum_price, Decimal::ZERO);
        assert!(summary.highlighted.is_empty());
        assert_eq!(summary.by_manufacturer[0].count, 0);
    }

    #[test]
    fn test_group_counts_order_and_zeros() {
        let (equipment, manufacturers, tags) = fixture();
        let summary = summarize(&equipment, &manufacturers, &tags, &AnalyticsConfig::default());

        let by_manufacturer: Vec<(&str, i64)> = summary
            .by_manufacturer
            .iter()
            .map(|g| (g.name.as_str(), g.count))
            .collect();
        assert_eq!(by_manufacturer, vec![("Komatsu", 2), ("Liebherr", 2), ("Volvo", 0)]);

        let by_tag: Vec<(&str, i64)> = summary.by_tag.iter().map(|g| (g.name.as_str(), g.count)).collect();
        assert_eq!(
            by_tag,
            vec![("Земляные работы", 2), ("Кран", 2), ("Дорожная техника", 0)]
        );
    }

    #[test]
    fn test_custom_criteria() {
        let (equipment, manufacturers, tags) = fixture();
        let config = AnalyticsConfig {
            price_threshold: dec("1100"),
            title_keyword: "каток".to_string(),
            markup: dec("1.50"),
        };
        let summary = summarize(&equipment, &manufacturers, &tags, &config);
        let ids: Vec<i32> = summary.highlighted.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        assert_eq!(summary.criteria.markup, dec("1.50"));
        assert_eq!(summary.priced[0].price_with_fee, dec("1500.00"));
    }
}
