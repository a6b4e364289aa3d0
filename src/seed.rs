//! Demo catalog data for local development and pagination checks.

use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{CreateEquipment, UpsertDetail},
        manufacturer::{CreateManufacturer, Manufacturer},
        tag::Tag,
    },
    repository::Repository,
    services::catalog::CatalogService,
};

pub const MANUFACTURERS: &[(&str, &str)] = &[
    ("Caterpillar", "США"),
    ("Komatsu", "Япония"),
    ("Volvo", "Швеция"),
    ("JCB", "Великобритания"),
    ("Liebherr", "Германия"),
    ("Hyundai", "Южная Корея"),
    ("Hitachi", "Япония"),
    ("Doosan", "Южная Корея"),
];

pub const TAGS: &[&str] = &[
    "Экскаватор",
    "Бульдозер",
    "Погрузчик",
    "Кран",
    "Самосвал",
    "Бетономешалка",
    "Асфальтоукладчик",
    "Манипулятор",
    "Грейдер",
    "Трактор",
    "Фронтальный погрузчик",
    "Мини-экскаватор",
    "Сваебойная машина",
    "Каток",
    "Буровая установка",
];

const EQUIPMENT_TYPES: &[&str] = &[
    "Экскаватор",
    "Бульдозер",
    "Фронтальный погрузчик",
    "Кран",
    "Самосвал",
    "Бетономешалка",
    "Асфальтоукладчик",
    "Манипулятор",
    "Грейдер",
    "Трактор",
    "Мини-экскаватор",
    "Сваебойная машина",
    "Каток",
    "Буровая установка",
    "Подъемник",
];

const ENGINES: &[&str] = &["Дизельный", "Газовый", "Электрический", "Гибридный"];
const TRANSMISSIONS: &[&str] = &["Автоматическая", "Механическая", "Вариатор"];

/// Share of demo records that get technical details
const DETAIL_PROBABILITY: f64 = 0.7;

/// What a populate run added
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub manufacturers_created: usize,
    pub tags_created: usize,
    pub equipment_created: usize,
    pub details_created: usize,
}

/// Published demo record number `n`, tagged with `tag_ids`
pub fn demo_equipment<R: Rng>(rng: &mut R, n: usize, manufacturer: &Manufacturer, tag_ids: Vec<i32>) -> CreateEquipment {
    let kind = EQUIPMENT_TYPES.choose(rng).copied().unwrap_or("Экскаватор");
    let year = rng.gen_range(2015..=2024);
    let price = rng.gen_range(1000..=10_000i64);

    CreateEquipment {
        title: format!("{} {} {}", kind, manufacturer.name, n),
        slug: None,
        description: format!(
            "Высококачественный {} от производителя {}. Идеально подходит для строительных работ. \
             Год выпуска: {}. Состояние: отличное.",
            kind.to_lowercase(),
            manufacturer.name,
            year
        ),
        price_per_hour: Decimal::new(price * 100, 2),
        status: EquipmentStatus::Published,
        manufacturer_id: Some(manufacturer.id),
        tag_ids,
    }
}

/// Random engine, transmission and mileage
pub fn demo_detail<R: Rng>(rng: &mut R) -> UpsertDetail {
    UpsertDetail {
        engine: ENGINES.choose(rng).copied().unwrap_or("Дизельный").to_string(),
        transmission: TRANSMISSIONS.choose(rng).copied().unwrap_or("Механическая").to_string(),
        mileage: Some(rng.gen_range(1000..=50_000)),
    }
}

/// One to three distinct tags
fn pick_tags<R: Rng>(rng: &mut R, tags: &[Tag]) -> Vec<i32> {
    let amount = rng.gen_range(1..=3).min(tags.len());
    tags.choose_multiple(rng, amount).map(|t| t.id).collect()
}

/// Ensure the demo manufacturers and tags exist, then add `count` published records.
/// Records go through the catalog service, so slugs are generated as for any client.
pub async fn populate<R: Rng>(
    repository: &Repository,
    catalog: &CatalogService,
    count: usize,
    rng: &mut R,
) -> AppResult<PopulateReport> {
    let mut report = PopulateReport::default();

    let mut manufacturers = Vec::with_capacity(MANUFACTURERS.len());
    for (name, country) in MANUFACTURERS {
        let data = CreateManufacturer {
            name: name.to_string(),
            country: country.to_string(),
        };
        let manufacturer = match repository.manufacturers.create(&data).await? {
            Some(created) => {
                report.manufacturers_created += 1;
                created
            }
            None => repository
                .manufacturers
                .get_by_name(name)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Manufacturer '{}' vanished", name)))?,
        };
        manufacturers.push(manufacturer);
    }

    let mut tags = Vec::with_capacity(TAGS.len());
    for name in TAGS {
        let tag = match repository.tags.create(name).await? {
            Some(created) => {
                report.tags_created += 1;
                created
            }
            None => repository
                .tags
                .get_by_name(name)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Tag '{}' vanished", name)))?,
        };
        tags.push(tag);
    }

    for n in 1..=count {
        let Some(manufacturer) = manufacturers.choose(rng) else {
            break;
        };
        let tag_ids = pick_tags(rng, &tags);
        let data = demo_equipment(rng, n, manufacturer, tag_ids);
        let with_detail = rng.gen_bool(DETAIL_PROBABILITY);
        let detail = demo_detail(rng);

        let equipment = catalog.create(data).await?;
        report.equipment_created += 1;
        if with_detail {
            catalog.upsert_detail(&equipment.slug, detail).await?;
            report.details_created += 1;
        }
    }

    tracing::info!(
        manufacturers = report.manufacturers_created,
        tags = report.tags_created,
        equipment = report.equipment_created,
        details = report.details_created,
        "demo catalog populated"
    );
    Ok(report)
}
