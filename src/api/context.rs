//! Shared context embedded in listing responses

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::pagination::{PageInfo, PAGE_WINDOW_RADIUS};

/// Navigation menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MenuItem {
    #[schema(value_type = String)]
    pub title: &'static str,
    #[schema(value_type = String)]
    pub url: &'static str,
}

/// Site navigation, in display order
pub const MENU: &[MenuItem] = &[
    MenuItem { title: "Главная", url: "/api/v1/equipment" },
    MenuItem { title: "О сайте", url: "/swagger-ui" },
    MenuItem { title: "Добавить технику", url: "/api/v1/equipment" },
    MenuItem { title: "Загрузка файла", url: "/api/v1/uploads" },
    MenuItem { title: "Теги", url: "/api/v1/tags" },
    MenuItem { title: "Производители", url: "/api/v1/manufacturers" },
    MenuItem { title: "Аналитика", url: "/api/v1/analytics" },
];

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageContext {
    pub menu: Vec<MenuItem>,
    pub title: String,
    /// Page numbers around the current one, only for paginated responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_range: Option<Vec<i64>>,
}

pub fn page_context(title: impl Into<String>, page: Option<&PageInfo>) -> PageContext {
    PageContext {
        menu: MENU.to_vec(),
        title: title.into(),
        page_range: page.map(|p| p.window(PAGE_WINDOW_RADIUS)),
    }
}
