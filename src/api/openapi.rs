//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{analytics, auth, context, equipment, health, manufacturers, tags, uploads, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SpecEqui API",
        version = "1.0.0",
        description = "Construction equipment rental catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "SpecEqui Team", email = "dev@specequi.ru")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::change_password,
        // Users
        users::update_staff_status,
        // Equipment
        equipment::list_equipment,
        equipment::list_drafts,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::publish_equipment,
        equipment::unpublish_equipment,
        equipment::upsert_detail,
        equipment::delete_detail,
        equipment::upload_image,
        // Tags
        tags::list_tags,
        tags::create_tag,
        tags::delete_tag,
        tags::list_tag_equipment,
        // Manufacturers
        manufacturers::list_manufacturers,
        manufacturers::create_manufacturer,
        manufacturers::delete_manufacturer,
        // Analytics
        analytics::get_summary,
        // Uploads
        uploads::upload_file,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::ChangePassword,
            crate::models::user::UpdateStaffStatus,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentDetail,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::UpsertDetail,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::SortKey,
            crate::models::pagination::PageInfo,
            equipment::EquipmentPage,
            context::PageContext,
            context::MenuItem,
            // Tags & manufacturers
            crate::models::tag::Tag,
            crate::models::tag::TagWithCount,
            crate::models::tag::CreateTag,
            crate::models::manufacturer::Manufacturer,
            crate::models::manufacturer::CreateManufacturer,
            // Analytics
            crate::models::analytics::AnalyticsSummary,
            crate::models::analytics::AnalyticsCriteria,
            crate::models::analytics::PricedEquipment,
            crate::models::analytics::PriceTotals,
            crate::models::analytics::GroupCount,
            analytics::AnalyticsResponse,
            // Uploads
            crate::models::upload::UploadResult,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and authentication"),
        (name = "users", description = "User administration"),
        (name = "equipment", description = "Equipment catalog"),
        (name = "tags", description = "Equipment tags"),
        (name = "manufacturers", description = "Equipment manufacturers"),
        (name = "analytics", description = "Price analytics"),
        (name = "uploads", description = "File uploads")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
