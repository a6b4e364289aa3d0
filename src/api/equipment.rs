//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        enums::{EquipmentStatus, SortKey},
        equipment::{CreateEquipment, Equipment, EquipmentDetail, ListingQuery, UpdateEquipment, UpsertDetail},
        pagination::PageInfo,
    },
    services::{catalog::ListingPage, media::UploadKind},
};

use super::{
    context::{page_context, PageContext},
    uploads::read_file_field,
    AuthenticatedUser, MaybeAuthenticatedUser,
};

/// Where clients go after a deletion
pub const LISTING_LOCATION: &str = "/api/v1/equipment";

/// One page of equipment with navigation context
#[derive(Serialize, ToSchema)]
pub struct EquipmentPage {
    pub items: Vec<Equipment>,
    pub pagination: PageInfo,
    /// Sort key actually applied
    pub sort: SortKey,
    /// Search term, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    pub context: PageContext,
}

impl EquipmentPage {
    pub fn new(listing: ListingPage, query: ListingQuery, title: impl Into<String>) -> Self {
        Self {
            context: page_context(title, Some(&listing.page)),
            items: listing.items,
            pagination: listing.page,
            sort: listing.sort,
            q: query.q.filter(|q| !q.trim().is_empty()),
        }
    }
}

/// List published equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    params(ListingQuery),
    responses(
        (status = 200, description = "Published equipment", body = EquipmentPage)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<EquipmentPage>> {
    let listing = state.services.catalog.list_published(&query).await?;
    Ok(Json(EquipmentPage::new(listing, query, "Каталог техники")))
}

/// List drafts (staff only)
#[utoipa::path(
    get,
    path = "/equipment/drafts",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(ListingQuery),
    responses(
        (status = 200, description = "Draft equipment", body = EquipmentPage),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Staff rights required")
    )
)]
pub async fn list_drafts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<EquipmentPage>> {
    claims.require_staff()?;
    let listing = state.services.catalog.list_drafts(&query).await?;
    Ok(Json(EquipmentPage::new(listing, query, "Черновики")))
}

/// Get equipment by slug
#[utoipa::path(
    get,
    path = "/equipment/{slug}",
    tag = "equipment",
    params(("slug" = String, Path, description = "Equipment slug")),
    responses(
        (status = 200, description = "Equipment with manufacturer, tags and details", body = Equipment),
        (status = 404, description = "Unknown slug, or a draft seen by non-staff")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    MaybeAuthenticatedUser(viewer): MaybeAuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.catalog.get(&slug, viewer.as_ref()).await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Only staff may create published equipment"),
        (status = 409, description = "No free slug left", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    if data.status == EquipmentStatus::Published {
        claims.require_staff()?;
    }
    let equipment = state.services.catalog.create(data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{slug}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Equipment slug")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 400, description = "Invalid fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Only staff may change the status"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    if data.status.is_some() {
        claims.require_staff()?;
    }
    let equipment = state.services.catalog.update(&slug, data).await?;
    Ok(Json(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{slug}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Equipment slug")),
    responses(
        (status = 204, description = "Equipment deleted, Location points at the listing"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.services.catalog.delete(&slug).await?;
    Ok((StatusCode::NO_CONTENT, [(header::LOCATION, LISTING_LOCATION)]))
}

/// Publish equipment (staff only)
#[utoipa::path(
    post,
    path = "/equipment/{slug}/publish",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Equipment slug")),
    responses(
        (status = 200, description = "Equipment published", body = Equipment),
        (status = 403, description = "Staff rights required")
    )
)]
pub async fn publish_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<Json<Equipment>> {
    claims.require_staff()?;
    let equipment = state
        .services
        .catalog
        .set_status(&slug, EquipmentStatus::Published)
        .await?;
    Ok(Json(equipment))
}

/// Move equipment back to drafts (staff only)
#[utoipa::path(
    post,
    path = "/equipment/{slug}/unpublish",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Equipment slug")),
    responses(
        (status = 200, description = "Equipment unpublished", body = Equipment),
        (status = 403, description = "Staff rights required")
    )
)]
pub async fn unpublish_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<Json<Equipment>> {
    claims.require_staff()?;
    let equipment = state
        .services
        .catalog
        .set_status(&slug, EquipmentStatus::Draft)
        .await?;
    Ok(Json(equipment))
}

/// Create or replace technical details
#[utoipa::path(
    put,
    path = "/equipment/{slug}/detail",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Equipment slug")),
    request_body = UpsertDetail,
    responses(
        (status = 200, description = "Details stored", body = EquipmentDetail),
        (status = 400, description = "Invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_detail(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(slug): Path<String>,
    Json(data): Json<UpsertDetail>,
) -> AppResult<Json<EquipmentDetail>> {
    let detail = state.services.catalog.upsert_detail(&slug, data).await?;
    Ok(Json(detail))
}

/// Remove technical details
#[utoipa::path(
    delete,
    path = "/equipment/{slug}/detail",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Equipment slug")),
    responses(
        (status = 204, description = "Details removed"),
        (status = 404, description = "Unknown slug or no details")
    )
)]
pub async fn delete_detail(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_detail(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload and attach an image (multipart field `image`)
#[utoipa::path(
    post,
    path = "/equipment/{slug}/image",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Equipment slug")),
    request_body(content = String, content_type = "multipart/form-data", description = "Field `image`: JPEG, PNG, GIF or WebP"),
    responses(
        (status = 200, description = "Image attached", body = Equipment),
        (status = 400, description = "Missing or invalid image", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn upload_image(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<Equipment>> {
    // Fail on an unknown slug before anything is written
    state.services.catalog.get_any(&slug).await?;

    let file = read_file_field(&mut multipart, "image").await?;
    let stored = state
        .services
        .media
        .store(UploadKind::Image, &file.file_name, file.content_type.as_deref(), &file.data)
        .await?;
    let equipment = state.services.catalog.attach_image(&slug, &stored.name).await?;
    Ok(Json(equipment))
}
