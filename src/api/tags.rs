//! Tag API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        equipment::ListingQuery,
        tag::{CreateTag, Tag, TagWithCount},
    },
};

use super::{equipment::EquipmentPage, AuthenticatedUser};

/// List tags with equipment counts
#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    responses(
        (status = 200, description = "Tags, most used first", body = Vec<TagWithCount>)
    )
)]
pub async fn list_tags(State(state): State<crate::AppState>) -> AppResult<Json<Vec<TagWithCount>>> {
    let tags = state.services.tags.list().await?;
    Ok(Json(tags))
}

/// Create a tag
#[utoipa::path(
    post,
    path = "/tags",
    tag = "tags",
    security(("bearer_auth" = [])),
    request_body = CreateTag,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 409, description = "Tag already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(data): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let tag = state.services.tags.create(data).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Delete a tag (staff only); tagged equipment is kept
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 403, description = "Staff rights required"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn delete_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Published equipment carrying a tag
#[utoipa::path(
    get,
    path = "/tags/{name}/equipment",
    tag = "tags",
    params(
        ("name" = String, Path, description = "Exact tag name"),
        ListingQuery
    ),
    responses(
        (status = 200, description = "Published equipment with the tag", body = EquipmentPage),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn list_tag_equipment(
    State(state): State<crate::AppState>,
    Path(name): Path<String>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<EquipmentPage>> {
    let listing = state.services.catalog.list_by_tag(&name, &query).await?;
    let title = format!("Тег: {}", name);
    Ok(Json(EquipmentPage::new(listing, query, title)))
}
