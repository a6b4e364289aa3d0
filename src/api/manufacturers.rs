//! Manufacturer API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::manufacturer::{CreateManufacturer, Manufacturer},
};

use super::AuthenticatedUser;

/// List manufacturers
#[utoipa::path(
    get,
    path = "/manufacturers",
    tag = "manufacturers",
    responses(
        (status = 200, description = "Manufacturers by name", body = Vec<Manufacturer>)
    )
)]
pub async fn list_manufacturers(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Manufacturer>>> {
    let manufacturers = state.services.manufacturers.list().await?;
    Ok(Json(manufacturers))
}

/// Create a manufacturer
#[utoipa::path(
    post,
    path = "/manufacturers",
    tag = "manufacturers",
    security(("bearer_auth" = [])),
    request_body = CreateManufacturer,
    responses(
        (status = 201, description = "Manufacturer created", body = Manufacturer),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_manufacturer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(data): Json<CreateManufacturer>,
) -> AppResult<(StatusCode, Json<Manufacturer>)> {
    let manufacturer = state.services.manufacturers.create(data).await?;
    Ok((StatusCode::CREATED, Json(manufacturer)))
}

/// Delete a manufacturer (staff only); its equipment is kept without one
#[utoipa::path(
    delete,
    path = "/manufacturers/{id}",
    tag = "manufacturers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Manufacturer ID")),
    responses(
        (status = 204, description = "Manufacturer deleted"),
        (status = 403, description = "Staff rights required"),
        (status = 404, description = "Manufacturer not found")
    )
)]
pub async fn delete_manufacturer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.manufacturers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
