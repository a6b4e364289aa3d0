//! User administration endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::user::{UpdateStaffStatus, User},
};

use super::AuthenticatedUser;

/// Grant or revoke staff rights (staff only)
#[utoipa::path(
    put,
    path = "/users/{id}/staff",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateStaffStatus,
    responses(
        (status = 200, description = "Staff rights updated", body = User),
        (status = 400, description = "Own staff rights cannot be revoked", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff rights required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_staff_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStaffStatus>,
) -> AppResult<Json<User>> {
    claims.require_staff()?;

    let updated = state
        .services
        .users
        .set_staff(claims.user_id, id, request.is_staff)
        .await?;
    Ok(Json(updated))
}
